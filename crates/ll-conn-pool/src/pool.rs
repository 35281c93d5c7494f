use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use portable_atomic::{AtomicUsize, Ordering};

use crate::conn::Connection;
use crate::error::ConnError;
use crate::handle::ConnHandle;

/// Per-slot lifecycle state. Free→Active only via acquire, Active→Free
/// only via release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Free,
    Active,
}

struct Slot {
    state: State,
    conn: Connection,
}

/// Pool-wide structures. Acquire and release from concurrent contexts race
/// on the free list even when individual handles do not, so everything in
/// here lives behind the one mutex.
struct Inner<const N: usize> {
    slots: [Slot; N],
    free: Vec<u16, N>,
}

/// Fixed-capacity pool of connection objects.
///
/// Capacity is fixed at compile time via `N`. Generic over the raw mutex
/// so firmware can pick `CriticalSectionRawMutex` (radio ISR + host thread)
/// while tests run with `NoopRawMutex`. No operation suspends or yields.
pub struct ConnPool<M: RawMutex, const N: usize> {
    inner: Mutex<M, RefCell<Inner<N>>>,
    active: AtomicUsize,
}

impl<M: RawMutex, const N: usize> ConnPool<M, N> {
    /// Create a pool with every slot free.
    pub fn new() -> Self {
        let mut free = Vec::new();
        // Reversed so the lowest index is popped first.
        for index in (0..N).rev() {
            free.push(index as u16).ok();
        }
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                slots: core::array::from_fn(|index| Slot {
                    state: State::Free,
                    conn: Connection::new(ConnHandle::from_index(index)),
                }),
                free,
            })),
            active: AtomicUsize::new(0),
        }
    }

    /// Claim a free connection object and return its handle.
    ///
    /// The object starts with latency 0 and no peer features. The handle
    /// stays valid until [`release`](Self::release) and is never shared
    /// with another active connection.
    pub fn acquire(&self) -> Result<ConnHandle, ConnError> {
        let handle = self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let index = inner.free.pop().ok_or(ConnError::PoolExhausted)?;
            let slot = &mut inner.slots[index as usize];
            slot.state = State::Active;
            slot.conn.reset();
            self.active.fetch_add(1, Ordering::Release);
            Ok(slot.conn.handle())
        })?;
        #[cfg(feature = "defmt")]
        defmt::trace!("conn {}: acquired", handle.raw());
        Ok(handle)
    }

    /// Look up the active connection for `handle` and run `f` against it.
    ///
    /// `f` runs inside the pool's critical section; keep it short. The
    /// reference cannot escape, so a stale handle is caught here rather
    /// than dangling into a reused slot.
    pub fn with_conn<R>(
        &self,
        handle: ConnHandle,
        f: impl FnOnce(&Connection) -> R,
    ) -> Result<R, ConnError> {
        self.inner.lock(|inner| {
            let inner = inner.borrow();
            let slot = inner
                .slots
                .get(handle.index())
                .ok_or(ConnError::InvalidHandle)?;
            if slot.state != State::Active {
                return Err(ConnError::InvalidHandle);
            }
            Ok(f(&slot.conn))
        })
    }

    /// Return an active connection object to the pool.
    ///
    /// The handle becomes invalid for lookups and eligible for reuse by a
    /// future [`acquire`](Self::acquire).
    pub fn release(&self, handle: ConnHandle) -> Result<(), ConnError> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let index = handle.index();
            let slot = inner
                .slots
                .get_mut(index)
                .ok_or(ConnError::InvalidHandle)?;
            if slot.state != State::Active {
                return Err(ConnError::InvalidHandle);
            }
            slot.state = State::Free;
            slot.conn.reset();
            inner.free.push(index as u16).ok();
            self.active.fetch_sub(1, Ordering::Release);
            Ok(())
        })?;
        #[cfg(feature = "defmt")]
        defmt::trace!("conn {}: released", handle.raw());
        Ok(())
    }

    /// Record the peer's feature mask once the feature exchange control
    /// procedure has completed.
    pub fn set_peer_features(
        &self,
        handle: ConnHandle,
        features: u64,
    ) -> Result<(), ConnError> {
        self.with_conn_mut(handle, |conn| conn.set_peer_features(features))
    }

    /// Update the peripheral latency after a connection parameter update.
    pub fn set_latency(
        &self,
        handle: ConnHandle,
        latency: u16,
    ) -> Result<(), ConnError> {
        self.with_conn_mut(handle, |conn| conn.set_latency(latency))
    }

    /// `true` if `handle` names a currently active connection.
    pub fn is_active(&self, handle: ConnHandle) -> bool {
        self.with_conn(handle, |_| ()).is_ok()
    }

    /// Number of active connections. Lock-free read of the occupancy
    /// counter.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Total slots in the pool.
    pub const fn capacity(&self) -> usize {
        N
    }

    fn with_conn_mut<R>(
        &self,
        handle: ConnHandle,
        f: impl FnOnce(&mut Connection) -> R,
    ) -> Result<R, ConnError> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let slot = inner
                .slots
                .get_mut(handle.index())
                .ok_or(ConnError::InvalidHandle)?;
            if slot.state != State::Active {
                return Err(ConnError::InvalidHandle);
            }
            Ok(f(&mut slot.conn))
        })
    }
}

impl<M: RawMutex, const N: usize> Default for ConnPool<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
