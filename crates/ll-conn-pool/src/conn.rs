use crate::handle::ConnHandle;

/// One link-layer connection object.
///
/// Pre-allocated in its pool slot for the pool's whole lifetime; the
/// mutable fields are reset every time the slot is acquired.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Connection {
    handle: ConnHandle,
    latency: u16,
    peer_features: Option<u64>,
}

impl Connection {
    pub(crate) const fn new(handle: ConnHandle) -> Self {
        Self {
            handle,
            latency: 0,
            peer_features: None,
        }
    }

    /// Back to the freshly-acquired state: latency 0, feature exchange
    /// not yet completed.
    pub(crate) fn reset(&mut self) {
        self.latency = 0;
        self.peer_features = None;
    }

    /// Handle assigned to this connection at acquisition.
    pub const fn handle(&self) -> ConnHandle {
        self.handle
    }

    /// Peripheral latency: the number of connection events the peripheral
    /// may skip before it must listen.
    pub const fn latency(&self) -> u16 {
        self.latency
    }

    /// `true` once the peer feature exchange has completed.
    pub const fn features_valid(&self) -> bool {
        self.peer_features.is_some()
    }

    /// Negotiated peer feature mask, or `None` until the feature exchange
    /// control procedure has completed.
    pub const fn peer_features(&self) -> Option<u64> {
        self.peer_features
    }

    pub(crate) fn set_latency(&mut self, latency: u16) {
        self.latency = latency;
    }

    pub(crate) fn set_peer_features(&mut self, features: u64) {
        self.peer_features = Some(features);
    }
}
