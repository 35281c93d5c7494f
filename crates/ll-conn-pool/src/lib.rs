#![no_std]
//! Fixed-capacity connection object pool for a BLE link-layer controller.
//!
//! Connection objects are pre-allocated for the pool's whole lifetime and
//! addressed through small integer handles. The pool arbitrates
//! acquire/lookup/release between the radio event context and the host
//! thread context: every operation is short, bounded, and non-yielding, so
//! the pool can be driven from interrupt context when instantiated with
//! `CriticalSectionRawMutex`.
//!
//! Callers never hold a reference into the pool across a yield point;
//! lookups run a closure inside the pool's critical section instead.

mod conn;
mod error;
mod handle;
mod pool;

pub use conn::Connection;
pub use error::ConnError;
pub use handle::ConnHandle;
pub use pool::ConnPool;
