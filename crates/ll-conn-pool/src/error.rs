/// Errors reported by connection pool operations.
///
/// Both conditions are recoverable and reported synchronously to the
/// caller; neither corrupts pool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnError {
    /// Every slot is in use; acquire cannot claim a connection object.
    PoolExhausted,
    /// The handle does not name a currently active connection.
    InvalidHandle,
}
