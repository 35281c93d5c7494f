/// Opaque identifier for a connection object.
///
/// The raw value encodes the slot index directly, so handle-to-slot lookup
/// is O(1). A handle is stable for its connection's active lifetime and
/// becomes eligible for reuse once the connection is released; the pool
/// does not generation-check reused handles, matching link-layer
/// connection-handle semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnHandle(u16);

impl ConnHandle {
    /// Reconstruct a handle from its raw value, e.g. one carried in an
    /// HCI event. Validity is only established by the pool lookup.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw handle value for reporting towards the host.
    pub const fn raw(self) -> u16 {
        self.0
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u16)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}
