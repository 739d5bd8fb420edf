//! Protocol version management.

/// Version written into newly created vote proposals.
pub const PROTOCOL_VERSION: u32 = 1;
