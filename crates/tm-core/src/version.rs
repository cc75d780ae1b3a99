//! Schema version and label identifiers

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// A schema version: the 14-digit `YYYYMMDDHHMMSS` prefix of a migration
    /// file name, or `"0"` for a database with nothing applied.
    ///
    /// Ordering is plain string ordering. Fixed-width timestamps make that
    /// chronological.
    pub struct Version;
}

/// The version recorded for a freshly created history table.
pub const ZERO_VERSION: &str = "0";

impl Version {
    /// The bootstrap version `"0"`.
    pub fn zero() -> Self {
        Self(ZERO_VERSION.to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_VERSION
    }
}

define_newtype_string! {
    /// A user-supplied tag stored with every migration applied in one run.
    pub struct Label;
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
