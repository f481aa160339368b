//! Wall-clock timestamps for permit deadline checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch.
///
/// Permit deadlines are compared against [`UnixTimestamp::now`]. A deadline
/// of `U256::MAX` conventionally means "no expiry": the comparison
/// `now > deadline` can never hold for it, so no special case is needed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// Returns the current wall-clock time.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(elapsed.as_secs())
    }

    /// Creates a timestamp from raw seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the timestamp as raw seconds.
    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_after_epoch() {
        assert!(UnixTimestamp::now().as_secs() > 0);
    }

    #[test]
    fn ordering_and_roundtrip() {
        let earlier = UnixTimestamp::from_secs(100);
        let later = UnixTimestamp::from_secs(200);
        assert!(earlier < later);
        assert_eq!(later.as_secs(), 200);
    }
}
