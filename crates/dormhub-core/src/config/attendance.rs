//! Attendance token configuration.

use serde::{Deserialize, Serialize};

/// Short-lived attendance (QR) token settings.
///
/// The token TTL must stay in the 30–40 second window: long enough for a
/// scanner round-trip, short enough that a screenshotted code goes stale
/// before it can be shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Issued token validity in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Suggested client re-issue interval in seconds. Kept slightly below
    /// the token TTL so the displayed code never expires on screen.
    #[serde(default = "default_rotation_hint")]
    pub rotation_hint_seconds: u64,
    /// How long consumed nonces are retained before being purged, in
    /// seconds. Must exceed the token TTL.
    #[serde(default = "default_used_token_retention")]
    pub used_token_retention_seconds: u64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            token_ttl_seconds: default_token_ttl(),
            rotation_hint_seconds: default_rotation_hint(),
            used_token_retention_seconds: default_used_token_retention(),
        }
    }
}

fn default_token_ttl() -> u64 {
    35
}

fn default_rotation_hint() -> u64 {
    28
}

fn default_used_token_retention() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_rotation_under_ttl() {
        let config = AttendanceConfig::default();
        assert!(config.rotation_hint_seconds < config.token_ttl_seconds);
        assert!(config.used_token_retention_seconds > config.token_ttl_seconds);
    }
}
