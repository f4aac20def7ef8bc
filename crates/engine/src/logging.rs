//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries and tests pick a
//! profile and install a `tracing-subscriber` fmt subscriber once.
//!
//! Targets used by the engine:
//! - `nfctool::read`: read path
//! - `nfctool::write`: write protocol steps and verdicts
//! - `nfctool::probe`: writability probing
//! - `nfctool::backup`: backup store access
//! - `nfctool::diagnostics`: unknown-tag reports

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::Level;

/// Logging profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogProfile {
    /// Every protocol step, at debug level
    Debug,
    /// Errors only
    #[default]
    Release,
}

impl LogProfile {
    /// Most verbose level emitted under this profile
    pub fn max_level(self) -> Level {
        match self {
            LogProfile::Debug => Level::DEBUG,
            LogProfile::Release => Level::ERROR,
        }
    }
}

impl fmt::Display for LogProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogProfile::Debug => f.write_str("debug"),
            LogProfile::Release => f.write_str("release"),
        }
    }
}

/// Install the global subscriber for `profile`.
///
/// Returns false if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init(profile: LogProfile) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(profile.max_level())
        .with_target(true)
        .try_init()
        .is_ok()
}
