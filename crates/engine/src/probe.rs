//! Writability probing
//!
//! Which check applies is a pure function of the tag's technologies; only
//! running the check touches the hardware.
//!
//! 1. Ndef: the flag the tag reports
//! 2. MifareClassic: connect, close, then writable iff the session reports
//!    itself disconnected
//! 3. MifareUltralight: connect, then writable iff the session reports
//!    itself connected
//! 4. Anything else: not writable
//!
//! The MIFARE Classic rule reads inverted but is kept as the field-tested
//! behaviour until confirmed otherwise.

use nfctool_core::{TagHandle, TagSession, TagTechnology};
use tracing::{debug, warn};

/// Check applied to a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// Ask the NDEF session for its writable flag
    NdefFlag,
    /// Connect and close a MIFARE Classic session
    MifareClassicConnect,
    /// Connect a MIFARE Ultralight session
    MifareUltralightConnect,
    /// No supported technology
    NotWritable,
}

impl ProbeStrategy {
    /// Pick the check for a technology list, first applicable rule wins
    pub fn for_technologies(techs: &[TagTechnology]) -> Self {
        if techs.contains(&TagTechnology::Ndef) {
            ProbeStrategy::NdefFlag
        } else if techs.contains(&TagTechnology::MifareClassic) {
            ProbeStrategy::MifareClassicConnect
        } else if techs.contains(&TagTechnology::MifareUltralight) {
            ProbeStrategy::MifareUltralightConnect
        } else {
            ProbeStrategy::NotWritable
        }
    }

    /// Technology whose session the check needs
    pub fn technology(self) -> Option<TagTechnology> {
        match self {
            ProbeStrategy::NdefFlag => Some(TagTechnology::Ndef),
            ProbeStrategy::MifareClassicConnect => Some(TagTechnology::MifareClassic),
            ProbeStrategy::MifareUltralightConnect => Some(TagTechnology::MifareUltralight),
            ProbeStrategy::NotWritable => None,
        }
    }
}

/// Decide whether a tag accepts writes.
///
/// Never fails: any error counts as not writable, and a session opened by
/// the probe is always closed.
pub fn is_writable(tag: &mut dyn TagHandle) -> bool {
    let strategy = ProbeStrategy::for_technologies(&tag.technologies());
    let tech = match strategy.technology() {
        Some(tech) => tech,
        None => {
            debug!(target: "nfctool::probe", "No writable technology");
            return false;
        }
    };
    let session = match tag.session(tech) {
        Some(session) => session,
        None => {
            warn!(target: "nfctool::probe", ?tech, "Technology listed but no session available");
            return false;
        }
    };

    let writable = match strategy {
        ProbeStrategy::NdefFlag => session.is_writable(),
        ProbeStrategy::MifareClassicConnect => probe_connect(session, |s| {
            close_quietly(s);
            !s.is_connected()
        }),
        ProbeStrategy::MifareUltralightConnect => probe_connect(session, |s| {
            let connected = s.is_connected();
            close_quietly(s);
            connected
        }),
        ProbeStrategy::NotWritable => false,
    };

    debug!(target: "nfctool::probe", ?strategy, writable, "Probed tag");
    writable
}

fn probe_connect(
    session: &mut dyn TagSession,
    check: impl FnOnce(&mut dyn TagSession) -> bool,
) -> bool {
    match session.connect() {
        Ok(()) => check(session),
        Err(e) => {
            warn!(target: "nfctool::probe", error = %e, "Probe connect failed");
            close_quietly(session);
            false
        }
    }
}

fn close_quietly(session: &mut dyn TagSession) {
    if let Err(e) = session.close() {
        warn!(target: "nfctool::probe", error = %e, "Failed to close probe session");
    }
}
