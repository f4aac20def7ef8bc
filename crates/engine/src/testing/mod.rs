//! Testing utilities for tag protocols
//!
//! Scriptable stand-ins for the radio stack:
//!
//! - **MockSession**: A technology session with injectable failures and a
//!   call log
//! - **MockTag**: A discovered tag holding one `MockSession` per technology
//!
//! # Example
//!
//! ```ignore
//! use nfctool_core::SessionError;
//! use nfctool_engine::testing::{MockSession, MockTag};
//!
//! let session = MockSession::new()
//!     .with_cached_message(message)
//!     .fail_write(SessionError::TagLost);
//! let mut tag = MockTag::ndef(vec![0x04, 0xA1, 0x3F], session);
//! ```

mod session;
mod tag;

pub use session::{MockSession, SessionCall};
pub use tag::MockTag;
