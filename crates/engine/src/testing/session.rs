//! Scriptable tag session

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use nfctool_core::{NdefMessage, SessionError, SessionResult, TagSession};

/// One recorded call on a [`MockSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    /// `connect()`
    Connect,
    /// `read_cached_message()`
    ReadCachedMessage,
    /// `write_message()` with the message passed in
    WriteMessage(NdefMessage),
    /// `close()`
    Close,
}

/// In-memory tag session
///
/// By default every call succeeds, `connect` leaves the session connected
/// and `close` disconnects it. Builders script deviations.
#[derive(Debug)]
pub struct MockSession {
    cached: Option<NdefMessage>,
    content: Option<NdefMessage>,
    writable: bool,
    connected: bool,
    connected_after_connect: bool,
    connected_after_close: bool,
    connect_error: Option<SessionError>,
    read_error: Option<SessionError>,
    read_delay: Option<Duration>,
    write_results: VecDeque<SessionResult<()>>,
    close_error: Option<SessionError>,
    calls: Vec<SessionCall>,
}

impl Default for MockSession {
    fn default() -> Self {
        Self {
            cached: None,
            content: None,
            writable: true,
            connected: false,
            connected_after_connect: true,
            connected_after_close: false,
            connect_error: None,
            read_error: None,
            read_delay: None,
            write_results: VecDeque::new(),
            close_error: None,
            calls: Vec::new(),
        }
    }
}

impl MockSession {
    /// Writable, blank session where every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Message reported by `read_cached_message`; also the initial content
    pub fn with_cached_message(mut self, message: NdefMessage) -> Self {
        self.content = Some(message.clone());
        self.cached = Some(message);
        self
    }

    /// Writability flag reported by the tag
    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    /// Make `connect` fail
    pub fn fail_connect(mut self, error: SessionError) -> Self {
        self.connect_error = Some(error);
        self
    }

    /// Make `read_cached_message` fail
    pub fn fail_read(mut self, error: SessionError) -> Self {
        self.read_error = Some(error);
        self
    }

    /// Sleep this long inside `read_cached_message`
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Fail the next unscripted `write_message` call.
    ///
    /// Calls chain: `.fail_write(a).fail_write(b)` fails the first two
    /// writes.
    pub fn fail_write(mut self, error: SessionError) -> Self {
        self.write_results.push_back(Err(error));
        self
    }

    /// Let the next unscripted `write_message` call succeed.
    ///
    /// Used to place a failure after a success.
    pub fn succeed_write(mut self) -> Self {
        self.write_results.push_back(Ok(()));
        self
    }

    /// Make every `close` fail
    pub fn fail_close(mut self, error: SessionError) -> Self {
        self.close_error = Some(error);
        self
    }

    /// Report not connected even after a successful `connect`
    pub fn disconnected_after_connect(mut self) -> Self {
        self.connected_after_connect = false;
        self
    }

    /// Report still connected after `close`
    pub fn connected_after_close(mut self) -> Self {
        self.connected_after_close = true;
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> &[SessionCall] {
        &self.calls
    }

    /// Messages passed to `write_message`, in order, including failed writes
    pub fn write_calls(&self) -> Vec<&NdefMessage> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SessionCall::WriteMessage(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Number of `close` calls
    pub fn close_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == SessionCall::Close).count()
    }

    /// What the tag holds now: the cached message or the last successful
    /// write
    pub fn content(&self) -> Option<&NdefMessage> {
        self.content.as_ref()
    }
}

impl TagSession for MockSession {
    fn connect(&mut self) -> SessionResult<()> {
        self.calls.push(SessionCall::Connect);
        if let Some(e) = &self.connect_error {
            return Err(e.clone());
        }
        self.connected = self.connected_after_connect;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn read_cached_message(&mut self) -> SessionResult<Option<NdefMessage>> {
        self.calls.push(SessionCall::ReadCachedMessage);
        if let Some(delay) = self.read_delay {
            thread::sleep(delay);
        }
        if let Some(e) = &self.read_error {
            return Err(e.clone());
        }
        Ok(self.cached.clone())
    }

    fn write_message(&mut self, message: &NdefMessage) -> SessionResult<()> {
        self.calls.push(SessionCall::WriteMessage(message.clone()));
        if let Some(result) = self.write_results.pop_front() {
            result?;
        }
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        if !self.writable {
            return Err(SessionError::ReadOnly);
        }
        self.content = Some(message.clone());
        Ok(())
    }

    fn close(&mut self) -> SessionResult<()> {
        self.calls.push(SessionCall::Close);
        self.connected = self.connected_after_close;
        match &self.close_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn is_writable(&self) -> bool {
        self.writable
    }
}
