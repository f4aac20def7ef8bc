//! Scriptable discovered tag

use std::collections::HashMap;

use nfctool_core::{
    MifareClassicInfo, MifareUltralightInfo, SessionError, TagHandle, TagSession, TagTechnology,
    TECH_PREFIX,
};

use super::session::MockSession;

/// In-memory discovered tag
#[derive(Debug, Default)]
pub struct MockTag {
    id: Vec<u8>,
    tech_list: Vec<String>,
    sessions: HashMap<TagTechnology, MockSession>,
    classic_info: Option<Result<MifareClassicInfo, SessionError>>,
    ultralight_info: Option<MifareUltralightInfo>,
}

impl MockTag {
    /// Tag with an identifier and a reported technology list, no sessions
    pub fn new<S: AsRef<str>>(id: Vec<u8>, tech_list: &[S]) -> Self {
        Self {
            id,
            tech_list: tech_list.iter().map(|t| t.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// NFC-A tag exposing NDEF through `session`
    pub fn ndef(id: Vec<u8>, session: MockSession) -> Self {
        let techs = [
            format!("{}NfcA", TECH_PREFIX),
            format!("{}Ndef", TECH_PREFIX),
        ];
        Self::new(id, &techs).with_session(TagTechnology::Ndef, session)
    }

    /// Attach the session returned for `tech`
    pub fn with_session(mut self, tech: TagTechnology, session: MockSession) -> Self {
        self.sessions.insert(tech, session);
        self
    }

    /// MIFARE Classic metadata, or the error reading it raises
    pub fn with_classic_info(mut self, info: Result<MifareClassicInfo, SessionError>) -> Self {
        self.classic_info = Some(info);
        self
    }

    /// MIFARE Ultralight metadata
    pub fn with_ultralight_info(mut self, info: MifareUltralightInfo) -> Self {
        self.ultralight_info = Some(info);
        self
    }

    /// Session attached for `tech`, for inspection after a run
    pub fn mock_session(&self, tech: TagTechnology) -> Option<&MockSession> {
        self.sessions.get(&tech)
    }
}

impl TagHandle for MockTag {
    fn id(&self) -> &[u8] {
        &self.id
    }

    fn tech_list(&self) -> &[String] {
        &self.tech_list
    }

    fn session(&mut self, tech: TagTechnology) -> Option<&mut dyn TagSession> {
        self.sessions
            .get_mut(&tech)
            .map(|s| s as &mut dyn TagSession)
    }

    fn mifare_classic_info(&self) -> Option<Result<MifareClassicInfo, SessionError>> {
        self.classic_info.clone()
    }

    fn mifare_ultralight_info(&self) -> Option<MifareUltralightInfo> {
        self.ultralight_info
    }
}
