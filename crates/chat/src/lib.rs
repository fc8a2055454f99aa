#![deny(unsafe_code)]
//! Chat collaborator used by the explorer UI to ask questions about the model.
//!
//! The network client is not part of this crate. A [`ChatTransport`] carries a
//! fully built [`ChatRequest`] to whatever service backs the chat;
//! [`ChatService`] adds the credential check, the grounding instruction, and
//! the reply policy: callers always get a displayable string back, never an
//! error.

pub mod theory;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Environment variable holding the service credential.
pub const CREDENTIAL_ENV: &str = "API_KEY";
/// Model requested when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Sampling temperature sent with every request.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Reply shown when no credential is configured.
pub const MISSING_CREDENTIAL_REPLY: &str = "Error: API key is missing in the environment.";
/// Reply shown when the transport or the service fails.
pub const APOLOGY_REPLY: &str =
    "I encountered an error analyzing the topological flip. Please try again.";
/// Reply shown when the service answers with empty text.
pub const EMPTY_REPLY: &str = "No response received.";

/// Failures on the way to a reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no credential configured (set API_KEY)")]
    MissingCredential,
    #[error("chat transport failed: {0}")]
    Transport(String),
}

impl ChatError {
    /// The inline text a user sees for this failure.
    pub fn reply_text(&self) -> &'static str {
        match self {
            ChatError::MissingCredential => MISSING_CREDENTIAL_REPLY,
            ChatError::Transport(_) => APOLOGY_REPLY,
        }
    }
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

/// One prior message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Everything a transport needs to ask the service for one reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub system_instruction: String,
    pub temperature: f64,
    pub history: Vec<ChatTurn>,
    pub message: String,
    #[serde(skip)]
    pub credential: String,
}

/// Carries a request to the conversational service.
pub trait ChatTransport {
    /// Returns the reply text, or a description of what went wrong.
    fn send(&self, request: &ChatRequest) -> Result<String, String>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for Box<T> {
    fn send(&self, request: &ChatRequest) -> Result<String, String> {
        (**self).send(request)
    }
}

/// Builds grounded requests and turns every outcome into reply text.
pub struct ChatService<T> {
    transport: T,
    credential: Option<String>,
    model: String,
}

impl<T: ChatTransport> ChatService<T> {
    /// A service with an explicit credential; empty strings count as missing.
    pub fn new(transport: T, credential: Option<String>) -> Self {
        Self {
            transport,
            credential: credential.filter(|c| !c.trim().is_empty()),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// A service whose credential comes from [`CREDENTIAL_ENV`].
    pub fn from_env(transport: T) -> Self {
        Self::new(transport, std::env::var(CREDENTIAL_ENV).ok())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Builds the request for `message` after `history`.
    pub fn request(&self, message: &str, history: &[ChatTurn]) -> Result<ChatRequest, ChatError> {
        let credential = self.credential.clone().ok_or(ChatError::MissingCredential)?;
        Ok(ChatRequest {
            model: self.model.clone(),
            system_instruction: theory::system_instruction(),
            temperature: DEFAULT_TEMPERATURE,
            history: history.to_vec(),
            message: message.to_owned(),
            credential,
        })
    }

    /// Asks for a reply, keeping the failure taxonomy.
    pub fn try_reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, ChatError> {
        let request = self.request(message, history)?;
        let text = self.transport.send(&request).map_err(ChatError::Transport)?;
        if text.trim().is_empty() {
            Ok(EMPTY_REPLY.to_owned())
        } else {
            Ok(text)
        }
    }

    /// Asks for a reply; failures become inline text and are logged.
    pub fn reply(&self, message: &str, history: &[ChatTurn]) -> String {
        match self.try_reply(message, history) {
            Ok(text) => text,
            Err(err) => {
                match &err {
                    ChatError::MissingCredential => log::warn!("{err}"),
                    ChatError::Transport(_) => log::error!("{err}"),
                }
                err.reply_text().to_owned()
            }
        }
    }
}

impl<T: ChatTransport + Send + Sync + 'static> ChatService<T> {
    /// Runs [`reply`](Self::reply) on a background thread so a UI loop can
    /// keep ticking while the service answers.
    pub fn spawn_reply(
        self: &Arc<Self>,
        message: String,
        history: Vec<ChatTurn>,
    ) -> JoinHandle<String> {
        let service = Arc::clone(self);
        thread::spawn(move || service.reply(&message, &history))
    }
}
