use std::fmt;

use crate::services::channel::DocumentSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    Unknown(String),
}

impl Command {
    /// Parse a `/command` or `/command@botname` token. Returns `None` when the
    /// text is not a command at all.
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        let name = token.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or_default().to_lowercase();

        Some(match name.as_str() {
            "start" => Command::Start,
            "cancel" => Command::Cancel,
            _ => Command::Unknown(name),
        })
    }
}

/// An uploaded document whose bytes have not been fetched yet.
pub struct DocumentUpload {
    pub file_name: String,
    pub source: Box<dyn DocumentSource>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, source: Box<dyn DocumentSource>) -> Self {
        Self {
            file_name: file_name.into(),
            source,
        }
    }
}

impl fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

/// One inbound event for a single conversation.
#[derive(Debug)]
pub enum ConversationEvent {
    Command(Command),
    Text(String),
    Document(DocumentUpload),
}

impl ConversationEvent {
    /// Classify a plain text message; commands are never treated as free text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match Command::parse(&text) {
            Some(command) => ConversationEvent::Command(command),
            None => ConversationEvent::Text(text),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConversationEvent::Command(Command::Start) => "command(start)",
            ConversationEvent::Command(Command::Cancel) => "command(cancel)",
            ConversationEvent::Command(Command::Unknown(_)) => "command(unknown)",
            ConversationEvent::Text(_) => "text",
            ConversationEvent::Document(_) => "document",
        }
    }
}
