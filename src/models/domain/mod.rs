pub mod completion;
pub mod document;
pub mod event;
pub mod session;

pub use completion::{CompletionRequest, CompletionTemplate};
pub use document::DocumentKind;
pub use event::{Command, ConversationEvent, DocumentUpload};
pub use session::{ConversationState, Session};
