//! Fixed chat replies sent by the conversation service.

pub const GREETING: &str =
    "Hello! Do you want to 'generate a quiz' or 'learn about a topic'? \nPlease type 'quiz' or 'learn'.";
pub const FAREWELL: &str = "Goodbye!";

pub const UPLOAD_DOCUMENT_PROMPT: &str =
    "Please upload a document (.txt, .docx, or .pdf) to generate a quiz.";
pub const SEND_TOPIC_PROMPT: &str = "Please send me the topic you want to learn about.";

pub const INVALID_MODE_OPTION: &str = "Invalid option. Please type 'quiz' or 'learn'.";
pub const INVALID_CONFIRMATION_OPTION: &str = "Invalid option. Please type 'yes' or 'no'.";
pub const QUIZ_DECLINED: &str = "Okay! If you need anything else, just type 'quiz' or 'learn'.";

pub const GENERATING_DOCUMENT_QUIZ: &str = "Generating quiz... This may take a moment.";
pub const GENERATING_TOPIC_QUIZ: &str = "Generating quiz on the topic... Please wait.";
pub const SUMMARIZING_TOPIC: &str = "Summarizing the topic... Please wait.";
pub const QUIZ_CONFIRMATION_PROMPT: &str =
    "Would you like to generate a quiz on this topic? (yes/no)";

pub fn unsupported_file_type(extension: &str) -> String {
    let shown = if extension.is_empty() {
        "no extension".to_string()
    } else {
        format!(".{}", extension)
    };
    format!(
        "Unsupported file type ({}). Please upload a .txt, .docx, or .pdf file.",
        shown
    )
}

pub fn unreadable_document(reason: &str) -> String {
    format!("Could not read the document: {}", reason)
}
