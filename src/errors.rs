use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Unsupported file type: .{0}")]
    UnsupportedFormat(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("{0}")]
    CompletionError(String),

    #[error("Invalid input: {0}")]
    InvalidUserInput(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::DecodeError(_) => "DECODE_ERROR",
            AppError::MalformedDocument(_) => "MALFORMED_DOCUMENT",
            AppError::CompletionError(_) => "COMPLETION_ERROR",
            AppError::InvalidUserInput(_) => "INVALID_USER_INPUT",
            AppError::DownloadError(_) => "DOWNLOAD_ERROR",
            AppError::TransportError(_) => "TRANSPORT_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::CompletionError(err.to_string())
    }
}
impl From<std::string::FromUtf8Error> for AppError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AppError::DecodeError(err.to_string())
    }
}
impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::MalformedDocument(format!("not a valid .docx archive ({})", err))
    }
}
impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::MalformedDocument(format!("not a valid .pdf file ({})", err))
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ConfigError(err.to_string())
    }
}
impl From<teloxide::RequestError> for AppError {
    fn from(err: teloxide::RequestError) -> Self {
        AppError::TransportError(err.to_string())
    }
}
impl From<teloxide::DownloadError> for AppError {
    fn from(err: teloxide::DownloadError) -> Self {
        AppError::DownloadError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
