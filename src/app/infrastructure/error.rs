use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Stored state is corrupt: {0}")]
    StorageCorrupt(String),

    #[error("Missing input: {0}")]
    UserInputMissing(String),

    #[error("Nothing to translate: the source buffer is empty")]
    NothingToTranslate,

    #[error("A translation is already in progress for this buffer")]
    TranslationInProgress,

    #[error("No artifact named \"{0}\"")]
    UnknownArtifact(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Settings error: {0}")]
    Settings(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
