use std::path::PathBuf;

use super::buffer::TranslationTicket;

/// User intents forwarded from the front end into the app.
#[derive(Debug, Clone)]
pub enum Command {
    Login(String),
    Logout,
    NewBuffer,
    Import(PathBuf),
    EditOriginal(String),
    EditTranslated(String),
    /// Save the original buffer. The name answers the "file name?" prompt
    /// when the buffer has none yet.
    Save(Option<String>),
    Translate,
    Open(String),
    Delete(String),
}

/// Events arriving on the app's channel from background work.
#[derive(Debug, Clone)]
pub enum Message {
    TranslationFinished {
        ticket: TranslationTicket,
        result: Result<String, String>,
    },
}
