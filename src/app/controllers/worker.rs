use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::app::domain::Message;
use crate::app::services::translator::{TranslationRequest, Translator};

/// Runs each translation request on its own thread and reports the outcome
/// back on the app channel. Requests cannot be cancelled once started.
pub struct TranslationWorker {
    translator: Arc<dyn Translator>,
    sender: Sender<Message>,
}

impl TranslationWorker {
    pub fn new(translator: Arc<dyn Translator>, sender: Sender<Message>) -> Self {
        Self { translator, sender }
    }

    pub fn start(&self, request: TranslationRequest) -> JoinHandle<()> {
        let translator = Arc::clone(&self.translator);
        let sender = self.sender.clone();

        thread::spawn(move || {
            let result = translator.translate(&request.source_text, &request.file_name_hint);
            let message = Message::TranslationFinished {
                ticket: request.ticket,
                result,
            };
            if sender.send(message).is_err() {
                tracing::debug!(
                    request_id = request.ticket.request_id,
                    "App went away before the translation finished"
                );
            }
        })
    }
}
