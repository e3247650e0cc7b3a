use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use tracing::{info, warn};

use super::controllers::session::{Effect, SessionController};
use super::controllers::worker::TranslationWorker;
use super::domain::{Command, Message, Settings};
use super::infrastructure::error::Result;
use super::infrastructure::files::{export_file, import_file};
use super::infrastructure::storage::Store;
use super::services::identity::Identity;
use super::services::translator::Translator;

/// Main application coordinator: routes commands into the session
/// controller, carries out the effects it returns and feeds background
/// results back in.
pub struct AppState {
    pub session: SessionController,
    pub identity: Identity,
    worker: TranslationWorker,
    receiver: Receiver<Message>,
    outstanding: usize,
    notices: Vec<String>,
}

impl AppState {
    pub fn new(settings: Settings, store: Rc<dyn Store>, translator: Arc<dyn Translator>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            session: SessionController::load(store.clone(), settings),
            identity: Identity::load(store),
            worker: TranslationWorker::new(translator, sender),
            receiver,
            outstanding: 0,
            notices: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login(token) => self.identity.login(&token),
            Command::Logout => {
                self.identity.logout();
                Ok(())
            }
            other => {
                self.identity.require()?;
                self.apply(other)
            }
        }
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::NewBuffer => self.session.new_buffer(),
            Command::Import(path) => {
                let file = import_file(&path)?;
                self.session.import(file);
            }
            Command::EditOriginal(text) => self.session.edit_original(text),
            Command::EditTranslated(text) => self.session.edit_translated(text),
            Command::Save(name) => {
                let effects = self.session.save(name.as_deref())?;
                self.run_effects(effects);
            }
            Command::Translate => {
                let effects = self.session.request_translation()?;
                self.run_effects(effects);
            }
            Command::Open(name) => self.session.open(&name)?,
            Command::Delete(name) => {
                if !self.session.delete(&name) {
                    self.notify(format!("No artifact named \"{}\"", name));
                }
            }
            // Handled by dispatch before the gate
            Command::Login(_) | Command::Logout => {}
        }
        Ok(())
    }

    pub fn handle_message(&mut self, message: Message) -> Result<()> {
        match message {
            Message::TranslationFinished { ticket, result } => {
                self.outstanding = self.outstanding.saturating_sub(1);
                let effects = self.session.finish_translation(ticket, result)?;
                self.run_effects(effects);
            }
        }
        Ok(())
    }

    /// Handle whatever background results have already arrived.
    pub fn pump(&mut self) -> Result<()> {
        while let Ok(message) = self.receiver.try_recv() {
            self.handle_message(message)?;
        }
        Ok(())
    }

    /// Block until every started request has reported back. Returns the
    /// first failure after all results are in.
    pub fn wait_for_translations(&mut self) -> Result<()> {
        let mut first_error = None;
        while self.outstanding > 0 {
            let Ok(message) = self.receiver.recv() else {
                break;
            };
            if let Err(e) = self.handle_message(message) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: String) {
        info!("{}", notice);
        self.notices.push(notice);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Export { file_name, content } => {
                    let dir = self.session.settings().export_dir();
                    match export_file(&dir, &file_name, &content) {
                        Ok(path) => self.notify(format!("Exported {}", path.display())),
                        Err(e) => warn!("Export of {} failed: {}", file_name, e),
                    }
                }
                Effect::StartTranslation(request) => {
                    self.outstanding += 1;
                    self.worker.start(request);
                }
                Effect::Notify(notice) => self.notify(notice),
            }
        }
    }
}
