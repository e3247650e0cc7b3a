//! Session controller: owns the editor buffer, mediates translation
//! requests and keeps the registry in sync with their results.
//!
//! Transitions never perform I/O beyond persistence; anything else the
//! caller must do (export a file, start a request, tell the user) comes back
//! as an [`Effect`].

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::app::domain::{Artifact, ArtifactKind, SessionBuffer, Settings, TranslationState, TranslationTicket};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::files::ImportedFile;
use crate::app::infrastructure::storage::{Store, SESSION_KEY};
use crate::app::services::naming::{export_name, file_name_hint, translated_name, with_extension};
use crate::app::services::registry::FileRegistry;
use crate::app::services::translator::TranslationRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Export { file_name: String, content: String },
    StartTranslation(TranslationRequest),
    Notify(String),
}

pub struct SessionController {
    buffer: SessionBuffer,
    registry: FileRegistry,
    settings: Settings,
    store: Rc<dyn Store>,
}

impl SessionController {
    /// Restore registry and buffer from `store`. Unreadable buffer state
    /// starts a fresh buffer.
    pub fn load(store: Rc<dyn Store>, settings: Settings) -> Self {
        let registry = FileRegistry::load(store.clone());
        let mut buffer = match store.get(SESSION_KEY) {
            Ok(Some(json)) => serde_json::from_str::<SessionBuffer>(&json).unwrap_or_else(|e| {
                debug!("Discarding unreadable session buffer: {}", e);
                SessionBuffer::new()
            }),
            Ok(None) => SessionBuffer::new(),
            Err(e) => {
                debug!("Session buffer unavailable: {}", e);
                SessionBuffer::new()
            }
        };
        buffer.normalize_after_load();

        Self {
            buffer,
            registry,
            settings,
            store,
        }
    }

    pub fn buffer(&self) -> &SessionBuffer {
        &self.buffer
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start over with an empty, unnamed buffer.
    pub fn new_buffer(&mut self) {
        self.buffer.reset();
        self.persist_buffer();
    }

    /// Load a local file as the new original buffer.
    pub fn import(&mut self, file: ImportedFile) {
        self.buffer.reset();
        self.buffer.active_file_name = file.name;
        self.buffer.original_text = file.content;
        info!("Imported {}", self.buffer.active_file_name);
        self.persist_buffer();
    }

    pub fn edit_original(&mut self, text: String) {
        self.buffer.original_text = text;
        self.persist_buffer();
    }

    pub fn edit_translated(&mut self, text: String) {
        self.buffer.translated_text = text;
        self.persist_buffer();
    }

    /// Register the original buffer under the active name and export it.
    ///
    /// `name` is the answer to the name prompt: it is required when the
    /// buffer has no name and renames the buffer when given.
    pub fn save(&mut self, name: Option<&str>) -> Result<Vec<Effect>> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None if !self.buffer.active_file_name.is_empty() => self.buffer.active_file_name.clone(),
            None => return Err(AppError::UserInputMissing("file name".to_string())),
        };

        self.buffer.active_file_name = name.clone();
        let content = self.buffer.original_text.clone();
        self.registry.upsert(Artifact::original(name.clone(), content.clone()));
        self.persist_buffer();
        info!("Saved {}", name);

        Ok(vec![Effect::Export {
            file_name: export_name(&name, ArtifactKind::Original, &self.settings),
            content,
        }])
    }

    /// Move to `in_flight` and hand back the request to run.
    pub fn request_translation(&mut self) -> Result<Vec<Effect>> {
        if self.buffer.is_in_flight() {
            return Err(AppError::TranslationInProgress);
        }
        if self.buffer.original_text.trim().is_empty() {
            return Err(AppError::NothingToTranslate);
        }

        let ticket = self.buffer.issue_ticket();
        let request = TranslationRequest {
            ticket,
            source_text: self.buffer.original_text.clone(),
            file_name_hint: file_name_hint(&self.buffer.active_file_name, &self.settings),
        };
        self.persist_buffer();
        info!(request_id = ticket.request_id, file = %request.file_name_hint, "Translation requested");

        Ok(vec![Effect::StartTranslation(request)])
    }

    /// Apply the outcome of the request identified by `ticket`. Results for
    /// a request that is no longer the buffer's pending one are dropped.
    pub fn finish_translation(
        &mut self,
        ticket: TranslationTicket,
        result: std::result::Result<String, String>,
    ) -> Result<Vec<Effect>> {
        if !self.buffer.accepts(ticket) {
            debug!(
                request_id = ticket.request_id,
                generation = ticket.generation,
                current = self.buffer.generation,
                "Ignoring stale translation result"
            );
            return Ok(Vec::new());
        }

        match result {
            Ok(text) => {
                let source_name = file_name_hint(&self.buffer.active_file_name, &self.settings);
                let target_name = translated_name(&source_name, &self.settings);
                let derived_from = Some(self.buffer.active_file_name.clone()).filter(|n| !n.is_empty());

                self.buffer.pending = None;
                self.buffer.translated_text = text.clone();
                self.buffer.translation_visible = true;
                self.buffer.translation_state = TranslationState::Completed;
                self.registry.upsert(Artifact::translated(target_name.clone(), text, derived_from));
                self.persist_buffer();
                info!(request_id = ticket.request_id, "Translation stored as {}", target_name);

                Ok(vec![Effect::Notify(format!("Translated into {}", target_name))])
            }
            Err(message) => {
                self.buffer.settle_idle();
                self.persist_buffer();
                warn!(request_id = ticket.request_id, "Translation failed: {}", message);
                Err(AppError::TranslationFailed(message))
            }
        }
    }

    /// Load an artifact into the slot matching its kind. Opening a
    /// translation also loads the original it came from, when registered.
    pub fn open(&mut self, name: &str) -> Result<()> {
        let artifact = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::UnknownArtifact(name.to_string()))?;

        self.buffer.reset();
        match artifact.kind {
            ArtifactKind::Original => {
                self.buffer.active_file_name = artifact.name;
                self.buffer.original_text = artifact.content;
            }
            ArtifactKind::Translated => {
                // The active name is the save target; it must stay on the
                // original side or a save would overwrite the translation.
                let source_name = artifact
                    .derived_from
                    .unwrap_or_else(|| with_extension(&artifact.name, &self.settings.source_extension));
                if let Some(source) = self
                    .registry
                    .get(&source_name)
                    .filter(|a| a.kind == ArtifactKind::Original)
                {
                    self.buffer.original_text = source.content.clone();
                }
                self.buffer.active_file_name = source_name;
                self.buffer.translated_text = artifact.content;
                self.buffer.translation_state = TranslationState::Completed;
                self.buffer.translation_visible = true;
            }
        }
        self.persist_buffer();
        info!("Opened {}", name);
        Ok(())
    }

    /// Remove an artifact; deleting the active one also clears the buffer.
    /// Returns whether the artifact existed.
    pub fn delete(&mut self, name: &str) -> bool {
        let removed = self.registry.remove(name);
        if !name.is_empty() && name == self.buffer.active_file_name {
            self.buffer.reset();
            self.persist_buffer();
        }
        removed
    }

    fn persist_buffer(&self) {
        let result = serde_json::to_string(&self.buffer)
            .map_err(AppError::from)
            .and_then(|json| self.store.set(SESSION_KEY, &json));
        if let Err(e) = result {
            warn!("Buffer changes are not persisted: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::infrastructure::storage::MemoryStore;

    fn controller() -> (SessionController, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        (SessionController::load(store.clone(), Settings::default()), store)
    }

    fn imported(name: &str, content: &str) -> ImportedFile {
        ImportedFile {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    fn start(controller: &mut SessionController) -> TranslationRequest {
        match controller.request_translation().unwrap().pop() {
            Some(Effect::StartTranslation(request)) => request,
            other => panic!("expected a translation request, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_source_never_starts() {
        let (mut c, _) = controller();
        assert!(matches!(c.request_translation(), Err(AppError::NothingToTranslate)));
        c.edit_original("  \n".to_string());
        assert!(matches!(c.request_translation(), Err(AppError::NothingToTranslate)));
        assert_eq!(c.buffer().translation_state, TranslationState::Idle);
    }

    #[test]
    fn test_second_request_rejected_while_in_flight() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int main(){}"));
        start(&mut c);
        assert!(matches!(c.request_translation(), Err(AppError::TranslationInProgress)));
        assert!(c.buffer().is_consistent());
    }

    #[test]
    fn test_successful_translation() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int main(){}"));
        let request = start(&mut c);
        assert_eq!(request.file_name_hint, "a.c");
        assert_eq!(request.source_text, "int main(){}");

        let effects = c.finish_translation(request.ticket, Ok("fn main() {}".to_string())).unwrap();
        assert_eq!(effects, vec![Effect::Notify("Translated into a.rs".to_string())]);

        let artifact = c.registry().get("a.rs").unwrap();
        assert_eq!(artifact.kind, ArtifactKind::Translated);
        assert_eq!(artifact.content, "fn main() {}");
        assert_eq!(artifact.derived_from.as_deref(), Some("a.c"));
        assert_eq!(c.buffer().translation_state, TranslationState::Completed);
        assert!(c.buffer().translation_visible);
        assert_eq!(c.buffer().translated_text, "fn main() {}");
    }

    #[test]
    fn test_untitled_translation_name() {
        let (mut c, _) = controller();
        c.edit_original("int x;".to_string());
        let request = start(&mut c);
        assert_eq!(request.file_name_hint, "untitled.c");
        c.finish_translation(request.ticket, Ok("static X: i32 = 0;".to_string())).unwrap();
        let artifact = c.registry().get("untitled.rs").unwrap();
        assert!(artifact.derived_from.is_none());
    }

    #[test]
    fn test_failed_translation_returns_to_idle() {
        let (mut c, store) = controller();
        c.import(imported("a.c", "int main(){}"));
        c.save(None).unwrap();
        let before = store.raw(crate::app::infrastructure::storage::REGISTRY_KEY);

        let request = start(&mut c);
        let err = c.finish_translation(request.ticket, Err("network down".to_string())).unwrap_err();
        assert!(matches!(err, AppError::TranslationFailed(ref m) if m == "network down"));
        assert_eq!(c.buffer().translation_state, TranslationState::Idle);
        assert!(!c.buffer().translation_visible);
        assert!(c.buffer().is_consistent());
        assert_eq!(store.raw(crate::app::infrastructure::storage::REGISTRY_KEY), before);
        assert_eq!(c.registry().len(), 1);
    }

    #[test]
    fn test_failure_after_completed_hides_translation() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int main(){}"));
        let first = start(&mut c);
        c.finish_translation(first.ticket, Ok("fn main() {}".to_string())).unwrap();

        let second = start(&mut c);
        assert!(c.buffer().is_consistent());
        let _ = c.finish_translation(second.ticket, Err("quota".to_string()));
        assert_eq!(c.buffer().translation_state, TranslationState::Idle);
        assert!(!c.buffer().translation_visible);
    }

    #[test]
    fn test_stale_result_after_switching_buffers() {
        let (mut c, _) = controller();
        c.import(imported("b.c", "int b;"));
        c.save(None).unwrap();
        c.import(imported("a.c", "int a;"));
        let request = start(&mut c);

        c.open("b.c").unwrap();
        let effects = c.finish_translation(request.ticket, Ok("static A: i32;".to_string())).unwrap();

        assert!(effects.is_empty());
        assert!(!c.registry().contains("a.rs"));
        assert_eq!(c.buffer().active_file_name, "b.c");
        assert_eq!(c.buffer().translation_state, TranslationState::Idle);
        assert!(c.buffer().translated_text.is_empty());
    }

    #[test]
    fn test_stale_failure_is_ignored_too() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int a;"));
        let old = start(&mut c);
        c.import(imported("a.c", "int a2;"));
        let current = start(&mut c);

        assert!(c.finish_translation(old.ticket, Err("late".to_string())).unwrap().is_empty());
        assert!(c.buffer().is_in_flight());
        assert!(c.finish_translation(current.ticket, Ok("ok".to_string())).is_ok());
        assert_eq!(c.buffer().translation_state, TranslationState::Completed);
    }

    #[test]
    fn test_save_requires_name() {
        let (mut c, _) = controller();
        c.edit_original("int x;".to_string());
        assert!(matches!(c.save(None), Err(AppError::UserInputMissing(_))));
        assert!(matches!(c.save(Some("  ")), Err(AppError::UserInputMissing(_))));
        assert!(c.registry().is_empty());
        assert!(c.buffer().active_file_name.is_empty());
    }

    #[test]
    fn test_save_with_prompted_name() {
        let (mut c, _) = controller();
        c.edit_original("int x;".to_string());
        let effects = c.save(Some("x")).unwrap();
        assert_eq!(
            effects,
            vec![Effect::Export {
                file_name: "x.c".to_string(),
                content: "int x;".to_string()
            }]
        );
        assert_eq!(c.buffer().active_file_name, "x");
        assert_eq!(c.registry().get("x").unwrap().kind, ArtifactKind::Original);
    }

    #[test]
    fn test_save_is_independent_of_translation_state() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int a;"));
        start(&mut c);
        c.save(None).unwrap();
        assert!(c.buffer().is_in_flight());
        assert_eq!(c.registry().get("a.c").unwrap().content, "int a;");
    }

    #[test]
    fn test_open_original_hides_translation() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int main(){}"));
        c.save(None).unwrap();
        let request = start(&mut c);
        c.finish_translation(request.ticket, Ok("fn main() {}".to_string())).unwrap();
        assert!(c.buffer().translation_visible);

        c.open("a.c").unwrap();
        assert!(!c.buffer().translation_visible);
        assert_eq!(c.buffer().translation_state, TranslationState::Idle);
        assert_eq!(c.buffer().original_text, "int main(){}");
        assert!(c.buffer().translated_text.is_empty());
    }

    #[test]
    fn test_open_translated_shows_translation() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int main(){}"));
        let request = start(&mut c);
        c.finish_translation(request.ticket, Ok("fn main() {}".to_string())).unwrap();
        c.new_buffer();

        c.open("a.rs").unwrap();
        assert_eq!(c.buffer().translation_state, TranslationState::Completed);
        assert!(c.buffer().translation_visible);
        assert_eq!(c.buffer().translated_text, "fn main() {}");
        assert_eq!(c.buffer().active_file_name, "a.c");
        assert!(c.buffer().original_text.is_empty());
    }

    #[test]
    fn test_open_translated_then_save_keeps_translation() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int main(){}"));
        c.save(None).unwrap();
        let request = start(&mut c);
        c.finish_translation(request.ticket, Ok("fn main() {}".to_string())).unwrap();
        c.new_buffer();

        c.open("a.rs").unwrap();
        assert_eq!(c.buffer().original_text, "int main(){}");
        c.save(None).unwrap();

        let translated = c.registry().get("a.rs").unwrap();
        assert_eq!(translated.kind, ArtifactKind::Translated);
        assert_eq!(translated.content, "fn main() {}");
        let original = c.registry().get("a.c").unwrap();
        assert_eq!(original.kind, ArtifactKind::Original);
        assert_eq!(original.content, "int main(){}");
        assert_eq!(c.registry().len(), 2);
    }

    #[test]
    fn test_open_translated_without_provenance() {
        let (mut c, _) = controller();
        c.edit_original("int x;".to_string());
        let request = start(&mut c);
        c.finish_translation(request.ticket, Ok("static X: i32 = 0;".to_string())).unwrap();

        c.open("untitled.rs").unwrap();
        assert_eq!(c.buffer().active_file_name, "untitled.c");
        c.edit_original("int y;".to_string());
        c.save(None).unwrap();
        assert_eq!(c.registry().get("untitled.rs").unwrap().kind, ArtifactKind::Translated);
        assert_eq!(c.registry().get("untitled.c").unwrap().content, "int y;");
    }

    #[test]
    fn test_translating_target_named_original_keeps_both() {
        let (mut c, _) = controller();
        c.import(imported("b.rs", "int main(){}"));
        c.save(None).unwrap();
        let request = start(&mut c);
        c.finish_translation(request.ticket, Ok("fn main() {}".to_string())).unwrap();

        let original = c.registry().get("b.rs").unwrap();
        assert_eq!(original.kind, ArtifactKind::Original);
        assert_eq!(original.content, "int main(){}");
        let translated = c.registry().get("b.rs.rs").unwrap();
        assert_eq!(translated.kind, ArtifactKind::Translated);
        assert_eq!(translated.derived_from.as_deref(), Some("b.rs"));
    }

    #[test]
    fn test_open_unknown() {
        let (mut c, _) = controller();
        c.edit_original("keep me".to_string());
        assert!(matches!(c.open("ghost.c"), Err(AppError::UnknownArtifact(_))));
        assert_eq!(c.buffer().original_text, "keep me");
    }

    #[test]
    fn test_delete_active_resets_buffer() {
        let (mut c, _) = controller();
        c.import(imported("a.c", "int main(){}"));
        c.save(None).unwrap();
        let request = start(&mut c);
        c.finish_translation(request.ticket, Ok("fn main() {}".to_string())).unwrap();

        assert!(c.delete("a.c"));
        let buffer = c.buffer();
        assert!(buffer.active_file_name.is_empty());
        assert!(buffer.original_text.is_empty());
        assert!(buffer.translated_text.is_empty());
        assert_eq!(buffer.translation_state, TranslationState::Idle);
        assert!(!buffer.translation_visible);
        // The translation is a separate artifact and stays
        assert!(c.registry().contains("a.rs"));
    }

    #[test]
    fn test_delete_other_keeps_buffer() {
        let (mut c, _) = controller();
        c.import(imported("b.c", "int b;"));
        c.save(None).unwrap();
        c.import(imported("a.c", "int a;"));
        assert!(c.delete("b.c"));
        assert!(!c.delete("b.c"));
        assert_eq!(c.buffer().active_file_name, "a.c");
        assert_eq!(c.buffer().original_text, "int a;");
    }

    #[test]
    fn test_buffer_survives_reload() {
        let (mut c, store) = controller();
        c.import(imported("a.c", "int a;"));
        c.edit_translated("draft".to_string());
        let reloaded = SessionController::load(store, Settings::default());
        assert_eq!(reloaded.buffer().active_file_name, "a.c");
        assert_eq!(reloaded.buffer().original_text, "int a;");
        assert_eq!(reloaded.buffer().translated_text, "draft");
    }

    #[test]
    fn test_in_flight_buffer_reloads_idle() {
        let (mut c, store) = controller();
        c.import(imported("a.c", "int a;"));
        start(&mut c);
        let reloaded = SessionController::load(store, Settings::default());
        assert_eq!(reloaded.buffer().translation_state, TranslationState::Idle);
        assert!(reloaded.buffer().is_consistent());
    }

    #[test]
    fn test_corrupt_buffer_reloads_empty() {
        let store = Rc::new(MemoryStore::new());
        store.seed(SESSION_KEY, "[[[");
        let c = SessionController::load(store, Settings::default());
        assert_eq!(c.buffer(), &SessionBuffer::new());
    }
}
