//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Artifact, SessionBuffer, Settings, Messages)
//! - `controllers/` - Orchestration (SessionController, TranslationWorker)
//! - `services/` - Business operations (registry, translator, naming, analytics, identity)
//! - `infrastructure/` - External integrations (storage, file import/export, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::session::{Effect, SessionController};
pub use domain::{Artifact, ArtifactKind, Command, Message, SessionBuffer, Settings, TranslationState};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::storage::{FileStore, MemoryStore, Store};
pub use services::translator::{GeminiClient, Translator};
pub use state::AppState;
