//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Artifact and ArtifactKind
//! - The session buffer and its translation state
//! - Settings
//! - Command and message types for the event flow

pub mod artifact;
pub mod buffer;
pub mod messages;
pub mod settings;

pub use artifact::{Artifact, ArtifactKind};
pub use buffer::{SessionBuffer, TranslationState, TranslationTicket};
pub use messages::{Command, Message};
pub use settings::Settings;
