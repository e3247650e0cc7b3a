//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Key-value persistence (files on disk, or memory for tests)
//! - Local file import and export
//! - Error types

pub mod error;
pub mod files;
pub mod storage;
