//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - The artifact registry
//! - The remote translation client
//! - Naming conventions
//! - Translation analytics
//! - The identity gate

pub mod analytics;
pub mod identity;
pub mod naming;
pub mod registry;
pub mod translator;
