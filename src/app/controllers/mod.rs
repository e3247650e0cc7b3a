//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the front end:
//! - The session controller (buffer state machine)
//! - The background translation worker

pub mod session;
pub mod worker;
