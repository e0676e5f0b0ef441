//! Core use-case services.
//!
//! # Responsibility
//! - Compose the in-memory collection with its persistence adapter.
//! - Keep presentation code decoupled from storage details.

pub mod activity_service;
