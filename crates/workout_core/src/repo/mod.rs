//! Persistence layer for the activity collection.
//!
//! # Responsibility
//! - Define the durable string-keyed slot contract and its backends.
//! - Serialize the full ordered collection into one slot and read it back.
//!
//! # Invariants
//! - Writes are full-collection overwrites, never incremental.
//! - A missing slot is an empty collection, not an error.

pub mod activity_repo;
pub mod slot_repo;
