//! In-memory activity collection.
//!
//! # Responsibility
//! - Own the ordered session collection of activities.
//! - Gate every append behind input validation.
//!
//! # Invariants
//! - Insertion order equals creation order; no reordering or deduplication.
//! - A rejected creation leaves the collection untouched.

pub mod activity_store;
