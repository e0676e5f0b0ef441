//! Activity domain model.
//!
//! # Responsibility
//! - Define the canonical activity record and its paced/elevation variants.
//! - Define the plain-data wire record used by persistence.
//!
//! # Invariants
//! - Every activity is identified by an `ActivityId` fixed at construction.
//! - Variant behavior is selected by matching on `ActivityMetrics`, never by
//!   trait-object dispatch, so live and restored activities share one path.

pub mod activity;
pub mod record;
