//! Presentation coordination between the activity service and external
//! rendering surfaces.
//!
//! # Responsibility
//! - Declare the capabilities the core calls into (geolocation, map, list,
//!   entry form, alerts).
//! - Translate host events into service calls and render requests.
//!
//! # Invariants
//! - The core never inspects surface internals; it only issues requests.
//! - Rendering state (markers, list items) is owned by the surfaces.

pub mod capability;
pub mod coordinator;
pub mod form;
pub mod view;
