//! Plain data exchanged with the note metadata provider.
//!
//! # Responsibility
//! - Describe one candidate note as handed over by the provider.
//! - Describe the event record produced for an included note.
//!
//! # Invariants
//! - Model types carry data only; parsing and evaluation live in `date`,
//!   `condition` and `service`.
//! - Nothing here refers to files, DOM nodes or UI state.

pub mod event;
pub mod metadata;

pub use event::{compare_events, EventRecord, ImageSource};
pub use metadata::{Frontmatter, MetadataValue, NoteInput};
