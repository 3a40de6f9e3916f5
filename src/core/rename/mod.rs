//! Batch renaming of named items with literal or regex find/replace.
//!
//! The engine works on anything implementing [`Renameable`], tagged with an
//! [`ItemKind`] so a [`RenameRule`] can limit the batch to objects, collections,
//! or both.

mod engine;
mod item;
mod rule;

pub use engine::{apply, apply_to_kind, compute_replacement, RenameOutcome, RenameSummary};
pub use item::Renameable;
pub use rule::{validate, ItemKind, RenameRule};
