//! Filesystem helpers.
//!
//! - `atomic` - temp-and-rename writes used to replace the installed artifact
//! - `temp` - per-run scratch directories removed on drop

pub mod atomic;
pub mod temp;

pub use atomic::{atomic_copy, atomic_write};
pub use temp::{ScratchDir, ensure_dir};
