//! Utility modules shared by the release pipeline.
//!
//! - `backoff` - the fixed-delay retry loop around whole runs
//! - `fs` - atomic writes and scratch directories
//! - `platform` - shell selection for service commands

pub mod backoff;
pub mod fs;
pub mod platform;

pub use backoff::retry_with_delay;
pub use fs::{ScratchDir, atomic_copy, atomic_write, ensure_dir};
pub use platform::{get_shell_command, is_windows};
