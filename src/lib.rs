//! # res-rename
//!
//! Batch-renames project resource files to snake_case.
//!
//! ## Features
//!
//! - CamelCase and space/hyphen separated names become `snake_case`
//! - Directory-prefix and extension filters decide which files are touched
//! - Optional user regex overrides with safe fallback to the defaults
//! - Per-file isolation: one failed rename never stops the run
//! - Collision detection and dry-run previews
//!
//! ## Quick Start
//!
//! ```no_run
//! use res_rename::{ConfigStore, FsIndex, ProjectRoot, RenameMode, Renamer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let root = ProjectRoot::new("./my-game");
//! let config = ConfigStore::for_project(&root).load();
//!
//! let renamer = Renamer::new(&config, root.clone())?;
//! let report = renamer.run(&FsIndex::new(root), RenameMode::Execute);
//! report.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Config**: [`RenameConfig`] selects directories and extensions, persisted by [`ConfigStore`]
//! 2. **Normalizer**: [`normalize`] with [`NamePatterns`] resolved once per run
//! 3. **Tree**: a [`FileIndex`] lists each directory node under the `res://` root
//! 4. **Renamer**: [`Renamer`] walks the tree and produces a [`RenameReport`]

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod normalize;
mod renamer;
mod report;
mod store;
mod tree;

pub use config::{is_valid_directory, is_valid_extension, RenameConfig, RenameConfigBuilder, ROOT_MARKER};
pub use error::{Error, Result};
pub use normalize::{
    normalize, normalize_file_name, split_file_name, NamePatterns, DEFAULT_CAMEL_PATTERN,
    DEFAULT_SEPARATOR_PATTERN,
};
pub use renamer::{RenameMode, RenameOutcome, Renamer, SkipReason};
pub use report::RenameReport;
pub use store::{ConfigStore, DEFAULT_CONFIG_PATH};
pub use tree::{find_project_root_from, FileEntry, FileIndex, FsIndex, ProjectRoot, PROJECT_FILE};

/// Renames every eligible file under `root` using `config`.
///
/// # Errors
///
/// Returns an error if the configuration has no valid directory or extension.
/// Individual file failures are reported in the returned [`RenameReport`].
///
/// # Examples
///
/// ```no_run
/// use res_rename::{run, ProjectRoot, RenameConfig, RenameMode};
///
/// # fn main() -> anyhow::Result<()> {
/// let report = run(&RenameConfig::default(), ProjectRoot::new("."), RenameMode::DryRun)?;
/// println!("{} files would be renamed", report.renamed);
/// # Ok(())
/// # }
/// ```
pub fn run(config: &RenameConfig, root: ProjectRoot, mode: RenameMode) -> Result<RenameReport> {
    let index = FsIndex::new(root.clone());
    Ok(Renamer::new(config, root)?.run(&index, mode))
}
