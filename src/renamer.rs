use crate::{
    config::{RenameConfig, ROOT_MARKER},
    error::{Error, Result},
    normalize::{normalize, NamePatterns},
    report::RenameReport,
    tree::{FileEntry, FileIndex, ProjectRoot},
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// Whether a run touches the file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameMode {
    /// Rename files on disk
    Execute,
    /// Compute and report renames without performing them
    DryRun,
}

impl RenameMode {
    /// Returns true for [`RenameMode::DryRun`].
    #[must_use]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// Why an eligible file was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The name is already in normalized form
    AlreadyNormalized,
}

/// Result of processing one eligible file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameOutcome {
    /// The file was renamed (or would be, in a dry run)
    Renamed {
        /// Root-relative source path
        from: String,
        /// Root-relative destination path
        to: String,
    },
    /// The file was not renamed
    Skipped {
        /// Root-relative path
        path: String,
        /// Why it was skipped
        reason: SkipReason,
    },
    /// The rename was attempted and failed
    Failed {
        /// Root-relative source path
        from: String,
        /// Root-relative destination path
        to: String,
        /// What went wrong
        error: Error,
    },
}

impl RenameOutcome {
    /// Returns true if this is a failure.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Default)]
struct RunState {
    outcomes: Vec<RenameOutcome>,
    directory_errors: Vec<Error>,
    /// destination -> source, for renames done in this run
    claimed: HashMap<String, String>,
    vacated: HashSet<String>,
}

/// Walks a project tree and renames eligible files to their normalized names.
///
/// Each file is handled in isolation: a failed rename is recorded and the
/// traversal moves on.
#[derive(Debug, Clone)]
pub struct Renamer {
    config: RenameConfig,
    root: ProjectRoot,
    patterns: NamePatterns,
}

impl Renamer {
    /// Creates a renamer, validating the configuration and resolving name patterns once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the configuration has no valid directory or extension.
    pub fn new(config: &RenameConfig, root: ProjectRoot) -> Result<Self> {
        let config = config.validated()?;
        let patterns = NamePatterns::resolve(&config);

        Ok(Self {
            config,
            root,
            patterns,
        })
    }

    /// The validated configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Returns true if the file passes both the directory and extension filters.
    #[must_use]
    pub fn is_eligible(&self, entry: &FileEntry) -> bool {
        self.config.matches_directory(&entry.path) && self.config.matches_extension(&entry.extension)
    }

    /// The normalized file name for `entry`.
    #[must_use]
    pub fn target_name(&self, entry: &FileEntry) -> String {
        normalize(&entry.name, &entry.extension, &self.patterns)
    }

    /// Traverses the tree from the root and renames every eligible file.
    ///
    /// Traversal is depth-first: a directory's files are processed before its
    /// subdirectories, each in the order the index returns them. Directories
    /// that no configured prefix can reach are not descended into.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use res_rename::{FsIndex, ProjectRoot, RenameConfig, RenameMode, Renamer};
    ///
    /// # fn main() -> res_rename::Result<()> {
    /// let root = ProjectRoot::new("./my-game");
    /// let renamer = Renamer::new(&RenameConfig::default(), root.clone())?;
    /// let report = renamer.run(&FsIndex::new(root), RenameMode::DryRun);
    /// report.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, index), fields(root = %self.root.dir().display()))]
    pub fn run(&self, index: &dyn FileIndex, mode: RenameMode) -> RenameReport {
        let start = Instant::now();
        info!("Starting rename run ({:?})", mode);

        let mut state = RunState::default();
        self.visit(index, ROOT_MARKER, mode, &mut state);

        let report = RenameReport::new(
            mode.is_dry_run(),
            state.outcomes,
            state.directory_errors,
            start.elapsed(),
        );

        info!(
            "Rename run finished: {} renamed, {} skipped, {} failed in {:.2}s",
            report.renamed,
            report.skipped,
            report.failed,
            report.duration.as_secs_f64()
        );
        report
    }

    fn visit(&self, index: &dyn FileIndex, dir: &str, mode: RenameMode, state: &mut RunState) {
        match index.files(dir) {
            Ok(files) => {
                for path in files {
                    let entry = FileEntry::from_path(path);
                    if !self.is_eligible(&entry) {
                        trace!("Not eligible: {}", entry.path);
                        continue;
                    }
                    let outcome = self.process_file(&entry, mode, state);
                    state.outcomes.push(outcome);
                }
            }
            Err(e) => {
                warn!("Cannot list files in {}: {}", dir, e);
                state.directory_errors.push(e);
            }
        }

        match index.subdirs(dir) {
            Ok(subdirs) => {
                for subdir in subdirs {
                    if self.may_contain_eligible(&subdir) {
                        self.visit(index, &subdir, mode, state);
                    } else {
                        trace!("Not descending into {}", subdir);
                    }
                }
            }
            Err(e) => {
                warn!("Cannot list subdirectories of {}: {}", dir, e);
                state.directory_errors.push(e);
            }
        }
    }

    // A file under `dir` starts with `dir`; it can match prefix `p` only if one
    // of `dir` and `p` is a prefix of the other.
    fn may_contain_eligible(&self, dir: &str) -> bool {
        self.config
            .directories
            .iter()
            .any(|p| p.starts_with(dir) || dir.starts_with(p.as_str()))
    }

    fn process_file(&self, entry: &FileEntry, mode: RenameMode, state: &mut RunState) -> RenameOutcome {
        let new_name = self.target_name(entry);
        if new_name == entry.file_name() {
            debug!("Already normalized: {}", entry.path);
            return RenameOutcome::Skipped {
                path: entry.path.clone(),
                reason: SkipReason::AlreadyNormalized,
            };
        }

        let from = entry.path.clone();
        let to = entry.sibling(&new_name);

        match self.try_rename(entry, &new_name, &to, mode, state) {
            Ok(()) => {
                if mode.is_dry_run() {
                    info!("Would rename: {} -> {}", from, to);
                } else {
                    info!("Renamed: {} -> {}", from, to);
                }
                state.claimed.insert(to.clone(), from.clone());
                state.vacated.insert(from.clone());
                RenameOutcome::Renamed { from, to }
            }
            Err(error) => {
                warn!("Failed to rename {} -> {}: {}", from, to, error);
                RenameOutcome::Failed { from, to, error }
            }
        }
    }

    fn try_rename(
        &self,
        entry: &FileEntry,
        new_name: &str,
        to: &str,
        mode: RenameMode,
        state: &RunState,
    ) -> Result<()> {
        if let Some(source) = state.claimed.get(to) {
            return Err(Error::collision(to, Some(source.clone())));
        }

        let disk_from = self.root.globalize(&entry.path)?;
        let disk_to = self.root.globalize(to)?;

        let exists = disk_to.symlink_metadata().is_ok()
            && !(mode.is_dry_run() && state.vacated.contains(to));

        // On case-insensitive file systems the destination of a case-only
        // rename "exists" because it is the source itself. It is only taken
        // if the directory holds an entry spelled exactly like the target.
        let case_only = new_name.to_lowercase() == entry.file_name().to_lowercase();
        if exists && (!case_only || has_exact_entry(&disk_to, new_name)?) {
            return Err(Error::collision(to, None));
        }

        if mode.is_dry_run() {
            return Ok(());
        }

        debug!("Renaming on disk: {} -> {}", disk_from.display(), disk_to.display());
        fs::rename(&disk_from, &disk_to).map_err(|e| Error::rename(&entry.path, to, &e))
    }
}

fn has_exact_entry(path: &Path, name: &str) -> Result<bool> {
    let Some(dir) = path.parent() else {
        return Ok(false);
    };
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        if entry.file_name() == name {
            return Ok(true);
        }
    }
    Ok(false)
}
