use crate::{error::Error, error::Result, renamer::RenameOutcome};
use serde::Serialize;
use std::time::Duration;

/// Summary of a rename run.
#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    /// Whether the run was a dry run
    pub dry_run: bool,

    /// Number of files renamed (or that would be renamed)
    pub renamed: usize,

    /// Number of eligible files already normalized
    pub skipped: usize,

    /// Number of files whose rename failed
    pub failed: usize,

    /// Per-file outcomes in traversal order
    pub outcomes: Vec<RenameOutcome>,

    /// Directories that could not be listed
    pub directory_errors: Vec<Error>,

    /// Total execution time
    pub duration: Duration,

    /// Generation timestamp
    pub generated_at: String,
}

impl RenameReport {
    /// Creates a report from the outcomes of a run.
    #[must_use]
    pub fn new(
        dry_run: bool,
        outcomes: Vec<RenameOutcome>,
        directory_errors: Vec<Error>,
        duration: Duration,
    ) -> Self {
        let mut renamed = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for outcome in &outcomes {
            match outcome {
                RenameOutcome::Renamed { .. } => renamed += 1,
                RenameOutcome::Skipped { .. } => skipped += 1,
                RenameOutcome::Failed { .. } => failed += 1,
            }
        }

        Self {
            dry_run,
            renamed,
            skipped,
            failed,
            outcomes,
            directory_errors,
            duration,
            generated_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }

    /// Failed outcomes in traversal order.
    pub fn failures(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Returns true if any file failed or any directory could not be listed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || !self.directory_errors.is_empty()
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        let title = if self.dry_run {
            "Rename Dry Run Summary"
        } else {
            "Rename Summary"
        };
        let renamed_label = if self.dry_run { "Would rename:" } else { "Renamed:" };

        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║ {:<53} ║", title);
        println!("╠═══════════════════════════════════════════════════════╣");
        println!("║ {:<21} {:>8}                        ║", renamed_label, self.renamed);
        println!("║ {:<21} {:>8}                        ║", "Skipped:", self.skipped);
        println!("║ {:<21} {:>8}                        ║", "Failed:", self.failed);
        println!(
            "║ {:<21} {:>8.2}s                       ║",
            "Duration:",
            self.duration.as_secs_f64()
        );
        println!("╚═══════════════════════════════════════════════════════╝");

        for outcome in &self.outcomes {
            if let RenameOutcome::Renamed { from, to } = outcome {
                println!("  {from} -> {to}");
            }
        }

        if self.has_failures() {
            println!("\nFailures:");
            for outcome in self.failures() {
                if let RenameOutcome::Failed { from, error, .. } = outcome {
                    println!("  ✗ {from}: {error}");
                }
            }
            for error in &self.directory_errors {
                println!("  ✗ {error}");
            }
        }

        if self.dry_run {
            println!("\n⚠ No files were renamed (dry run mode)");
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renamer::SkipReason;

    fn sample() -> RenameReport {
        RenameReport::new(
            false,
            vec![
                RenameOutcome::Renamed {
                    from: "res://a/FooBar.png".to_string(),
                    to: "res://a/foo_bar.png".to_string(),
                },
                RenameOutcome::Skipped {
                    path: "res://a/ok.png".to_string(),
                    reason: SkipReason::AlreadyNormalized,
                },
                RenameOutcome::Failed {
                    from: "res://a/X.png".to_string(),
                    to: "res://a/x.png".to_string(),
                    error: Error::collision("res://a/x.png", None),
                },
            ],
            vec![],
            Duration::from_millis(20),
        )
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!((report.renamed, report.skipped, report.failed), (1, 1, 1));
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_empty_report_has_no_failures() {
        let report = RenameReport::new(true, vec![], vec![], Duration::ZERO);
        assert!(!report.has_failures());
        assert_eq!(report.renamed, 0);
    }

    #[test]
    fn test_json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["renamed"], 1);
        assert_eq!(value["outcomes"][0]["status"], "renamed");
        assert_eq!(value["outcomes"][1]["reason"], "already_normalized");
        assert_eq!(value["outcomes"][2]["status"], "failed");
        assert_eq!(
            value["outcomes"][2]["error"],
            "Destination 'res://a/x.png' is already taken"
        );
    }
}
