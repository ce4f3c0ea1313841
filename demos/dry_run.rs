//! Dry run example
//!
//! This example shows how to preview renames under a project
//! without touching any files.

use res_rename::{ConfigStore, ProjectRoot, RenameMode};

fn main() -> anyhow::Result<()> {
    let root = ProjectRoot::new(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));

    // Saved settings, or the defaults when there are none
    let mut config = ConfigStore::for_project(&root).load();
    config.add_extension(".ogg");

    println!("Running in DRY RUN mode - no files will be renamed\n");

    let report = res_rename::run(&config, root, RenameMode::DryRun)?;

    println!("Would rename {} files:", report.renamed);
    println!("{}", report.to_json()?);

    Ok(())
}
