use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use res_rename::{
    find_project_root_from, normalize_file_name, ConfigStore, FsIndex, NamePatterns, ProjectRoot,
    RenameConfig, RenameMode, Renamer,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "res-rename",
    version,
    author,
    about = "Batch-rename project resource files to snake_case",
    long_about = "Batch-rename project resource files to snake_case.\n\n\
    Files under the configured res:// directories whose extension is in the \
    configured set are renamed in place: CamelCase boundaries and runs of spaces \
    or hyphens become underscores, and the whole name is lowercased.\n\n\
    USAGE EXAMPLES:\n  \
      # Preview renames with the saved settings\n  \
      res-rename rename --dry-run\n\n  \
      # Rename PNGs and scenes under res://assets/\n  \
      res-rename rename --dir res://assets/ --ext .png --ext .tscn\n\n  \
      # Add a directory to the saved settings\n  \
      res-rename config add-dir res://ui/"
)]
struct Cli {
    /// Project root directory (defaults to the nearest parent containing project.godot)
    #[arg(short, long, global = true, value_name = "PATH")]
    project: Option<PathBuf>,

    /// Settings file (defaults to addons/rename_tool/rename_tool.toml in the project)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rename eligible files
    Rename(RenameArgs),

    /// Inspect or edit the saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the normalized form of each name
    Normalize {
        /// File names to normalize
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        patterns: PatternArgs,
    },
}

#[derive(Args, Debug)]
struct RenameArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    #[command(flatten)]
    patterns: PatternArgs,

    /// Dry run (don't rename files)
    #[arg(long)]
    dry_run: bool,

    /// Don't persist the effective settings before renaming
    #[arg(long)]
    no_save: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Directory prefix to process, e.g. res://assets/ (replaces saved directories)
    #[arg(short, long = "dir", value_name = "PREFIX")]
    dirs: Vec<String>,

    /// Extension to process, e.g. .png (replaces saved extensions)
    #[arg(short, long = "ext", value_name = "EXT")]
    exts: Vec<String>,
}

#[derive(Args, Debug)]
struct PatternArgs {
    /// Camel-boundary regex; `_` is inserted between capture groups 1 and 2
    #[arg(long, value_name = "REGEX")]
    camel_regex: Option<String>,

    /// Separator regex; every match becomes `_`
    #[arg(long, value_name = "REGEX")]
    separator_regex: Option<String>,

    /// Turn the regex overrides on or off
    #[arg(long, value_name = "BOOL")]
    custom_regex: Option<bool>,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the settings
    Show,
    /// Save the settings, applying any given options
    Save {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        patterns: PatternArgs,
    },
    /// Add a directory prefix
    AddDir {
        /// Directory prefix, e.g. res://assets/
        dir: String,
    },
    /// Remove a directory prefix
    RemoveDir {
        /// Directory prefix
        dir: String,
    },
    /// Add an extension
    AddExt {
        /// Extension, e.g. .png
        ext: String,
    },
    /// Remove an extension
    RemoveExt {
        /// Extension
        ext: String,
    },
    /// Restore the default settings
    Reset,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    match cli.command {
        Command::Normalize { names, patterns } => {
            let patterns = if patterns.custom_regex.unwrap_or(false) {
                NamePatterns::try_from_overrides(
                    patterns.camel_regex.as_deref(),
                    patterns.separator_regex.as_deref(),
                )
                .context("Invalid name pattern")?
            } else {
                NamePatterns::default()
            };
            for name in names {
                println!("{name} -> {}", normalize_file_name(&name, &patterns));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Rename(args) => {
            let root = resolve_project_root(cli.project)?;
            let store = resolve_store(cli.config, &root);
            rename(&root, &store, args)
        }
        Command::Config { action } => {
            let root = resolve_project_root(cli.project)?;
            let store = resolve_store(cli.config, &root);
            edit_config(&store, action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn rename(root: &ProjectRoot, store: &ConfigStore, args: RenameArgs) -> anyhow::Result<ExitCode> {
    let mut config = store.load();
    apply_selection(&mut config, args.selection);
    apply_patterns(&mut config, args.patterns);

    let config = if args.dry_run || args.no_save {
        config
    } else {
        store.save(&config).context("Failed to save settings")?
    };

    let mode = if args.dry_run {
        RenameMode::DryRun
    } else {
        RenameMode::Execute
    };

    let renamer = Renamer::new(&config, root.clone()).context("Invalid rename settings")?;
    let report = renamer.run(&FsIndex::new(root.clone()), mode);

    if args.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        report.print_summary();
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn edit_config(store: &ConfigStore, action: ConfigAction) -> anyhow::Result<()> {
    let mut config = store.load();

    match action {
        ConfigAction::Show => {
            print_config(store, &config);
            return Ok(());
        }
        ConfigAction::Save {
            selection,
            patterns,
        } => {
            apply_selection(&mut config, selection);
            apply_patterns(&mut config, patterns);
        }
        ConfigAction::AddDir { dir } => {
            if !config.add_directory(&dir) {
                info!("Directory '{}' is already configured", dir);
            }
        }
        ConfigAction::RemoveDir { dir } => {
            if !config.remove_directory(&dir) {
                info!("Directory '{}' is not configured", dir);
            }
        }
        ConfigAction::AddExt { ext } => {
            if !config.add_extension(&ext) {
                info!("Extension '{}' is already configured", ext);
            }
        }
        ConfigAction::RemoveExt { ext } => {
            if !config.remove_extension(&ext) {
                info!("Extension '{}' is not configured", ext);
            }
        }
        ConfigAction::Reset => config.reset(),
    }

    let saved = store.save(&config).context("Failed to save settings")?;
    print_config(store, &saved);
    Ok(())
}

fn apply_selection(config: &mut RenameConfig, selection: SelectionArgs) {
    if !selection.dirs.is_empty() {
        config.directories.clear();
        for dir in selection.dirs {
            config.add_directory(dir);
        }
    }
    if !selection.exts.is_empty() {
        config.extensions.clear();
        for ext in selection.exts {
            config.add_extension(ext);
        }
    }
}

fn apply_patterns(config: &mut RenameConfig, patterns: PatternArgs) {
    if patterns.camel_regex.is_some() || patterns.separator_regex.is_some() {
        let camel = patterns.camel_regex.or_else(|| config.camel_regex.clone());
        let separator = patterns.separator_regex.or_else(|| config.separator_regex.clone());
        config.set_patterns(camel, separator);
    }
    if let Some(enabled) = patterns.custom_regex {
        config.custom_regex_enabled = enabled;
    }
}

fn print_config(store: &ConfigStore, config: &RenameConfig) {
    println!("Settings file: {}", store.path().display());
    println!("Directories:");
    for dir in &config.directories {
        println!("  {dir}");
    }
    println!("Extensions:");
    for ext in &config.extensions {
        println!("  {ext}");
    }
    println!("Custom regex enabled: {}", config.custom_regex_enabled);
    println!("Camel regex: {}", config.camel_regex.as_deref().unwrap_or("(default)"));
    println!(
        "Separator regex: {}",
        config.separator_regex.as_deref().unwrap_or("(default)")
    );
}

fn resolve_project_root(explicit: Option<PathBuf>) -> anyhow::Result<ProjectRoot> {
    let dir = match explicit {
        Some(dir) => dir,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            find_project_root_from(&cwd).unwrap_or(cwd)
        }
    };

    let dir = dir
        .canonicalize()
        .with_context(|| format!("Project directory does not exist: {}", dir.display()))?;
    info!("Project root: {}", dir.display());
    Ok(ProjectRoot::new(dir))
}

fn resolve_store(explicit: Option<PathBuf>, root: &ProjectRoot) -> ConfigStore {
    explicit.map_or_else(|| ConfigStore::for_project(root), ConfigStore::new)
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("res_rename=info"),
        1 => EnvFilter::new("res_rename=debug"),
        _ => EnvFilter::new("res_rename=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
