//! BEM assembly CLI
//!
//! Entry point for the `bem-assembly` command-line tool.

use bem_assembly::config::DEFAULT_PROJECT_FILE;
use bem_assembly::helper::HelperNamespace;
use bem_assembly::{levels, Assembler, AssemblyOptions, TaskArgs};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bem-assembly")]
#[command(about = "Build plan assembly for BEM projects", version)]
struct Cli {
    /// Log plan decisions to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the build plan and print it as JSON
    Plan {
        /// Project root (default: current directory)
        #[arg(long, short = 'r', default_value = ".")]
        root: PathBuf,

        /// Path to project options file (default: <root>/.bem/assembly.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Task name; overrides npm_config_argv
        #[arg(long, short = 't')]
        task: Option<String>,

        /// JSON object applied on top of the project options
        #[arg(long)]
        set: Option<String>,

        /// Remove stale bundles and rename example symlinks before printing
        #[arg(long)]
        clean: bool,

        /// Print only the plan digest
        #[arg(long)]
        digest: bool,
    },

    /// Print the source levels of a platform
    Levels {
        /// Platform name (e.g. desktop, touch)
        platform: String,

        /// Project root (default: current directory)
        #[arg(long, short = 'r', default_value = ".")]
        root: PathBuf,

        /// Path to project options file (default: <root>/.bem/assembly.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Call a template helper with JSON arguments
    Helper {
        /// Helper name (append, push, extend, isPlainObject, isArray)
        name: String,

        /// Arguments as JSON values
        args: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Plan {
            root,
            config,
            task,
            set,
            clean,
            digest,
        } => run_plan(&root, config, task, set, clean, digest),
        Commands::Levels {
            platform,
            root,
            config,
        } => run_levels(&platform, &root, config),
        Commands::Helper { name, args } => run_helper(&name, &args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", context, err);
    process::exit(1);
}

fn load_options(root: &Path, config: Option<PathBuf>, set: Option<String>) -> AssemblyOptions {
    let path = config.unwrap_or_else(|| root.join(DEFAULT_PROJECT_FILE));

    let overrides: Option<serde_json::Value> = match set {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => fail("Invalid --set JSON", e),
        },
        None => None,
    };

    match AssemblyOptions::load(Some(&path), overrides) {
        Ok(effective) => {
            for source in &effective.sources {
                tracing::debug!(
                    "options layer {:?} {}",
                    source.origin,
                    source.path.as_deref().unwrap_or("")
                );
            }
            effective.options
        }
        Err(e) => fail("Error loading options", e),
    }
}

fn run_plan(
    root: &Path,
    config: Option<PathBuf>,
    task: Option<String>,
    set: Option<String>,
    clean: bool,
    digest_only: bool,
) {
    let options = load_options(root, config, set);

    let task = match task {
        Some(name) => TaskArgs::for_task(&name),
        None => TaskArgs::from_env().unwrap_or_else(|e| fail("Error reading task", e)),
    };

    let plan = Assembler::new(root, &options, &task)
        .build()
        .unwrap_or_else(|e| fail("Error assembling plan", e));

    if clean {
        match plan.apply(root) {
            Ok(report) => {
                for path in &report.removed {
                    eprintln!("Removed {}", path.display());
                }
                for path in &report.renamed {
                    eprintln!("Renamed {}", path.display());
                }
            }
            Err(e) => fail("Error cleaning bundles", e),
        }
    }

    if digest_only {
        match plan.digest() {
            Ok(digest) => println!("{}", digest),
            Err(e) => fail("Error computing digest", e),
        }
        return;
    }

    match plan.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => fail("Error serializing output", e),
    }
}

fn run_levels(platform: &str, root: &Path, config: Option<PathBuf>) {
    let options = load_options(root, config, None);

    match levels::source_levels(&options, platform) {
        Ok(levels) => {
            for level in levels {
                println!("{}", level.path);
            }
        }
        Err(e) => fail("Error resolving levels", e),
    }
}

fn run_helper(name: &str, raw_args: &[String]) {
    let args: Vec<serde_json::Value> = raw_args
        .iter()
        .map(|raw| {
            serde_json::from_str(raw).unwrap_or_else(|e| fail(&format!("Invalid JSON argument {}", raw), e))
        })
        .collect();

    let namespace = HelperNamespace::new();
    match namespace.call(name, &args) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Error serializing output", e),
        },
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Available helpers: {}",
                namespace.names().collect::<Vec<_>>().join(", ")
            );
            process::exit(1);
        }
    }
}
