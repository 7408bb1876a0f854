//! `statekit`: run plugin pipelines from a `.statekit/` project.
//!
//! Loads the project under `--root` (default: the current directory), builds
//! a container from its initial values and declarative plugins, and prints
//! snapshots as pretty JSON on stdout.

mod logging;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use colored::Colorize;
use sk_core::config::{load_config, ProjectConfig};
use sk_core::field::{self, FieldPath};
use sk_core::{ContainerFactory, RunOptions, Snapshot};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "statekit",
    version,
    about = "Run ordered plugin pipelines over a state container"
)]
struct Cli {
    /// Project root containing `.statekit/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run plugins (or named pipelines) over the initial values.
    Run {
        /// Plugin or pipeline names, applied in order.
        #[arg(required = true)]
        names: Vec<String>,

        /// Transform without committing to the container.
        #[arg(long)]
        dry_run: bool,
    },
    /// List plugins and named pipelines.
    Plugins,
    /// Print the initial values.
    Show {
        /// Only print the value at this path, e.g. `meta.tags[0]`.
        #[arg(long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let cli = Cli::parse();
    let project = load_project(&cli.root).await?;

    match cli.command {
        Command::Run { names, dry_run } => cmd_run(&project, &names, dry_run).await,
        Command::Plugins => cmd_plugins(&project),
        Command::Show { key } => cmd_show(&project, key.as_deref()),
    }
}

async fn load_project(root: &Path) -> Result<ProjectConfig> {
    load_config(root)
        .await
        .wrap_err_with(|| format!("failed to load project at {}", root.display()))
}

async fn cmd_run(project: &ProjectConfig, names: &[String], dry_run: bool) -> Result<()> {
    let plugins = project.expand(names);
    debug!(?plugins, dry_run, "expanded pipeline");
    let container =
        ContainerFactory::new(project.container_config()).provide(project.container_init());

    let options = if dry_run {
        RunOptions::dry_run()
    } else {
        RunOptions::default()
    };
    let value = container
        .run_with(plugins.clone(), options)
        .await
        .wrap_err_with(|| format!("pipeline [{}] failed", plugins.join(", ")))?;

    print_json(&value)?;

    let status = if field::deep_equal(&value, container.initial()) {
        "unchanged".dimmed()
    } else if dry_run {
        "changed (dry run, not committed)".yellow()
    } else {
        "changed".green()
    };
    eprintln!("{} {status}", "state".bold());
    Ok(())
}

fn cmd_plugins(project: &ProjectConfig) -> Result<()> {
    if project.plugins.is_empty() {
        println!("{}", "No plugins defined".dimmed());
    }
    for plugin in &project.plugins {
        println!(
            "{} {} {}",
            plugin.name.cyan().bold(),
            format!("({} steps)", plugin.steps.len()).dimmed(),
            plugin.description
        );
    }

    for (name, steps) in &project.global.pipelines {
        println!("{} {} {}", name.magenta().bold(), "=".dimmed(), steps.join(" -> "));
    }
    Ok(())
}

fn cmd_show(project: &ProjectConfig, key: Option<&str>) -> Result<()> {
    let Some(key) = key else {
        return print_json(&project.initial_values);
    };

    let path = FieldPath::parse(key)?;
    let value = field::get(&project.initial_values, &path)
        .ok_or_else(|| eyre!("no value at '{key}'"))?;
    print_json(value)
}

fn print_json(value: &Snapshot) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
