// Design Studio command-line entry point

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use design_studio::models::settings::{AppConfig, SettingsUpdate};
use design_studio::services::preview::{PreviewEvent, PreviewManager, StartOptions};
use design_studio::storage::ConfigService;
use design_studio::utils::paths::{config_path, resolve_against};
use design_studio_quality_gates::ValidationPipeline;

#[derive(Parser)]
#[command(name = "design-studio")]
#[command(about = "Validate, tag and preview generated React designs")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to ~/.design-studio/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workspace directory holding designs/ (overrides config and WORKSPACE_DIR)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the validation pipeline on a design file and print the result
    Validate {
        file: PathBuf,
    },
    /// Assign unique element identifiers to a design file
    Inject {
        file: PathBuf,
        /// Identifier namespace (defaults to the file stem)
        #[arg(long)]
        namespace: Option<String>,
        /// Identifiers already used elsewhere
        #[arg(long = "existing", num_args = 1..)]
        existing: Vec<String>,
        /// Rewrite the file in place and print a summary
        #[arg(long)]
        write: bool,
    },
    /// Start the preview server and stream its events until Ctrl-C
    Preview {
        /// Design to load into designs/current.tsx
        #[arg(long)]
        design: Option<String>,
    },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved configuration
    Show,
    /// Change saved settings and print the result
    Set {
        #[arg(long)]
        workspace_root: Option<PathBuf>,
        #[arg(long)]
        preview_root: Option<PathBuf>,
        #[arg(long)]
        tooling_root: Option<PathBuf>,
        #[arg(long)]
        preview_port: Option<u16>,
        #[arg(long)]
        max_iterations: Option<u32>,
    },
    /// Restore the default configuration
    Reset,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn config_service(cli: &Cli) -> Result<ConfigService> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    ConfigService::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn effective_config(service: &ConfigService, workspace: Option<&Path>) -> Result<AppConfig> {
    let cwd = std::env::current_dir()?;
    let mut config = service.resolved(&cwd);
    if let Some(workspace) = workspace {
        config.workspace_root = resolve_against(&cwd, workspace);
    }
    Ok(config)
}

fn file_name(file: &Path) -> Result<String> {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", file.display()))
}

async fn validate(config: &AppConfig, file: &Path) -> Result<bool> {
    let source = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let pipeline = ValidationPipeline::new(&config.preview_root, &config.tooling_root)
        .with_config(config.checkers.clone());
    let result = pipeline.validate(&source, &file_name(file)?).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success)
}

async fn inject(file: &Path, namespace: Option<String>, existing: Vec<String>, write: bool) -> Result<()> {
    let source = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let namespace = match namespace {
        Some(namespace) => namespace,
        None => file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let existing: HashSet<String> = existing.into_iter().collect();
    let result = design_studio_parser::inject(&source, &existing, &namespace)?;

    if write {
        tokio::fs::write(file, &result.rewritten_source).await?;
        let summary = serde_json::json!({
            "file": file.display().to_string(),
            "added": result.added,
            "removed": result.removed,
            "duplicatesFound": result.duplicates_found,
            "unchanged": result.unchanged,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", result.rewritten_source);
    }
    Ok(())
}

async fn preview(config: &AppConfig, design: Option<String>) -> Result<()> {
    let manager = PreviewManager::new(
        config.preview.clone(),
        config.preview_root.clone(),
        &config.workspace_root,
    );
    let mut events = manager.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Ok(line) = serde_json::to_string(&event) {
                println!("{}", line);
            }
            if event == PreviewEvent::Stopped {
                break;
            }
        }
    });

    let status = manager.start(StartOptions { design_name: design }).await?;
    if let Some(url) = &status.url {
        tracing::info!("Preview running at {}", url);
    }

    tokio::signal::ctrl_c().await?;
    manager.stop().await;
    let _ = printer.await;
    Ok(())
}

fn configure(mut service: ConfigService, action: ConfigAction) -> Result<()> {
    let config = match action {
        ConfigAction::Show => service.get_config().clone(),
        ConfigAction::Set {
            workspace_root,
            preview_root,
            tooling_root,
            preview_port,
            max_iterations,
        } => service.update_config(SettingsUpdate {
            workspace_root,
            preview_root,
            tooling_root,
            preview_port,
            max_iterations,
        })?,
        ConfigAction::Reset => {
            service.reset()?;
            service.get_config().clone()
        }
    };
    tracing::info!("Config file: {}", service.config_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let service = config_service(&cli)?;
    let workspace = cli.workspace;

    match cli.command {
        Command::Config { action } => configure(service, action)?,
        Command::Validate { file } => {
            let config = effective_config(&service, workspace.as_deref())?;
            if !validate(&config, &file).await? {
                std::process::exit(1);
            }
        }
        Command::Inject {
            file,
            namespace,
            existing,
            write,
        } => inject(&file, namespace, existing, write).await?,
        Command::Preview { design } => {
            let config = effective_config(&service, workspace.as_deref())?;
            preview(&config, design).await?
        }
    }
    Ok(())
}
