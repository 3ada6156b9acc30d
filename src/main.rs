//! Hoss command line.
//!
//! Usage:
//!   hoss init                      Write a default hoss.toml
//!   hoss tools                     List tools offered for the next prompt
//!   hoss call NAME [ARGS_JSON]     Invoke a tool and print its result
//!   hoss inbox [--to NAME]         List agent-context messages
//!   hoss pending                   Print and drain queued host input

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use hoss::config::{self, HossConfig, CONFIG_FILE};
use hoss::host::{ConsoleNotifier, HostClient, InferenceClient, QueuedCommands};
use hoss::plugin::Plugin;
use hoss::state::Database;
use hoss::tools::{ToolContext, ToolSettings};
use hoss::types::{ActiveChat, ToolCall};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "hoss")]
#[command(version)]
#[command(about = "Agent tools and cross-conversation recall for a chat host")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to hoss home directory (default ~/.hoss).
    #[arg(long)]
    home: Option<PathBuf>,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Avatar of the acting character.
    #[arg(long)]
    character: Option<String>,

    /// Active group id.
    #[arg(long)]
    group: Option<String>,

    /// Active chat id.
    #[arg(long)]
    chat: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file if none exists.
    Init,

    /// List the tools offered for the next prompt.
    Tools,

    /// Invoke a tool and print its result.
    Call {
        /// Tool name.
        name: String,

        /// Arguments as a JSON object.
        #[arg(default_value = "{}")]
        args: String,
    },

    /// List agent-context messages.
    Inbox {
        /// Only messages addressed to this agent.
        #[arg(long)]
        to: Option<String>,
    },

    /// Print and drain input queued for the host.
    Pending,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let home_dir = match &cli.home {
        Some(home) => PathBuf::from(shellexpand::tilde(&home.to_string_lossy()).into_owned()),
        None => config::default_home_dir(),
    };
    let config_path = home_dir.join(CONFIG_FILE);
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let active = active_chat(&cli, &cfg);

    match cli.command {
        Commands::Init => cmd_init(&config_path),
        Commands::Tools => cmd_tools(&home_dir, cfg, active).await,
        Commands::Call { name, args } => cmd_call(&home_dir, cfg, active, &name, &args).await,
        Commands::Inbox { to } => cmd_inbox(&home_dir, &cfg, to.as_deref()).await,
        Commands::Pending => cmd_pending(&home_dir, &cfg).await,
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!(
            "{} Config already exists at {}",
            "!".yellow().bold(),
            config_path.display()
        );
        return Ok(());
    }

    config::save_config(&HossConfig::default(), config_path)?;
    println!(
        "{} Wrote default config to {}",
        ">>>".green().bold(),
        config_path.display()
    );
    Ok(())
}

async fn cmd_tools(home_dir: &Path, cfg: HossConfig, active: ActiveChat) -> Result<()> {
    let plugin = Plugin::activate(bootstrap(home_dir, cfg, active)?);

    println!();
    println!("{}", "=== Tools ===".bold());
    println!();
    for def in plugin.registry().eligible_definitions() {
        println!("  {}  {}", def.name.bold(), def.display_name.dimmed());
    }
    println!();

    plugin.deactivate();
    Ok(())
}

async fn cmd_call(
    home_dir: &Path,
    cfg: HossConfig,
    active: ActiveChat,
    name: &str,
    args: &str,
) -> Result<()> {
    let arguments: serde_json::Value =
        serde_json::from_str(args).context("Tool arguments must be valid JSON")?;
    let plugin = Plugin::activate(bootstrap(home_dir, cfg, active)?);
    let call = ToolCall::new(name, arguments);
    let invoker = plugin.invoker();

    let result = tokio::select! {
        result = invoker.invoke_for_host(&call) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match result {
        Some(result) => {
            let marker = if result.success {
                "ok".green().bold()
            } else {
                "failed".red().bold()
            };
            eprintln!("{} {}", marker, name);
            println!("{}", result.output);
        }
        None => {
            warn!("Interrupted while running {}", name);
            println!("\n{} Interrupted", "<<<".red().bold());
        }
    }

    plugin.deactivate();
    Ok(())
}

async fn cmd_inbox(home_dir: &Path, cfg: &HossConfig, to: Option<&str>) -> Result<()> {
    let db = open_db(home_dir, cfg)?;
    let messages = db.agent_messages(to)?;

    if messages.is_empty() {
        println!("{}", "No agent messages.".dimmed());
        return Ok(());
    }

    for msg in messages {
        println!(
            "{} {} -> {}  {}",
            msg.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            msg.from.bold(),
            msg.to.bold(),
            msg.subject.cyan(),
        );
        println!("    {}", msg.message);
    }
    Ok(())
}

async fn cmd_pending(home_dir: &Path, cfg: &HossConfig) -> Result<()> {
    let db = open_db(home_dir, cfg)?;
    let queued = db.drain_pending_input()?;
    info!("Drained {} queued inputs", queued.len());
    for line in queued {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Config values overridden by any location flags given on the command line.
fn active_chat(cli: &Cli, cfg: &HossConfig) -> ActiveChat {
    let base = cfg.active_chat();
    let pick = |flag: &Option<String>, fallback: Option<String>| match flag {
        Some(v) if v.is_empty() => None,
        Some(v) => Some(v.clone()),
        None => fallback,
    };
    ActiveChat {
        character_avatar: pick(&cli.character, base.character_avatar),
        group_id: pick(&cli.group, base.group_id),
        chat_id: pick(&cli.chat, base.chat_id),
    }
}

fn open_db(home_dir: &Path, cfg: &HossConfig) -> Result<Database> {
    let db_path = cfg.resolved_db_path(home_dir);
    let db_path = db_path.as_path();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create DB parent directory: {}", parent.display())
            })?;
        }
    }

    Database::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

/// Wire the host clients, session store and tool settings into a context.
fn bootstrap(home_dir: &Path, cfg: HossConfig, active: ActiveChat) -> Result<Arc<ToolContext>> {
    let db = Arc::new(Mutex::new(open_db(home_dir, &cfg)?));

    let host = HostClient::new(&cfg.host_api_url, &cfg.host_csrf_token);
    let generator = InferenceClient::new(
        &cfg.generation_api_url,
        &cfg.generation_api_key,
        &cfg.generation_model,
    )
    .with_system_prompt(&cfg.subagent_system_prompt)
    .with_temperature(cfg.temperature);

    let ctx = ToolContext::new(
        Arc::new(host),
        Arc::new(generator),
        Arc::new(ConsoleNotifier),
        Arc::new(QueuedCommands::new(db.clone())),
        db,
    )
    .with_settings(ToolSettings::from_overrides(cfg.tools))
    .with_subquery_max_tokens(cfg.subquery_max_tokens)
    .with_active(active);

    Ok(Arc::new(ctx))
}
