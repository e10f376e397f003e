use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use snapshot_history::HistoryConfig;
use snapshot_history_config::ToolConfig;

mod script;

/// Replays a JSON-lines script of history actions and prints the result.
#[derive(Parser, Debug)]
#[command(name = "snapshot-history", version, about)]
struct Cli {
    /// Action script, one JSON action per line (`-` reads stdin).
    script: PathBuf,

    /// Config file to use (created with defaults if missing).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the undo limit.
    #[arg(long)]
    limit: Option<usize>,

    /// Additional top-level key to exclude from history.
    #[arg(long = "ignore-key", value_name = "KEY")]
    ignore_keys: Vec<String>,

    /// Start from an empty ignore list instead of the configured one.
    #[arg(long)]
    no_default_ignores: bool,

    /// Print the whole history instead of stats and present.
    #[arg(long)]
    dump_history: bool,

    /// Print one line per replayed action.
    #[arg(long)]
    steps: bool,
}

impl Cli {
    fn history_config(&self, tool_config: &ToolConfig) -> HistoryConfig {
        let mut config = tool_config.history_config();
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if self.no_default_ignores {
            config.ignore_keys.clear();
        }
        config.ignore_keys.extend(self.ignore_keys.iter().cloned());
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Read config before logging (it holds the log filter); report problems after.
    let config_path = cli.config.clone().unwrap_or_else(ToolConfig::config_path);
    let loaded = ToolConfig::try_load(&config_path);
    let tool_config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => ToolConfig::default(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&tool_config.log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    match loaded {
        Ok(Some(_)) => tracing::debug!("Loaded config from {}", config_path.display()),
        Ok(None) if cli.config.is_some() => {
            if let Err(e) = tool_config.save(&config_path) {
                tracing::warn!(
                    "Failed to create default config at {}: {e:#}",
                    config_path.display()
                );
            }
        }
        Ok(None) => tracing::debug!("No config at {}, using defaults", config_path.display()),
        Err(e) => tracing::warn!("{e:#}; using defaults"),
    }

    tracing::info!("Replaying {}", cli.script.display());

    let actions = if cli.script == Path::new("-") {
        script::parse_script(io::stdin().lock())?
    } else {
        let file = File::open(&cli.script)
            .with_context(|| format!("Failed to open script: {}", cli.script.display()))?;
        script::parse_script(BufReader::new(file))?
    };

    let replay = script::replay(actions, cli.history_config(&tool_config))?;

    let mut out = io::stdout().lock();
    if cli.steps {
        for step in &replay.steps {
            writeln!(out, "{step}")?;
        }
    }

    let report = if cli.dump_history {
        serde_json::to_value(replay.store.history())?
    } else {
        serde_json::json!({
            "stats": replay.store.stats(),
            "present": replay.store.present(),
        })
    };
    let rendered = if tool_config.pretty_output {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    writeln!(out, "{rendered}")?;

    Ok(())
}
