//! CLI entrypoint for dualchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use dualchat_application::{ChatConfig, ConversationLogger, DualAssistantOrchestrator};
use dualchat_domain::{AssistantSlot, BackendId};
use dualchat_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, Severity, http_registry,
};
use dualchat_presentation::{ChatBridge, ChatRepl, Cli, ConsoleFormatter, ConsoleSink};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let _log_guard = init_tracing(cli.verbose, config.logging.log_dir.as_deref());
    info!("Starting dualchat");

    report_config_issues(&config)?;

    // === Dependency Injection ===
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let gateway = Arc::new(http_registry(client, |id| config.provider_settings(id)));

    let chat_config = chat_config(&cli, &config)?;
    let orchestrator = Arc::new(match conversation_logger(&config) {
        Some(logger) => {
            DualAssistantOrchestrator::with_conversation_logger(gateway, chat_config, logger)
        }
        None => DualAssistantOrchestrator::new(gateway, chat_config),
    });

    let console = Arc::new(ConsoleSink::new(!cli.quiet));
    let bridge = ChatBridge::new(orchestrator, console.clone());
    let stream = cli.stream_override().unwrap_or(config.repl.stream);

    match cli.message.as_deref() {
        Some(message) => Ok(one_shot(&bridge, &console, message, cli.secondary, stream).await),
        None => {
            if cli.secondary {
                bail!("--secondary needs a message. Use /activate inside the chat instead.");
            }
            let repl = ChatRepl::new(bridge, console)
                .with_stream(stream)
                .with_suggestions(config.repl.suggest_secondary)
                .with_history_file(config.repl.history_file.as_deref().map(expand_home));
            repl.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Install the stderr subscriber, plus a daily log file when `log_dir` is set.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dualchat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::new(level)),
        )
        .with(file_layer)
        .init();

    guard
}

/// Print config warnings; refuse to start on errors.
fn report_config_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        eprintln!(
            "config {}: {}: {}",
            match issue.severity {
                Severity::Warning => "warning",
                Severity::Error => "error",
            },
            issue.field,
            issue.message
        );
    }
    if issues.iter().any(|i| i.severity == Severity::Error) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// Config file settings with the command-line backend choices applied.
fn chat_config(cli: &Cli, config: &FileConfig) -> Result<ChatConfig> {
    let mut chat = config.to_chat_config();

    if let Some(name) = &cli.model {
        let backend = BackendId::from_selector(name).with_context(|| {
            format!(
                "Unknown backend '{name}'. Available:\n{}",
                ConsoleFormatter::available_backends()
            )
        })?;
        chat = chat.with_primary_backend(backend);
    }
    if let Some(name) = &cli.secondary_model {
        let backend = BackendId::from_alias(name).with_context(|| {
            format!(
                "Unknown backend '{name}'. Available:\n{}",
                ConsoleFormatter::available_backends()
            )
        })?;
        chat = chat.with_secondary_backend(backend);
    }

    Ok(chat)
}

fn conversation_logger(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = config.logging.conversation_log.as_ref()?;
    match JsonlConversationLogger::new(path) {
        Some(logger) => {
            info!(path = %logger.path().display(), "Conversation log enabled");
            Some(Arc::new(logger))
        }
        None => {
            warn!("Conversation log disabled");
            None
        }
    }
}

async fn one_shot(
    bridge: &ChatBridge,
    console: &ConsoleSink,
    message: &str,
    secondary: bool,
    stream: bool,
) -> ExitCode {
    let slot = if secondary {
        bridge.activate_secondary().await;
        AssistantSlot::Secondary
    } else {
        AssistantSlot::Primary
    };

    console.waiting("thinking...");
    let reply = match (slot, stream) {
        (AssistantSlot::Primary, true) => bridge.send_message_stream(message).await,
        (AssistantSlot::Secondary, true) => bridge.send_message_stream_secondary(message).await,
        (AssistantSlot::Primary, false) => bridge.send_message(message).await,
        (AssistantSlot::Secondary, false) => bridge.send_message_secondary(message).await,
    };
    if !stream {
        console.done_waiting();
        println!("{}", ConsoleFormatter::reply(&reply));
    }

    exit_code(&reply)
}

/// Failed turns exit non-zero once `main` has returned and the log writer has flushed.
fn exit_code(reply: &str) -> ExitCode {
    if ConsoleFormatter::is_error_reply(reply) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Expand a leading `~/` in a configured path.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
