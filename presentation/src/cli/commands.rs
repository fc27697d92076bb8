//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for dualchat
#[derive(Parser, Debug)]
#[command(name = "dualchat")]
#[command(author, version, about = "Chat with a companion assistant and a technical sidekick")]
#[command(long_about = r#"
dualchat talks to one of several LLM backends (Claude, GPT-4o, Gemini).

A primary "Companion" assistant answers every message. When a message is both
personal and technical, a secondary "Zero Tech" assistant can be activated;
it starts from a copy of the conversation so far and then keeps its own
history.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./dualchat.toml     Project-level config
3. ~/.config/dualchat/config.toml   Global config

API keys are read from ANTHROPIC_API_KEY, OPENAI_API_KEY and GEMINI_API_KEY
unless configured otherwise.

Example:
  dualchat "How do I stop procrastinating on my thesis?"
  dualchat -m gpt --no-stream "Summarize our plan"
  dualchat --secondary --secondary-model gemini "Explain recursion"
  dualchat              # interactive chat
"#)]
pub struct Cli {
    /// Message to send (starts interactive chat when omitted)
    pub message: Option<String>,

    /// Stream the reply as it is generated (default)
    #[arg(long, overrides_with = "no_stream")]
    pub stream: bool,

    /// Print the reply only once it is complete
    #[arg(long, overrides_with = "stream")]
    pub no_stream: bool,

    /// Send the message to the secondary assistant after activating it
    #[arg(long)]
    pub secondary: bool,

    /// Backend for the primary assistant (claude, gpt, gemini)
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Backend for the secondary assistant (name, display label or alias)
    #[arg(long, value_name = "NAME")]
    pub secondary_model: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Streaming choice from the flags, `None` when neither was given.
    pub fn stream_override(&self) -> Option<bool> {
        match (self.stream, self.no_stream) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
