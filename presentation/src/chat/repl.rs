//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::bridge::ChatBridge;
use crate::output::console::{ConsoleFormatter, ConsoleSink};
use colored::Colorize;
use dualchat_domain::AssistantSlot;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// A parsed line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text for the primary assistant
    Message(String),
    Model(String),
    Model2(String),
    Activate,
    Deactivate,
    Clear,
    Clear2,
    /// Message for the secondary assistant
    To2(String),
    Topic(String),
    Status,
    Help,
    Quit,
    /// A command that needs an argument was given none
    MissingArgument(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse one input line; `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !line.starts_with('/') {
            return Some(Self::Message(line.to_string()));
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        let with_arg = |cmd: &'static str, build: fn(String) -> Self| {
            if arg.is_empty() {
                Self::MissingArgument(cmd)
            } else {
                build(arg.to_string())
            }
        };

        Some(match name {
            "/model" => with_arg("/model", Self::Model),
            "/model2" => with_arg("/model2", Self::Model2),
            "/to2" => with_arg("/to2", Self::To2),
            "/topic" => with_arg("/topic", Self::Topic),
            "/activate" => Self::Activate,
            "/deactivate" => Self::Deactivate,
            "/clear" => Self::Clear,
            "/clear2" => Self::Clear2,
            "/status" => Self::Status,
            "/help" | "/h" | "/?" => Self::Help,
            "/quit" | "/exit" | "/q" => Self::Quit,
            _ => Self::Unknown(name.to_string()),
        })
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    bridge: ChatBridge,
    console: Arc<ConsoleSink>,
    stream: bool,
    suggest_secondary: bool,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    ///
    /// `console` must be the sink `bridge` pushes its events to.
    pub fn new(bridge: ChatBridge, console: Arc<ConsoleSink>) -> Self {
        Self {
            bridge,
            console,
            stream: true,
            suggest_secondary: true,
            history_file: dirs::data_dir().map(|p| p.join("dualchat").join("history.txt")),
        }
    }

    /// Set whether replies are streamed
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set whether dual-topic messages print an activation hint
    pub fn with_suggestions(mut self, suggest: bool) -> Self {
        self.suggest_secondary = suggest;
        self
    }

    /// Override the history file location
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_file = path;
        }
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome().await;

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let Some(command) = ReplCommand::parse(&line) else {
                        continue;
                    };
                    let _ = rl.add_history_entry(line.trim());

                    if !self.handle(command).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Execute one command. Returns false when the REPL should exit.
    async fn handle(&self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Message(text) => {
                self.maybe_suggest(&text).await;
                self.send(AssistantSlot::Primary, &text).await;
            }
            ReplCommand::To2(text) => {
                if !self.bridge.secondary_state().is_active() {
                    println!(
                        "{} the secondary assistant is inactive; its reply will not carry the current conversation. Use /activate first.",
                        "note:".yellow().bold()
                    );
                }
                self.send(AssistantSlot::Secondary, &text).await;
            }
            ReplCommand::Model(name) => {
                if self.bridge.set_model(&name).await {
                    let id = self.bridge.model(AssistantSlot::Primary).await;
                    println!("Primary backend: {}", id.as_str().green());
                } else {
                    self.print_invalid_model(&name);
                }
            }
            ReplCommand::Model2(name) => {
                if self.bridge.set_model_secondary(&name).await {
                    let id = self.bridge.model(AssistantSlot::Secondary).await;
                    println!("Secondary backend: {}", id.as_str().green());
                } else {
                    self.print_invalid_model(&name);
                }
            }
            ReplCommand::Activate => {
                self.bridge.activate_secondary().await;
                let persona = self
                    .bridge
                    .orchestrator()
                    .persona(AssistantSlot::Secondary)
                    .await;
                println!(
                    "{} joined with a copy of the conversation. Use /to2 <message> to ask it.",
                    persona.name.magenta().bold()
                );
            }
            ReplCommand::Deactivate => {
                self.bridge.deactivate_secondary().await;
                println!("Secondary assistant deactivated.");
            }
            ReplCommand::Clear => {
                self.bridge.clear_conversation().await;
                println!("Primary conversation cleared.");
            }
            ReplCommand::Clear2 => {
                self.bridge.clear_conversation_secondary().await;
                println!("Secondary conversation cleared.");
            }
            ReplCommand::Topic(text) => {
                let dual = self.bridge.detect_dual_topic(&text);
                println!("dual topic: {}", if dual { "yes".green() } else { "no".dimmed() });
            }
            ReplCommand::Status => {
                println!(
                    "{}",
                    ConsoleFormatter::status(
                        self.bridge.model(AssistantSlot::Primary).await,
                        self.bridge.model(AssistantSlot::Secondary).await,
                        self.bridge.secondary_state(),
                    )
                );
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Quit => {
                println!("Bye!");
                return false;
            }
            ReplCommand::MissingArgument(cmd) => {
                println!("Usage: {} <argument>", cmd);
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        true
    }

    async fn send(&self, slot: AssistantSlot, text: &str) {
        let persona = self.bridge.orchestrator().persona(slot).await;
        let backend = self.bridge.model(slot).await;
        println!();
        println!(
            "{}",
            ConsoleFormatter::reply_label(slot, &persona.name, backend)
        );

        self.console.waiting("thinking...");
        if self.stream {
            match slot {
                AssistantSlot::Primary => self.bridge.send_message_stream(text).await,
                AssistantSlot::Secondary => self.bridge.send_message_stream_secondary(text).await,
            };
        } else {
            let reply = match slot {
                AssistantSlot::Primary => self.bridge.send_message(text).await,
                AssistantSlot::Secondary => self.bridge.send_message_secondary(text).await,
            };
            self.console.done_waiting();
            println!("{}", ConsoleFormatter::reply(&reply));
        }
        println!();
    }

    async fn maybe_suggest(&self, text: &str) {
        if !self.suggest_secondary
            || self.bridge.secondary_state().is_active()
            || !self.bridge.detect_dual_topic(text)
        {
            return;
        }
        let persona = self
            .bridge
            .orchestrator()
            .persona(AssistantSlot::Secondary)
            .await;
        println!("{}", ConsoleFormatter::activation_hint(&persona.name));
    }

    fn print_invalid_model(&self, name: &str) {
        println!("Unknown backend: {}", name.trim().red());
        println!("Available:\n{}", ConsoleFormatter::available_backends());
    }

    async fn print_welcome(&self) {
        let primary = self.bridge.model(AssistantSlot::Primary).await;
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              dualchat - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Backend: {} ({})", primary.as_str(), primary.display_name());
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /model <name>     - Primary backend (claude, gpt, gemini)");
        println!("  /model2 <name>    - Secondary backend (name, label or alias)");
        println!("  /activate         - Start the secondary assistant from a copy of this chat");
        println!("  /deactivate       - Stop the secondary assistant");
        println!("  /to2 <message>    - Ask the secondary assistant");
        println!("  /clear, /clear2   - Clear the primary / secondary conversation");
        println!("  /topic <message>  - Check whether a message is dual-topic");
        println!("  /status           - Show backends and secondary state");
        println!("  /help, /h, /?     - Show this help");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }
}
