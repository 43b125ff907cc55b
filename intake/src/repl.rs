//! Interactive intake dialogue in the terminal

use std::path::PathBuf;

use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::dialogue::{DialogueState, Speaker, TurnOutcome};
use crate::session::Session;

/// Default file for `/save` without an argument
pub const DEFAULT_TRANSCRIPT_FILE: &str = "intake-transcript.txt";

/// Header printed above the transcript once the dialogue concludes
pub const SUMMARY_HEADER: &str = "Summary of the Information Collected:";

/// Terminal front end for a [`Session`]
pub struct Repl {
    session: Session,
}

impl Repl {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Run the prompt loop until `/quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            if !self.session.state().is_concluded() {
                println!("{} {}", self.assistant_label(), self.session.state().current_question());
            }

            match rl.readline(&format!("{} ", ">".bright_green())) {
                Ok(line) => match classify_input(&line) {
                    Input::Blank => continue,
                    Input::Command(cmd) => {
                        let _ = rl.add_history_entry(cmd);
                        match self.handle_slash_command(cmd) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    }
                    Input::Answer(answer) => {
                        let _ = rl.add_history_entry(answer);
                        self.process_user_input(answer).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn assistant_label(&self) -> colored::ColoredString {
        format!("{}:", self.session.state().assistant_name()).bright_blue().bold()
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Intake Assistant".bright_cyan().bold());
        println!("Knowledge file: {}", self.session.store().path().display());
        println!(
            "Type {} to load a document, {} for help, {} to quit",
            "/upload <pdf>".yellow(),
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let (cmd, arg) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, Some(rest.trim()).filter(|s| !s.is_empty())),
            None => (input, None),
        };
        debug!(%cmd, ?arg, "handle_slash_command: called");

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/upload" | "/u" => match arg {
                Some(path) => self.upload(path),
                None => println!("{} Usage: /upload <path-to-pdf>", "?".yellow()),
            },
            "/history" => print_history(self.session.state()),
            "/restart" | "/r" => {
                self.session.restart();
                println!("{}", "Started a new session.".dimmed());
            }
            "/save" => {
                let path = PathBuf::from(arg.unwrap_or(DEFAULT_TRANSCRIPT_FILE));
                match save_transcript(self.session.state(), &path) {
                    Ok(()) => println!("{} {}", "Transcript saved to".dimmed(), path.display()),
                    Err(e) => println!("{} {:#}", "Error:".red(), e),
                }
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        SlashResult::Continue
    }

    fn upload(&mut self, path: &str) {
        match self.session.ingest_file(path) {
            Ok(state) => {
                println!("{}", "Document uploaded and processed.".bright_green());
                println!("Assistant name: {}", state.assistant_name().bright_white());
            }
            Err(e) => {
                warn!(%path, error = %e, "upload failed");
                println!("{} {}", "Upload failed:".red(), e);
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:16} Ingest a PDF and start a new session", "/upload <pdf>".yellow());
        println!("  {:16} Show the conversation so far", "/history".yellow());
        println!("  {:16} Start over with the same knowledge", "/restart".yellow());
        println!("  {:16} Write the transcript to a file", "/save [path]".yellow());
        println!("  {:16} Show this help", "/help".yellow());
        println!("  {:16} Exit", "/quit".yellow());
        println!();
    }

    async fn process_user_input(&mut self, input: &str) {
        if self.session.state().is_concluded() {
            println!(
                "{} Type {} or {} to begin another.",
                "This intake is complete.".yellow(),
                "/restart".yellow(),
                "/upload <pdf>".yellow()
            );
            return;
        }

        match self.session.advance_turn(input).await {
            Ok(TurnOutcome::Question(_)) => {}
            Ok(TurnOutcome::Summary(summary)) => {
                println!("{} {}", self.assistant_label(), summary);
                println!();
                println!("{}", SUMMARY_HEADER.bright_cyan().bold());
                print!("{}", self.session.state().transcript());
                println!();
            }
            Err(e) => {
                println!("{} {}", "Error:".red(), e);
                println!("{}", "Your answer was not recorded; please try again.".dimmed());
            }
        }
    }
}

fn print_history(state: &DialogueState) {
    if state.history().is_empty() {
        println!("{}", "No conversation history.".dimmed());
        return;
    }

    println!();
    println!("{}", "Conversation History:".bright_cyan());
    for entry in state.history() {
        let tag = match entry.speaker {
            Speaker::User => entry.speaker.tag().bright_green(),
            Speaker::Assistant => entry.speaker.tag().bright_blue(),
        };
        println!("  {}: {}", tag, entry.text);
    }
    println!();
}

/// Write the tagged transcript to `path`
pub fn save_transcript(state: &DialogueState, path: &std::path::Path) -> Result<()> {
    std::fs::write(path, state.transcript()).context(format!("Failed to write transcript to {}", path.display()))
}

/// What a line typed at the prompt means
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Blank,
    /// Slash command, trimmed
    Command(&'a str),
    /// Answer to the current question, exactly as typed
    Answer(&'a str),
}

fn classify_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Blank
    } else if trimmed.starts_with('/') {
        Input::Command(trimmed)
    } else {
        Input::Answer(line)
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
