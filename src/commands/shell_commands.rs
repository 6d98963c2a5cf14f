//! Command parser for the interactive session
//!
//! Every session action is a `/` command: select a document, describe it,
//! generate, browse the review list and integrate. `exit` and `quit` are
//! accepted without the slash. Command names are case-insensitive;
//! arguments (paths, descriptions) keep their case.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing session commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands accepted by the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Select the document to upload
    SelectFile(PathBuf),

    /// Set the project description sent along with the document
    Describe(String),

    /// Upload the selected document and review the generated stories
    Generate,

    /// Go back to the upload screen
    Upload,

    /// Return to the review screen with the stories already generated
    Review,

    /// Show the story list
    List,

    /// Select a story by its 1-based number and show its detail
    Select(usize),

    /// Show the detail of the active story
    Show,

    /// Integrate the active story
    Integrate,

    /// Integrate every story after confirmation
    IntegrateAll,

    /// Query the service health
    Health,

    /// Display session status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the session
    Exit,

    /// Input that is not a command
    None,
}

/// Parse a line of session input
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands, missing arguments and
/// arguments that do not parse.
///
/// # Examples
///
/// ```
/// use autoagile::commands::shell_commands::{parse_shell_command, ShellCommand};
///
/// assert_eq!(parse_shell_command("/select 2").unwrap(), ShellCommand::Select(2));
/// assert_eq!(parse_shell_command("quit").unwrap(), ShellCommand::Exit);
/// assert_eq!(parse_shell_command("hello").unwrap(), ShellCommand::None);
/// ```
pub fn parse_shell_command(input: &str) -> Result<ShellCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return match lower.as_str() {
            "exit" | "quit" => Ok(ShellCommand::Exit),
            _ => Ok(ShellCommand::None),
        };
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name.to_lowercase(), arg.trim()),
        None => (lower.clone(), ""),
    };

    match name.as_str() {
        "/file" | "/open" => {
            if arg.is_empty() {
                Err(missing("/file", "/file <path>"))
            } else {
                Ok(ShellCommand::SelectFile(PathBuf::from(arg)))
            }
        }
        "/describe" | "/description" => {
            if arg.is_empty() {
                Err(missing("/describe", "/describe <text>"))
            } else {
                Ok(ShellCommand::Describe(arg.to_string()))
            }
        }
        "/select" => {
            if arg.is_empty() {
                return Err(missing("/select", "/select <number>"));
            }
            match arg.parse::<usize>() {
                Ok(number) if number > 0 => Ok(ShellCommand::Select(number)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/select".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }
        "/generate" => no_argument(ShellCommand::Generate, "/generate", arg),
        "/upload" => no_argument(ShellCommand::Upload, "/upload", arg),
        "/review" => no_argument(ShellCommand::Review, "/review", arg),
        "/list" | "/stories" => no_argument(ShellCommand::List, "/list", arg),
        "/show" => no_argument(ShellCommand::Show, "/show", arg),
        "/integrate" => no_argument(ShellCommand::Integrate, "/integrate", arg),
        "/integrate-all" => no_argument(ShellCommand::IntegrateAll, "/integrate-all", arg),
        "/health" => no_argument(ShellCommand::Health, "/health", arg),
        "/status" => no_argument(ShellCommand::ShowStatus, "/status", arg),
        "/help" | "/?" => Ok(ShellCommand::Help),
        "/exit" | "/quit" => Ok(ShellCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn no_argument(
    command: ShellCommand,
    name: &str,
    arg: &str,
) -> Result<ShellCommand, CommandError> {
    if arg.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: name.to_string(),
            arg: arg.to_string(),
        })
    }
}

/// Print session help
pub fn print_help() {
    println!(
        r#"
Session Commands
================

UPLOAD:
  /file <path>      - Select the document to upload (.docx, .doc, .txt, .md)
  /describe <text>  - Set the project description (defaults to the file name)
  /generate         - Upload the document and generate user stories
  /upload           - Return to the upload screen

REVIEW:
  /review           - Return to the generated user stories
  /list             - Show the generated user stories
  /select <number>  - Select a user story and show its detail
  /show             - Show the selected user story again
  /integrate        - Integrate the selected user story
  /integrate-all    - Integrate all user stories (asks for confirmation)

SESSION:
  /health           - Check the story service
  /status           - Show session status
  /help             - Show this help message
  exit, quit        - Leave the session

Stories are kept for this session only.
"#
    );
}
