/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `session`:  Interactive upload, review and integration session
- `generate`: One-shot story generation from a document
- `health`:   Story service health check

The handlers are thin: the flows themselves live in [`crate::app`].
*/

use crate::api::{create_service, HealthStatus};
use crate::app::App;
use crate::board::{print_detail, print_list, StoryDetail};
use crate::config::Config;
use crate::error::{AutoAgileError, Result};
use prettytable::{cell, row, Table};

// Session command parser
pub mod shell_commands;

// Interactive session handler
pub mod session {
    //! Interactive session handler.
    //!
    //! Builds the story service and an [`App`], then runs a
    //! readline-based loop dispatching `/` commands to the app flows.

    use super::*;
    use crate::app::{IntegrationOutcome, Screen, GENERATING_LABEL};
    use crate::commands::shell_commands::{parse_shell_command, print_help, ShellCommand};
    use crate::notifier::{AlertKind, Notifier, TerminalNotifier};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::PathBuf;

    /// Start an interactive session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `file` - Optional document to preselect
    ///
    /// # Examples
    ///
    /// ```
    /// use autoagile::commands::session;
    /// use autoagile::config::Config;
    ///
    /// // In application code:
    /// // session::run_session(Config::default(), None).await?;
    /// ```
    pub async fn run_session(config: Config, file: Option<PathBuf>) -> Result<()> {
        tracing::info!("Starting interactive session");

        let service = create_service(&config)?;
        let mut app = App::new(service, &config);
        let mut notifier = TerminalNotifier::new();
        let mut rl = DefaultEditor::new().map_err(AutoAgileError::from)?;

        if let Some(path) = file {
            app.select_file(path);
        }

        print_welcome_banner(&config, &app);

        loop {
            let prompt = format!("[{}]>> ", app.screen());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed).map_err(AutoAgileError::from)?;

                    let command = match parse_shell_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            let err = AutoAgileError::from(e);
                            tracing::debug!("{}", err);
                            eprintln!("{}\n", err.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        ShellCommand::Exit => break,
                        ShellCommand::None => {
                            println!("Type '/help' for available commands\n");
                        }
                        command => dispatch(&mut app, &mut notifier, &config, command).await,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn dispatch(
        app: &mut App,
        notifier: &mut TerminalNotifier,
        config: &Config,
        command: ShellCommand,
    ) {
        match command {
            ShellCommand::SelectFile(path) => {
                if !path.is_file() {
                    notifier.alert(
                        AlertKind::Warning,
                        &format!("File not found: {}", path.display()),
                    );
                    return;
                }
                app.select_file(path);
                println!("Description: {}\n", app.description());
            }
            ShellCommand::Describe(text) => {
                app.set_description(text);
            }
            ShellCommand::Generate => {
                println!("{}", GENERATING_LABEL.dimmed());
                if let Ok(count) = app.generate(notifier).await {
                    println!("\nGenerated {} user stories\n", count);
                    show_review(app);
                }
            }
            ShellCommand::Upload => {
                app.open_upload();
                println!("Back on the upload screen\n");
            }
            ShellCommand::Review => {
                if app.cache().is_empty() {
                    not_reviewing(app, notifier);
                    return;
                }
                app.enter_review();
                show_review(app);
            }
            ShellCommand::List => {
                if app.board().is_none() && !app.cache().is_empty() {
                    app.enter_review();
                }
                match app.board() {
                    Some(board) => print_list(board),
                    None => not_reviewing(app, notifier),
                }
            }
            ShellCommand::Select(number) => {
                if app.screen() != Screen::Review {
                    not_reviewing(app, notifier);
                    return;
                }
                match app.select(number - 1) {
                    Some(detail) => {
                        if let Some(board) = app.board() {
                            print_list(board);
                        }
                        print_detail(&detail);
                    }
                    None => notifier.alert(
                        AlertKind::Warning,
                        &format!("There is no user story {}", number),
                    ),
                }
            }
            ShellCommand::Show => match app.board() {
                Some(board) => match board.active_detail() {
                    Some(detail) => print_detail(&detail),
                    None => print_list(board),
                },
                None => not_reviewing(app, notifier),
            },
            ShellCommand::Integrate => {
                if app.screen() != Screen::Review {
                    not_reviewing(app, notifier);
                    return;
                }
                if let Err(e) = app.integrate_one(notifier).await {
                    tracing::debug!("Integration failed: {}", e);
                }
            }
            ShellCommand::IntegrateAll => {
                if app.screen() != Screen::Review {
                    not_reviewing(app, notifier);
                    return;
                }
                match app.integrate_all(notifier).await {
                    Ok(IntegrationOutcome::Cancelled) => println!("Nothing was sent\n"),
                    Ok(IntegrationOutcome::Integrated(_)) => {}
                    Err(e) => tracing::debug!("Bulk integration failed: {}", e),
                }
            }
            ShellCommand::Health => match app.check_health().await {
                Ok(health) => print_health_table(&health, &config.server.base_url),
                Err(e) => notifier.alert(AlertKind::Error, &e.to_string()),
            },
            ShellCommand::ShowStatus => print_status_display(app, config),
            ShellCommand::Help => print_help(),
            ShellCommand::Exit | ShellCommand::None => {}
        }
    }

    fn show_review(app: &App) {
        if let Some(board) = app.board() {
            print_list(board);
            if let Some(detail) = board.active_detail() {
                print_detail(&detail);
            }
        }
    }

    fn not_reviewing(app: &App, notifier: &mut TerminalNotifier) {
        let hint = if app.cache().is_empty() {
            "No user stories yet. Use /file and /generate first."
        } else {
            "Not on the review screen. Use /review to return to the generated user stories."
        };
        notifier.alert(AlertKind::Info, hint);
    }

    fn print_welcome_banner(config: &Config, app: &App) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║          AutoAgile Story Generator - Welcome!                ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Server: {}", config.server.base_url.cyan());
        if let Some(path) = app.selected_file() {
            println!("File:   {}", path.display());
        }
        println!("\nType '/help' for available commands, 'exit' to quit\n");
    }

    /// Display detailed status information about the current session
    fn print_status_display(app: &App, config: &Config) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    AutoAgile Session Status                  ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Screen:          {}", app.screen().to_string().cyan());
        println!("Server:          {}", config.server.base_url);
        println!(
            "File:            {}",
            app.selected_file()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        println!(
            "Description:     {}",
            if app.description().is_empty() {
                "-"
            } else {
                app.description()
            }
        );
        println!("Generate:        {}", app.generate_control().label());
        match app.board() {
            Some(board) => {
                println!("Stories:         {}", board.len());
                println!(
                    "Selected:        {}",
                    board
                        .active()
                        .map(|i| (i + 1).to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
            None => println!("Stories:         -"),
        }
        println!();
    }
}

// One-shot generation handler
pub mod generate {
    //! One-shot story generation.

    use super::*;
    use crate::notifier::MemoryNotifier;
    use std::path::PathBuf;

    /// Generate stories from `file` and print them
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `file` - Document to upload
    /// * `description` - Description to record instead of the file name
    /// * `json` - Print the stories as JSON instead of a table
    ///
    /// # Errors
    ///
    /// Returns the flow error (validation, transport, server or contract)
    pub async fn run_generate(
        config: Config,
        file: PathBuf,
        description: Option<String>,
        json: bool,
    ) -> Result<()> {
        tracing::info!("Generating stories from {}", file.display());

        let service = create_service(&config)?;
        let mut app = App::new(service, &config);
        app.select_file(file);
        if let Some(description) = description {
            app.set_description(description);
        }

        let mut notifier = MemoryNotifier::default();
        let count = app.generate(&mut notifier).await?;
        tracing::debug!("Generated {} stories", count);

        let Some(board) = app.board() else {
            return Ok(());
        };

        if json {
            let encoded =
                serde_json::to_string_pretty(board.stories()).map_err(AutoAgileError::from)?;
            println!("{}", encoded);
            return Ok(());
        }

        let mut table = Table::new();
        table.add_row(row!["#", "Id", "Title"]);
        for (index, story) in board.stories().iter().enumerate() {
            table.add_row(row![
                index + 1,
                story.id_or_position(index),
                story.title.as_deref().unwrap_or("-")
            ]);
        }
        println!(
            "\nGenerated {} user stories for {}:\n",
            count,
            app.description()
        );
        table.printstd();
        println!();

        for (index, story) in board.stories().iter().enumerate() {
            print_detail(&StoryDetail::from_story(index, story));
        }
        Ok(())
    }
}

// Health check handler
pub mod health {
    //! Story service health check.

    use super::*;

    /// Query the story service health and print it
    ///
    /// # Errors
    ///
    /// Returns transport, server or contract errors from the service
    pub async fn run_health(config: Config, json: bool) -> Result<()> {
        let service = create_service(&config)?;
        let health = service.health().await?;

        if json {
            let encoded = serde_json::to_string_pretty(&health).map_err(AutoAgileError::from)?;
            println!("{}", encoded);
        } else {
            print_health_table(&health, &config.server.base_url);
        }
        Ok(())
    }
}

/// Output a health status in table format
fn print_health_table(health: &HealthStatus, base_url: &str) {
    let mut table = Table::new();
    table.add_row(row!["Field", "Value"]);
    table.add_row(row!["Server", base_url]);
    table.add_row(row!["Status", health.status]);
    table.add_row(row!["Provider", health.provider.as_deref().unwrap_or("-")]);
    table.add_row(row!["Model", health.model.as_deref().unwrap_or("-")]);
    table.add_row(row![
        "API key configured",
        health
            .api_key_configured
            .map(|configured| if configured { "yes" } else { "no" })
            .unwrap_or("-")
    ]);
    if let Some(url) = &health.ollama_url {
        table.add_row(row!["Ollama URL", url]);
    }

    println!();
    table.printstd();
    println!();
}
