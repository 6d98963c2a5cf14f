//! Command-line interface definition for autoagile
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive review session, one-shot
//! generation, and a server health check.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// autoagile - generate, review and integrate user stories
///
/// Upload a project-description document to the story service, review
/// the generated user stories, and integrate one or all of them.
#[derive(Parser, Debug, Clone)]
#[command(name = "autoagile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the story service base URL
    #[arg(long)]
    pub server: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for autoagile
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive session (upload, review, integrate)
    Session {
        /// Preselect a document to upload
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Generate stories from a document and print them
    Generate {
        /// Project-description document (.docx, .doc, .txt, .md)
        file: PathBuf,

        /// Description to record instead of the file name
        #[arg(short, long)]
        description: Option<String>,

        /// Print the stories as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the story service is reachable
    Health {
        /// Print the raw health status as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            server: None,
            command: Commands::Session { file: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Session { file: None }));
    }

    #[test]
    fn test_cli_parse_session() {
        let cli = Cli::try_parse_from(["autoagile", "session", "--file", "spec.docx"]).unwrap();
        if let Commands::Session { file } = cli.command {
            assert_eq!(file, Some(PathBuf::from("spec.docx")));
        } else {
            panic!("Expected Session command");
        }
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from([
            "autoagile",
            "generate",
            "spec.md",
            "--description",
            "Billing revamp",
            "--json",
        ])
        .unwrap();
        if let Commands::Generate {
            file,
            description,
            json,
        } = cli.command
        {
            assert_eq!(file, PathBuf::from("spec.md"));
            assert_eq!(description, Some("Billing revamp".to_string()));
            assert!(json);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_generate_requires_file() {
        assert!(Cli::try_parse_from(["autoagile", "generate"]).is_err());
    }

    #[test]
    fn test_cli_parse_health_with_server_override() {
        let cli = Cli::try_parse_from([
            "autoagile",
            "--server",
            "http://10.0.0.2:5000",
            "health",
        ])
        .unwrap();
        assert_eq!(cli.server, Some("http://10.0.0.2:5000".to_string()));
        assert!(matches!(cli.command, Commands::Health { json: false }));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::try_parse_from(["autoagile", "-v", "health"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_missing_subcommand_errors() {
        assert!(Cli::try_parse_from(["autoagile"]).is_err());
    }
}
