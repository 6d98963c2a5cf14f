//! AutoAgile - user story generation client library
//!
//! This library provides the client side of the AutoAgile story service:
//! uploading a project-description document, reviewing the generated
//! user stories and sending them for integration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Story service abstraction and its HTTP implementation
//! - `app`: Upload/generate, review and integration flows
//! - `board`: Story list and detail view state
//! - `formatter`: Tolerant rendering of free-form test cases
//! - `session`: Session-scoped story cache
//! - `story`: Story record model
//! - `notifier`: Alerts and confirmations
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use autoagile::{create_service, App, Config, MemoryNotifier};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let mut app = App::new(create_service(&config)?, &config);
//!     app.select_file("requirements.md");
//!     let count = app.generate(&mut MemoryNotifier::default()).await?;
//!     println!("{} stories", count);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod notifier;
pub mod session;
pub mod story;

// Re-export commonly used types
pub use api::{create_service, HttpStoryService, StoryService};
pub use app::{App, IntegrationOutcome, Screen};
pub use board::StoryBoard;
pub use config::Config;
pub use error::{AutoAgileError, ErrorKind, Result};
pub use formatter::format_test_cases;
pub use notifier::{AlertKind, MemoryNotifier, Notifier, TerminalNotifier};
pub use session::SessionCache;
pub use story::{StoryId, StoryRecord};
