//! Client flows: upload/generate, review, integrate
//!
//! [`App`] is the state of one client session. Command handlers are
//! plain async methods; user feedback goes through a [`Notifier`] so the
//! same flows drive the interactive shell, the one-shot commands and
//! the tests.
//!
//! Every handler reports exactly once through the notifier, and every
//! failure also comes back as an error carrying its
//! [`crate::error::ErrorKind`].

use crate::api::{
    IntegrateAllRequest, IntegrateStoryRequest, IntegrationReceipt, StoryService, UploadDocument,
};
use crate::board::{story_label, StoryBoard, StoryDetail};
use crate::config::{Config, ReviewConfig, UploadConfig};
use crate::error::{AutoAgileError, Result};
use crate::notifier::{AlertKind, Notifier};
use crate::session::SessionCache;
use std::fmt;
use std::path::{Path, PathBuf};

/// Label of the generate control while idle
pub const GENERATE_LABEL: &str = "Generate User Stories";
/// Label of the generate control while a request is pending
pub const GENERATING_LABEL: &str = "Generating...";

/// Screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Document selection and generation
    Upload,
    /// Story list/detail review and integration
    Review,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "UPLOAD"),
            Self::Review => write!(f, "REVIEW"),
        }
    }
}

/// A control that is disabled while its request is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerControl {
    idle_label: String,
    busy_label: String,
    label: String,
    enabled: bool,
}

impl TriggerControl {
    /// Create an enabled control
    pub fn new(idle_label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        let idle_label = idle_label.into();
        Self {
            label: idle_label.clone(),
            idle_label,
            busy_label: busy_label.into(),
            enabled: true,
        }
    }

    /// The generate control
    pub fn generate() -> Self {
        Self::new(GENERATE_LABEL, GENERATING_LABEL)
    }

    /// Whether the control accepts a new request
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Disable the control and show the busy label
    ///
    /// Returns `None` when a request is already pending. The control is
    /// restored when the guard drops, unless the flow navigated away.
    pub fn begin(&mut self) -> Option<PendingGuard<'_>> {
        if !self.enabled {
            return None;
        }
        self.enabled = false;
        self.label = self.busy_label.clone();
        Some(PendingGuard {
            control: self,
            restore: true,
        })
    }

    fn restore(&mut self) {
        self.enabled = true;
        self.label = self.idle_label.clone();
    }
}

/// Keeps a [`TriggerControl`] disabled for the life of a request
pub struct PendingGuard<'a> {
    control: &'a mut TriggerControl,
    restore: bool,
}

impl PendingGuard<'_> {
    /// Leave the control as it is; the screen it lives on is going away
    pub fn navigate_away(mut self) {
        self.restore = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.restore {
            self.control.restore();
        }
    }
}

/// Result of a bulk integration request
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationOutcome {
    /// The server accepted the request
    Integrated(IntegrationReceipt),
    /// The user declined the confirmation; nothing was sent
    Cancelled,
}

/// State of one client session
pub struct App {
    service: Box<dyn StoryService>,
    upload: UploadConfig,
    review: ReviewConfig,
    cache: SessionCache,
    screen: Screen,
    selected_file: Option<PathBuf>,
    description: String,
    generate_control: TriggerControl,
    board: Option<StoryBoard>,
}

impl App {
    /// Create a session on the upload screen
    pub fn new(service: Box<dyn StoryService>, config: &Config) -> Self {
        Self {
            service,
            upload: config.upload.clone(),
            review: config.review.clone(),
            cache: SessionCache::new(),
            screen: Screen::Upload,
            selected_file: None,
            description: String::new(),
            generate_control: TriggerControl::generate(),
            board: None,
        }
    }

    /// Current screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Session cache
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Generate control state
    pub fn generate_control(&self) -> &TriggerControl {
        &self.generate_control
    }

    /// Story board, while on the review screen
    pub fn board(&self) -> Option<&StoryBoard> {
        self.board.as_ref()
    }

    /// Selected document, if any
    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    /// Description input
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Select the document to upload
    ///
    /// The description input is filled with the file name, as a file
    /// picker would.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.description = display_name(&path);
        tracing::info!("File selected: {}", path.display());
        self.selected_file = Some(path);
    }

    /// Replace the description input
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Return to the upload screen with a fresh generate control
    pub fn open_upload(&mut self) {
        self.screen = Screen::Upload;
        self.board = None;
        self.generate_control = TriggerControl::generate();
    }

    /// Upload the selected document and move to the review screen
    ///
    /// On success the stories are cached together with the description
    /// (or the file name when no description was entered), the review
    /// screen is activated and the number of stories is returned. On
    /// failure the generate control is restored, and the cache, the
    /// screen and any review board are left as they were.
    ///
    /// # Errors
    ///
    /// Validation errors when no readable, accepted file is selected;
    /// transport, server or contract errors from the service.
    pub async fn generate(&mut self, notifier: &mut dyn Notifier) -> Result<usize> {
        let Some(path) = self.selected_file.clone() else {
            return reject(notifier, "Please select a file to upload");
        };
        if !self.upload.accepts(&path) {
            return reject(
                notifier,
                &format!(
                    "File type not allowed. Please upload {} files",
                    self.upload
                        .allowed_extensions
                        .iter()
                        .map(|ext| format!(".{}", ext))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            );
        }

        let file_name = display_name(&path);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return reject(
                    notifier,
                    &format!("Could not read {}: {}", path.display(), e),
                )
            }
        };
        let description = match self.description.trim() {
            "" => file_name.clone(),
            entered => entered.to_string(),
        };
        let document = UploadDocument::new(file_name, bytes);

        if self.screen == Screen::Review {
            // The control was left disabled when the last run navigated away
            self.generate_control = TriggerControl::generate();
        }
        let Some(guard) = self.generate_control.begin() else {
            return reject(notifier, "Generation already in progress");
        };

        let outcome = match self.service.generate_stories(&document).await {
            Ok(stories) => self
                .cache
                .put(&stories, &description)
                .map(|()| stories.len()),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(count) => {
                guard.navigate_away();
                tracing::info!("Cached {} stories for '{}'", count, description);
                self.enter_review();
                Ok(count)
            }
            Err(err) => {
                drop(guard);
                notifier.alert(
                    AlertKind::Error,
                    &format!("Error generating user stories: {}", err),
                );
                Err(err)
            }
        }
    }

    /// Activate the review screen from the session cache
    ///
    /// Called after a successful generation and whenever the user returns
    /// to the review screen. Selects the first story when there is one and
    /// returns its detail.
    pub fn enter_review(&mut self) -> Option<StoryDetail> {
        let (stories, description) = self.cache.get();
        tracing::debug!(
            "Entering review with {} stories ({})",
            stories.len(),
            description.as_deref().unwrap_or("no description")
        );
        let (board, detail) = StoryBoard::activate(stories);
        self.board = Some(board);
        self.screen = Screen::Review;
        detail
    }

    /// Select the story at `index` (zero-based)
    ///
    /// Returns `None` and keeps the current selection when the index is
    /// out of range or the review screen is not active.
    pub fn select(&mut self, index: usize) -> Option<StoryDetail> {
        match self.board.as_mut() {
            Some(board) => board.select(index),
            None => {
                tracing::error!("Cannot select story {}: review screen not active", index);
                None
            }
        }
    }

    /// Integrate the active story
    ///
    /// # Errors
    ///
    /// Validation error when no story is active; transport, server or
    /// contract errors from the service.
    pub async fn integrate_one(
        &mut self,
        notifier: &mut dyn Notifier,
    ) -> Result<IntegrationReceipt> {
        let Some((index, story)) = self.board.as_ref().and_then(StoryBoard::active_story) else {
            return reject(notifier, "Please select a user story to integrate.");
        };

        let request = IntegrateStoryRequest {
            story_id: story.id_or_position(index),
            story: self.review.send_full_records.then(|| story.clone()),
        };
        let label = story_label(index);

        match self.service.integrate_story(&request).await {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("{} integrated successfully", label));
                notifier.alert(AlertKind::Success, &message);
                Ok(receipt)
            }
            Err(err) => {
                notifier.alert(
                    AlertKind::Error,
                    &format!("Error integrating {}: {}", label.to_lowercase(), err),
                );
                Err(err)
            }
        }
    }

    /// Integrate every story in one request, after confirmation
    ///
    /// # Errors
    ///
    /// Validation error when there are no stories; transport, server or
    /// contract errors from the service.
    pub async fn integrate_all(
        &mut self,
        notifier: &mut dyn Notifier,
    ) -> Result<IntegrationOutcome> {
        let stories = self
            .board
            .as_ref()
            .map(|board| board.stories().to_vec())
            .unwrap_or_default();
        if stories.is_empty() {
            return reject(notifier, "No user stories available to integrate.");
        }

        if self.review.confirm_bulk_integration
            && !notifier.confirm(&format!("Integrate all {} user stories?", stories.len()))
        {
            tracing::info!("Bulk integration cancelled by user");
            return Ok(IntegrationOutcome::Cancelled);
        }

        let request = IntegrateAllRequest {
            story_ids: stories
                .iter()
                .enumerate()
                .map(|(index, story)| story.id_or_position(index))
                .collect(),
            stories: self.review.send_full_records.then_some(stories),
        };

        match self.service.integrate_all(&request).await {
            Ok(receipt) => {
                let message = receipt.message.clone().unwrap_or_else(|| {
                    format!(
                        "All {} user stories integrated successfully",
                        request.story_ids.len()
                    )
                });
                notifier.alert(AlertKind::Success, &message);
                Ok(IntegrationOutcome::Integrated(receipt))
            }
            Err(err) => {
                notifier.alert(
                    AlertKind::Error,
                    &format!("Error integrating user stories: {}", err),
                );
                Err(err)
            }
        }
    }

    /// Query the service health
    pub async fn check_health(&self) -> Result<crate::api::HealthStatus> {
        self.service.health().await
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn reject<T>(notifier: &mut dyn Notifier, message: &str) -> Result<T> {
    tracing::warn!("{}", message);
    notifier.alert(AlertKind::Warning, message);
    Err(AutoAgileError::Validation(message.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HealthStatus;
    use crate::error::{error_kind, ErrorKind};
    use crate::notifier::MemoryNotifier;
    use crate::story::{StoryId, StoryRecord};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        generate: usize,
        one: Vec<IntegrateStoryRequest>,
        all: Vec<IntegrateAllRequest>,
    }

    struct FakeService {
        stories: Vec<StoryRecord>,
        fail_with: Option<u16>,
        /// Generation calls that succeed before `fail_with` applies
        succeed_first: usize,
        calls: Arc<Mutex<Calls>>,
    }

    #[async_trait]
    impl StoryService for FakeService {
        async fn generate_stories(&self, _document: &UploadDocument) -> Result<Vec<StoryRecord>> {
            let mut calls = self.calls.lock().unwrap();
            calls.generate += 1;
            match self.fail_with {
                Some(status) if calls.generate > self.succeed_first => {
                    Err(AutoAgileError::server_status(status).into())
                }
                _ => Ok(self.stories.clone()),
            }
        }

        async fn integrate_story(
            &self,
            request: &IntegrateStoryRequest,
        ) -> Result<IntegrationReceipt> {
            self.calls.lock().unwrap().one.push(request.clone());
            Ok(receipt())
        }

        async fn integrate_all(
            &self,
            request: &IntegrateAllRequest,
        ) -> Result<IntegrationReceipt> {
            self.calls.lock().unwrap().all.push(request.clone());
            Ok(receipt())
        }

        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus {
                status: "ok".to_string(),
                provider: None,
                model: None,
                api_key_configured: None,
                ollama_url: None,
            })
        }
    }

    fn receipt() -> IntegrationReceipt {
        IntegrationReceipt {
            success: true,
            message: None,
            story_id: None,
            story_ids: None,
            output_file: None,
        }
    }

    fn app_with(
        stories: Vec<StoryRecord>,
        fail_with: Option<u16>,
        config: Config,
    ) -> (App, Arc<Mutex<Calls>>) {
        failing_after(stories, 0, fail_with, config)
    }

    fn failing_after(
        stories: Vec<StoryRecord>,
        succeed_first: usize,
        fail_with: Option<u16>,
        config: Config,
    ) -> (App, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let service = FakeService {
            stories,
            fail_with,
            succeed_first,
            calls: Arc::clone(&calls),
        };
        (App::new(Box::new(service), &config), calls)
    }

    fn two_stories() -> Vec<StoryRecord> {
        vec![
            StoryRecord::new("T", "D", "DoD", "Test: ok").with_id(10),
            StoryRecord::new("U", "E", "DoD2", "Test: ok"),
        ]
    }

    fn temp_doc(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, "The system shall let users log in.").unwrap();
        path
    }

    #[test]
    fn test_trigger_control_restores_on_drop() {
        let mut control = TriggerControl::generate();
        {
            let _guard = control.begin().unwrap();
        }
        assert!(control.is_enabled());
        assert_eq!(control.label(), GENERATE_LABEL);
    }

    #[test]
    fn test_trigger_control_stays_disabled_after_navigation() {
        let mut control = TriggerControl::generate();
        control.begin().unwrap().navigate_away();
        assert!(!control.is_enabled());
        assert_eq!(control.label(), GENERATING_LABEL);
        assert!(control.begin().is_none());
    }

    #[test]
    fn test_select_file_fills_description() {
        let (mut app, _) = app_with(Vec::new(), None, Config::default());
        app.select_file("/docs/billing.docx");
        assert_eq!(app.description(), "billing.docx");
        assert_eq!(app.selected_file(), Some(Path::new("/docs/billing.docx")));
    }

    #[tokio::test]
    async fn test_generate_without_file_is_validation_error() {
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        let mut notifier = MemoryNotifier::default();

        let err = app.generate(&mut notifier).await.unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::Validation);
        assert_eq!(calls.lock().unwrap().generate, 0);
        assert_eq!(notifier.last().unwrap().0, AlertKind::Warning);
        assert!(app.generate_control().is_enabled());
    }

    #[tokio::test]
    async fn test_generate_rejects_disallowed_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "diagram.png"));

        let err = app.generate(&mut MemoryNotifier::default()).await.unwrap_err();
        assert!(err.to_string().contains("File type not allowed"));
        assert_eq!(calls.lock().unwrap().generate, 0);
    }

    #[tokio::test]
    async fn test_generate_success_caches_and_enters_review() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        let mut notifier = MemoryNotifier::default();

        let count = app.generate(&mut notifier).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(app.screen(), Screen::Review);
        assert_eq!(app.board().unwrap().active(), Some(0));
        let (cached, description) = app.cache().get();
        assert_eq!(cached, two_stories());
        assert_eq!(description.as_deref(), Some("spec.md"));
        assert!(notifier.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_generate_prefers_entered_description() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        app.set_description("Billing revamp");

        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        assert_eq!(app.cache().get().1.as_deref(), Some("Billing revamp"));
    }

    #[tokio::test]
    async fn test_generate_failure_restores_control_and_keeps_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _) = app_with(two_stories(), Some(500), Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        let mut notifier = MemoryNotifier::default();

        let err = app.generate(&mut notifier).await.unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::Server);
        assert!(app.generate_control().is_enabled());
        assert_eq!(app.generate_control().label(), GENERATE_LABEL);
        assert!(app.cache().is_empty());
        assert_eq!(app.screen(), Screen::Upload);
        let (kind, message) = notifier.last().unwrap();
        assert_eq!(*kind, AlertKind::Error);
        assert!(message.contains("Server error 500"));
    }

    #[tokio::test]
    async fn test_generate_again_from_review_resets_control() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));

        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        assert!(!app.generate_control().is_enabled());
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        assert_eq!(calls.lock().unwrap().generate, 2);
    }

    #[tokio::test]
    async fn test_failed_generate_from_review_keeps_review() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = failing_after(two_stories(), 1, Some(500), Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        app.select(1);

        let err = app
            .generate(&mut MemoryNotifier::default())
            .await
            .unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::Server);
        assert_eq!(calls.lock().unwrap().generate, 2);
        assert_eq!(app.screen(), Screen::Review);
        let board = app.board().unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board.active(), Some(1));
        assert!(app.generate_control().is_enabled());
        assert_eq!(app.cache().get().0, two_stories());
    }

    #[tokio::test]
    async fn test_rejected_file_from_review_keeps_review() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        app.select_file(temp_doc(&dir, "diagram.png"));

        let err = app
            .generate(&mut MemoryNotifier::default())
            .await
            .unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::Validation);
        assert_eq!(calls.lock().unwrap().generate, 1);
        assert_eq!(app.screen(), Screen::Review);
        assert!(app.board().is_some());
    }

    #[tokio::test]
    async fn test_upload_then_review_restores_cached_stories() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        app.select(1);

        app.open_upload();
        assert_eq!(app.screen(), Screen::Upload);
        assert!(app.board().is_none());

        let detail = app.enter_review().unwrap();
        assert_eq!(detail.title, "T");
        assert_eq!(app.screen(), Screen::Review);
        let board = app.board().unwrap();
        assert_eq!(board.stories(), two_stories().as_slice());
        assert_eq!(board.active(), Some(0));
        assert_eq!(calls.lock().unwrap().generate, 1);
    }

    #[tokio::test]
    async fn test_integrate_one_without_selection_is_validation_error() {
        let (mut app, calls) = app_with(Vec::new(), None, Config::default());
        app.enter_review();
        let mut notifier = MemoryNotifier::default();

        let err = app.integrate_one(&mut notifier).await.unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::Validation);
        assert!(calls.lock().unwrap().one.is_empty());
        assert_eq!(
            notifier.last().unwrap().1,
            "Please select a user story to integrate."
        );
    }

    #[tokio::test]
    async fn test_integrate_one_sends_id_or_position() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        let mut notifier = MemoryNotifier::default();

        app.integrate_one(&mut notifier).await.unwrap();
        app.select(1);
        app.integrate_one(&mut notifier).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.one[0].story_id, StoryId::Number(10));
        assert_eq!(calls.one[1].story_id, StoryId::Number(2));
        assert_eq!(calls.one[1].story.as_ref().unwrap().title.as_deref(), Some("U"));
        assert_eq!(
            notifier.last().unwrap(),
            &(
                AlertKind::Success,
                "User story 2 integrated successfully".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_integrate_one_without_full_records() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.review.send_full_records = false;
        let (mut app, calls) = app_with(two_stories(), None, config);
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();

        app.integrate_one(&mut MemoryNotifier::default()).await.unwrap();
        assert!(calls.lock().unwrap().one[0].story.is_none());
    }

    #[tokio::test]
    async fn test_integrate_all_empty_list_is_validation_error() {
        let (mut app, calls) = app_with(Vec::new(), None, Config::default());
        app.enter_review();
        let mut notifier = MemoryNotifier::answering(true);

        let err = app.integrate_all(&mut notifier).await.unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::Validation);
        assert!(notifier.questions.is_empty());
        assert!(calls.lock().unwrap().all.is_empty());
    }

    #[tokio::test]
    async fn test_integrate_all_declined_sends_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        let mut notifier = MemoryNotifier::answering(false);

        let outcome = app.integrate_all(&mut notifier).await.unwrap();
        assert_eq!(outcome, IntegrationOutcome::Cancelled);
        assert_eq!(
            notifier.questions,
            vec!["Integrate all 2 user stories?".to_string()]
        );
        assert!(calls.lock().unwrap().all.is_empty());
    }

    #[tokio::test]
    async fn test_integrate_all_confirmed_sends_ordered_ids() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, calls) = app_with(two_stories(), None, Config::default());
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        let mut notifier = MemoryNotifier::answering(true);

        let outcome = app.integrate_all(&mut notifier).await.unwrap();
        assert!(matches!(outcome, IntegrationOutcome::Integrated(_)));

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls.all[0].story_ids,
            vec![StoryId::Number(10), StoryId::Number(2)]
        );
        assert_eq!(calls.all[0].stories.as_ref().unwrap().len(), 2);
        assert_eq!(
            notifier.last().unwrap().1,
            "All 2 user stories integrated successfully"
        );
    }

    #[tokio::test]
    async fn test_integrate_all_without_confirmation_setting() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.review.confirm_bulk_integration = false;
        let (mut app, calls) = app_with(two_stories(), None, config);
        app.select_file(temp_doc(&dir, "spec.md"));
        app.generate(&mut MemoryNotifier::default()).await.unwrap();
        let mut notifier = MemoryNotifier::answering(false);

        app.integrate_all(&mut notifier).await.unwrap();
        assert!(notifier.questions.is_empty());
        assert_eq!(calls.lock().unwrap().all.len(), 1);
    }

    #[test]
    fn test_select_before_review_is_noop() {
        let (mut app, _) = app_with(two_stories(), None, Config::default());
        assert!(app.select(0).is_none());
    }
}
