//! Story list/detail view state
//!
//! [`StoryBoard`] is the review screen's application state: the ordered
//! story list plus at most one active entry. Rendering produces plain
//! [`ListEntry`] values so the same state drives the terminal printer
//! and the tests.

use crate::formatter::format_test_cases;
use crate::story::StoryRecord;
use colored::Colorize;

/// Label shown instead of a list when nothing has been generated
pub const EMPTY_PLACEHOLDER: &str = "No user stories available";

/// Text shown for a missing or empty detail field
pub const MISSING_FIELD: &str = "-";

/// One rendered line of the story list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// Selectable story entry
    Story {
        /// Zero-based index, also the selection key
        index: usize,
        /// Positional label ("User story N")
        label: String,
        /// Whether this entry is the active one
        active: bool,
    },
    /// Non-interactive placeholder for an empty list
    Placeholder(String),
}

/// Field values shown in the detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDetail {
    /// Zero-based index of the story shown
    pub index: usize,
    pub title: String,
    pub description: String,
    pub definition_of_done: String,
    /// Test cases after tolerant formatting
    pub test_cases: String,
}

impl StoryDetail {
    /// Build the detail panel for `story` at `index`
    pub fn from_story(index: usize, story: &StoryRecord) -> Self {
        Self {
            index,
            title: or_missing(story.title.as_deref()),
            description: or_missing(story.description.as_deref()),
            definition_of_done: or_missing(story.definition_of_done.as_deref()),
            test_cases: story
                .test_cases_text()
                .filter(|text| !text.is_empty())
                .map(|text| format_test_cases(&text))
                .unwrap_or_else(|| MISSING_FIELD.to_string()),
        }
    }
}

fn or_missing(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => MISSING_FIELD.to_string(),
    }
}

/// Positional label for the story at `index`
pub fn story_label(index: usize) -> String {
    format!("User story {}", index + 1)
}

/// Review screen state: ordered stories and the active selection
#[derive(Debug, Clone, Default)]
pub struct StoryBoard {
    stories: Vec<StoryRecord>,
    active: Option<usize>,
}

impl StoryBoard {
    /// Create a board with no active selection
    pub fn new(stories: Vec<StoryRecord>) -> Self {
        Self {
            stories,
            active: None,
        }
    }

    /// Create a board and apply the default selection
    ///
    /// Index 0 is selected when the list is non-empty. Returns the board
    /// and the detail panel for the default selection, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use autoagile::board::StoryBoard;
    /// use autoagile::story::StoryRecord;
    ///
    /// let (board, detail) = StoryBoard::activate(vec![StoryRecord::new("T", "D", "DoD", "Test: ok")]);
    /// assert_eq!(board.active(), Some(0));
    /// assert_eq!(detail.unwrap().title, "T");
    /// ```
    pub fn activate(stories: Vec<StoryRecord>) -> (Self, Option<StoryDetail>) {
        let mut board = Self::new(stories);
        let detail = if board.is_empty() {
            None
        } else {
            board.select(0)
        };
        (board, detail)
    }

    /// Stories in display order
    pub fn stories(&self) -> &[StoryRecord] {
        &self.stories
    }

    /// Number of stories
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// True when there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Index of the active entry, if any
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Active story with its index
    pub fn active_story(&self) -> Option<(usize, &StoryRecord)> {
        let index = self.active?;
        self.stories.get(index).map(|story| (index, story))
    }

    /// Whether the "no stories" banner should be revealed
    pub fn show_empty_banner(&self) -> bool {
        self.stories.is_empty()
    }

    /// Render the list, one entry per story in original order
    pub fn render(&self) -> Vec<ListEntry> {
        if self.stories.is_empty() {
            return vec![ListEntry::Placeholder(EMPTY_PLACEHOLDER.to_string())];
        }

        (0..self.stories.len())
            .map(|index| ListEntry::Story {
                index,
                label: story_label(index),
                active: self.active == Some(index),
            })
            .collect()
    }

    /// Make `index` the single active entry and return its detail panel
    ///
    /// Out-of-range indices are logged and ignored: the previous
    /// selection stays and no detail is produced.
    pub fn select(&mut self, index: usize) -> Option<StoryDetail> {
        let Some(story) = self.stories.get(index) else {
            tracing::error!(
                "Invalid story index: {} (have {} stories)",
                index,
                self.stories.len()
            );
            return None;
        };

        self.active = Some(index);
        Some(StoryDetail::from_story(index, story))
    }

    /// Detail panel for the active story
    pub fn active_detail(&self) -> Option<StoryDetail> {
        self.active_story()
            .map(|(index, story)| StoryDetail::from_story(index, story))
    }
}

/// Print the rendered list to stdout
pub fn print_list(board: &StoryBoard) {
    if board.show_empty_banner() {
        println!("\n{}\n", "No stories have been generated yet.".yellow());
    }
    for entry in board.render() {
        match entry {
            ListEntry::Story {
                label,
                active: true,
                ..
            } => println!("  {} {}", "▶".cyan(), label.cyan().bold()),
            ListEntry::Story { label, .. } => println!("    {}", label),
            ListEntry::Placeholder(text) => println!("    {}", text.dimmed()),
        }
    }
    println!();
}

/// Print a detail panel to stdout
pub fn print_detail(detail: &StoryDetail) {
    println!("{}", story_label(detail.index).bold().underline());
    println!("\n{}\n{}", "Title".green().bold(), detail.title);
    println!("\n{}\n{}", "Description".green().bold(), detail.description);
    println!(
        "\n{}\n{}",
        "Definition of Done".green().bold(),
        detail.definition_of_done
    );
    println!("\n{}\n{}\n", "Test Cases".green().bold(), detail.test_cases);
}
