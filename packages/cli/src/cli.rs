use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::selector::SelectionMode;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "flashcards",
    about = "Spaced-repetition flashcards in the terminal",
    version
)]
pub struct Cli {
    /// Deck name (a JSON file in the deck directory, without extension)
    #[arg(long)]
    pub deck: String,

    /// Draw cards at random instead of by due date
    #[arg(long, conflicts_with_all = ["card", "list", "search"])]
    pub random: bool,

    /// Number of cards to review in this session
    #[arg(long, conflicts_with_all = ["card", "list", "search"])]
    pub num: Option<usize>,

    /// Review one card by name (case-insensitive) or id
    #[arg(long, conflicts_with_all = ["list", "search"])]
    pub card: Option<String>,

    /// List the deck with its scheduling state
    #[arg(long, value_enum, conflicts_with = "search")]
    pub list: Option<ListScope>,

    /// Show every card whose name contains the text, without grading
    #[arg(long)]
    pub search: Option<String>,

    /// Directory holding deck files (overrides FLASHCARDS_DECK_DIR)
    #[arg(long)]
    pub deck_dir: Option<PathBuf>,

    /// Review store path (overrides FLASHCARDS_DB)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListScope {
    /// Every card of the deck
    All,
    /// Only cards with a stored review state
    #[value(name = "in_db")]
    InDb,
}

/// What one invocation does, once flags are validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Review { mode: SelectionMode, num: usize },
    List(ListScope),
    Search(String),
}

impl Cli {
    pub fn action(&self) -> Action {
        if let Some(scope) = self.list {
            return Action::List(scope);
        }
        if let Some(query) = &self.search {
            return Action::Search(query.clone());
        }
        if let Some(name) = &self.card {
            return Action::Review {
                mode: SelectionMode::Named(name.clone()),
                num: 1,
            };
        }

        let mode = if self.random {
            SelectionMode::Random
        } else {
            SelectionMode::Due
        };
        Action::Review {
            mode,
            num: self.num.unwrap_or(1),
        }
    }
}
