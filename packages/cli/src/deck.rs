//! Deck source
//!
//! A deck is a JSON array in `<deck_dir>/<deck>.json`. Each entry needs a
//! stable id (`card_uuid`, or `uuid` as written by the ingestion scripts) and a
//! `card_name`; every other field becomes part of the back of the card, in
//! file order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use recall_algo::Named;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// One labelled field on the back of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Join key into the review store, unique within the deck
    pub id: String,
    /// Front of the card
    pub name: String,
    pub deck: String,
    pub back: Vec<BackField>,
}

impl Card {
    pub fn front(&self) -> &str {
        &self.name
    }

    pub fn back(&self) -> &[BackField] {
        &self.back
    }
}

impl Named for Card {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loads the immutable card catalog of a deck
pub trait DeckSource {
    /// Cards in declaration order; identical across loads of an unchanged source
    fn load(&self, deck: &str) -> AppResult<Vec<Card>>;
}

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(alias = "uuid")]
    card_uuid: Option<String>,
    card_name: Option<String>,
    deck_name: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct JsonDeckSource {
    dir: PathBuf,
}

impl JsonDeckSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn deck_path(&self, deck: &str) -> PathBuf {
        self.dir.join(format!("{deck}.json"))
    }

    /// Parse deck JSON text
    pub fn parse(deck: &str, text: &str) -> AppResult<Vec<Card>> {
        let invalid = |reason: String| AppError::InvalidDeck {
            deck: deck.to_string(),
            reason,
        };

        let raw: Vec<RawCard> =
            serde_json::from_str(text).map_err(|e| invalid(format!("malformed JSON: {e}")))?;

        let mut seen = HashSet::new();
        let mut cards = Vec::with_capacity(raw.len());

        for (position, entry) in raw.into_iter().enumerate() {
            let id = entry
                .card_uuid
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| invalid(format!("entry {position} has no card_uuid")))?;
            let name = entry
                .card_name
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| invalid(format!("entry {position} ({id}) has no card_name")))?;

            if !seen.insert(id.clone()) {
                return Err(invalid(format!("duplicate card id {id}")));
            }

            let back = entry
                .fields
                .into_iter()
                .map(|(label, value)| BackField {
                    label,
                    value: field_text(&value),
                })
                .collect();

            cards.push(Card {
                id,
                name,
                deck: entry.deck_name.unwrap_or_else(|| deck.to_string()),
                back,
            });
        }

        Ok(cards)
    }
}

impl DeckSource for JsonDeckSource {
    fn load(&self, deck: &str) -> AppResult<Vec<Card>> {
        let path = self.deck_path(deck);
        let not_found = || AppError::DeckNotFound {
            deck: deck.to_string(),
            path: path.display().to_string(),
        };

        // A deck name is a file stem, never a path
        if deck.is_empty() || deck.contains(['/', '\\']) || deck.starts_with('.') {
            return Err(not_found());
        }
        if !path.is_file() {
            return Err(not_found());
        }

        let text = std::fs::read_to_string(&path)?;
        let cards = Self::parse(deck, &text)?;

        tracing::info!(deck, cards = cards.len(), path = %path.display(), "deck loaded");
        Ok(cards)
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
