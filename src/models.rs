use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Model tag the scheduler uses to scope image flashcards.
pub const IMAGE_FLASHCARD_MODEL: &str = "flashcard_image";

/// Opaque identifier assigned by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// The scheduler prints integer ids; accept strings too.
impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(ItemId(s)),
            serde_json::Value::Number(n) => Ok(ItemId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or number id, got {}",
                other
            ))),
        }
    }
}

/// Payload of an image flashcard: references to captured assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub questions: Vec<PathBuf>,
    pub answers: Vec<PathBuf>,
}

impl ItemData {
    pub fn new(questions: Vec<PathBuf>, answers: Vec<PathBuf>) -> Self {
        Self { questions, answers }
    }

    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && !self.answers.is_empty()
    }

    /// Question assets followed by answer assets.
    pub fn questions_then_answers(&self) -> Vec<PathBuf> {
        self.questions
            .iter()
            .chain(self.answers.iter())
            .cloned()
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        if !self.is_complete() {
            return Err(Error::EmptyItem);
        }
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub model: String,
    pub data: ItemData,
}

/// Queue an item is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Due,
    New,
}

impl QueueState {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueState::Due => "due",
            QueueState::New => "new",
        }
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recall quality, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Word sent to the scheduler.
    pub fn keyword(self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    /// Keyword followed by a human readable description.
    pub fn label(self) -> &'static str {
        match self {
            Grade::Again => "again could not answer",
            Grade::Hard => "hard could answer with difficulty",
            Grade::Good => "good could answer",
            Grade::Easy => "easy could answer easily",
        }
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|g| g.label().to_string()).collect()
    }

    pub fn from_keyword(keyword: &str) -> Result<Self> {
        match keyword.trim().to_lowercase().as_str() {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            _ => Err(Error::UnknownGrade(keyword.to_string())),
        }
    }

    /// Parse a chosen label; only its leading word is significant.
    pub fn from_label(label: &str) -> Result<Self> {
        let keyword = label.split_whitespace().next().unwrap_or_default();
        Self::from_keyword(keyword)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
