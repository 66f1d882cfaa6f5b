//! Argument lists and response parsers for the scheduler's command line.
//!
//! Commands spoken:
//!
//! ```text
//! items add --model <tag> --data <json>
//! review query-count {due|new} --filter=model=='<tag>'
//! review next {due|new} --pre-filter=model=='<tag>'
//! review score <id> <grade>
//! ```

use crate::error::{Error, Result};
use crate::models::{Grade, Item, ItemData, ItemId, QueueState};
use serde::Deserialize;

fn model_filter(model: &str) -> String {
    format!("model=='{}'", model)
}

pub fn add_item_args(model: &str, data: &ItemData) -> Result<Vec<String>> {
    Ok(vec![
        "items".to_string(),
        "add".to_string(),
        "--model".to_string(),
        model.to_string(),
        "--data".to_string(),
        data.to_json()?,
    ])
}

pub fn count_args(state: QueueState, model: &str) -> Vec<String> {
    vec![
        "review".to_string(),
        "query-count".to_string(),
        state.to_string(),
        format!("--filter={}", model_filter(model)),
    ]
}

pub fn next_item_args(state: QueueState, model: &str) -> Vec<String> {
    vec![
        "review".to_string(),
        "next".to_string(),
        state.to_string(),
        format!("--pre-filter={}", model_filter(model)),
    ]
}

pub fn score_args(id: &ItemId, grade: Grade) -> Vec<String> {
    vec![
        "review".to_string(),
        "score".to_string(),
        id.to_string(),
        grade.keyword().to_string(),
    ]
}

/// A plain run of ASCII digits; signs and separators are rejected.
pub fn parse_count(stdout: &str) -> Result<u64> {
    let trimmed = stdout.trim();
    if !is_digits(trimmed) {
        return Err(Error::InvalidCount(trimmed.to_string()));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| Error::InvalidCount(trimmed.to_string()))
}

/// Parse the output of `items add`, which is the new item's integer id.
pub fn parse_added_id(stdout: &str) -> Result<ItemId> {
    let trimmed = stdout.trim();
    if !is_digits(trimmed) {
        return Err(Error::MalformedResponse(trimmed.to_string()));
    }
    Ok(ItemId::new(trimmed))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: ItemId,
    #[serde(default)]
    model: Option<String>,
    data: serde_json::Value,
}

/// Parse the output of `review next`. Empty output means the queue is empty.
pub fn parse_next_item(stdout: &str, model: &str) -> Result<Option<Item>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }

    let raw: RawItem = serde_json::from_str(trimmed)
        .map_err(|e| Error::MalformedItem(format!("{}: {}", e, trimmed)))?;

    // Some scheduler builds store the payload as an encoded string.
    let data: ItemData = match raw.data {
        serde_json::Value::String(encoded) => serde_json::from_str(&encoded),
        value => serde_json::from_value(value),
    }
    .map_err(|e| Error::MalformedItem(format!("item {} data: {}", raw.id, e)))?;

    Ok(Some(Item {
        id: raw.id,
        model: raw.model.unwrap_or_else(|| model.to_string()),
        data,
    }))
}
