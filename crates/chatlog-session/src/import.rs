use chatlog_core::message::new_message_id;
use chatlog_core::{ChatError, ChatResult, Message, Role};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Result of parsing an import payload.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Records that passed validation, in input order.
    pub messages: Vec<Message>,
    /// Number of records that were silently skipped.
    pub dropped: usize,
}

/// Parses an exported snapshot.
///
/// Fails only when the input is not JSON or its root is not an array. Records
/// without a string `text` or with a role other than `user`/`bot` are dropped.
/// A record keeps its `id` unless it is missing, empty, or already taken by an
/// earlier record, in which case a fresh one is generated.
pub fn parse_snapshot(text: &str) -> ChatResult<ImportOutcome> {
    let root: Value = serde_json::from_str(text)?;
    let Value::Array(items) = root else {
        return Err(ChatError::Session(
            "Import root is not an array".to_string(),
        ));
    };

    let mut seen = HashSet::new();
    let total = items.len();
    let messages: Vec<Message> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|record| normalize_record(record, &mut seen))
        .collect();

    Ok(ImportOutcome {
        dropped: total - messages.len(),
        messages,
    })
}

fn normalize_record(record: &Map<String, Value>, seen: &mut HashSet<String>) -> Option<Message> {
    let text = record.get("text")?.as_str()?;
    let role = Role::parse_tag(record.get("role")?.as_str()?)?;

    let id = match record.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() && !seen.contains(id) => id.to_string(),
        _ => new_message_id(),
    };
    seen.insert(id.clone());

    let time = record
        .get("time")
        .and_then(Value::as_str)
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map_or_else(Utc::now, |t| t.with_timezone(&Utc));

    Some(Message {
        id,
        text: text.to_string(),
        role,
        time,
        edited: record
            .get("edited")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}
