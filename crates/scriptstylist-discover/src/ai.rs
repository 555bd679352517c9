//! AI discovery edge: the prompt we hand to the model collaborator and the
//! validation its reply must pass before entering a character set.
//!
//! The reply is untrusted. Records with a blank name or a non-numeric or
//! non-finite confidence are dropped; finite confidences outside [0, 1] are
//! clamped. Both `{"characters": [...]}` and a bare `[...]` are accepted.

use scriptstylist_core::{Character, Confidence, Error, Result, Script};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// One record as the model returned it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AiCharacter {
    pub name: String,
    pub confidence: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AiPayload {
    Wrapped { characters: Vec<Value> },
    Bare(Vec<Value>),
}

/// Build the character-identification prompt for `script`.
pub fn build_discovery_prompt(script: &Script) -> String {
    format!(
        "You are a script analysis expert. Your task is to identify the characters \
         in a given script and provide a confidence score (0 to 1) for each character identified.\n\n\
         Include the full character name, including any parenthetical descriptions \
         (e.g., \"अंजलि (छोटी बहू)\"). Do not just extract the name, extract the full \
         entry from the character list or dialogue line.\n\n\
         Script:\n{}\n\n\
         Return the output as JSON: {{\"characters\": [{{\"name\": \"...\", \"confidence\": 0.95}}]}}",
        script.text()
    )
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_blocks(s: &str) -> &str {
    let s = s.trim();
    let inner = if let Some(rest) = s.strip_prefix("```json") {
        rest
    } else if let Some(rest) = s.strip_prefix("```") {
        rest
    } else {
        return s;
    };
    inner.trim_end().trim_end_matches("```").trim()
}

/// Parse and validate a raw model reply.
pub fn parse_ai_response(raw: &str) -> Result<Vec<Character>> {
    let body = strip_code_blocks(raw);
    let payload: AiPayload = serde_json::from_str(body)
        .map_err(|e| Error::InvalidDiscoveryResponse(e.to_string()))?;
    let records = match payload {
        AiPayload::Wrapped { characters } => characters,
        AiPayload::Bare(characters) => characters,
    };

    let parsed: Vec<AiCharacter> = records
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<AiCharacter>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping malformed AI character record: {}", e);
                None
            }
        })
        .collect();

    Ok(validate_records(parsed))
}

impl AiCharacter {
    /// Convert into a [`Character`], clamping a finite confidence into range.
    pub fn into_character(self) -> Result<Character> {
        let confidence =
            Confidence::clamped(self.confidence).ok_or_else(|| Error::InvalidConfidence {
                name: self.name.clone(),
                value: self.confidence,
            })?;
        if confidence.get() != self.confidence {
            warn!(
                "Clamped confidence of AI character {:?} from {} to {}",
                self.name,
                self.confidence,
                confidence.get()
            );
        }
        Character::new(&self.name, confidence)
    }
}

/// Validate already-deserialized records, dropping the ones that fail.
pub fn validate_records(records: Vec<AiCharacter>) -> Vec<Character> {
    records
        .into_iter()
        .filter_map(|record| match record.into_character() {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("Dropping AI character: {}", e);
                None
            }
        })
        .collect()
}
