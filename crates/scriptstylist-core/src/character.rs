//! Characters and the case-insensitively unique set they live in.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Discovery confidence, always within [0.0, 1.0].
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Confidence of a manually added character.
    pub const CERTAIN: Self = Self(1.0);
    /// Confidence of every rule-based discovery.
    pub const RULE_BASED: Self = Self(0.8);

    /// Returns `None` if out of range or not finite.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Clamp a finite value into range. Non-finite values yield `None`.
    pub fn clamped(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(value.clamp(0.0, 1.0)))
        } else {
            None
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::CERTAIN
    }
}

impl fmt::Debug for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Confidence({:.2})", self.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// Rejected confidence value.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("confidence {0} is outside [0, 1]")]
pub struct ConfidenceOutOfRange(pub f64);

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceOutOfRange;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        Self::new(value).ok_or(ConfidenceOutOfRange(value))
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

/// One speaking entity in a script.
///
/// `name` is the identity and may carry a parenthetical qualifier,
/// e.g. `"Anjali (younger daughter-in-law)"`. `dialogue_count` is derived
/// and never participates in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub confidence: Confidence,
    #[serde(default, rename = "dialogueCount")]
    pub dialogue_count: usize,
}

impl Character {
    /// Create a character with a trimmed, non-blank name.
    pub fn new(name: &str, confidence: Confidence) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            confidence,
            dialogue_count: 0,
        })
    }

    /// Case-insensitive identity key.
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Insertion-ordered character collection with case-insensitive unique names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Character>", into = "Vec<Character>")]
pub struct CharacterSet {
    characters: Vec<Character>,
}

impl CharacterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from untrusted discovery output.
    ///
    /// Of case-insensitive duplicates the first one wins; later ones are dropped.
    pub fn from_discovered(characters: impl IntoIterator<Item = Character>) -> Self {
        let mut set = Self::new();
        for character in characters {
            let name = character.name.clone();
            if set.insert(character).is_err() {
                debug!("Dropping duplicate discovered character {:?}", name);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Character> {
        self.characters.iter()
    }

    pub fn as_slice(&self) -> &[Character] {
        &self.characters
    }

    pub fn names(&self) -> Vec<&str> {
        self.characters.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Character> {
        self.position(name).map(|i| &self.characters[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.position(name).map(move |i| &mut self.characters[i])
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = name_key(name);
        self.characters.iter().position(|c| c.key() == key)
    }

    pub fn insert(&mut self, character: Character) -> Result<()> {
        if self.contains(&character.name) {
            return Err(Error::DuplicateCharacter(character.name));
        }
        self.characters.push(character);
        Ok(())
    }

    /// Rename in place. Only a clash with a *different* member is rejected,
    /// so changing the case of a name is allowed.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<&mut Character> {
        let new = new.trim();
        if new.is_empty() {
            return Err(Error::InvalidName(new.to_string()));
        }
        let idx = self
            .position(old)
            .ok_or_else(|| Error::CharacterNotFound(old.to_string()))?;
        let new_key = name_key(new);
        let clash = self
            .characters
            .iter()
            .enumerate()
            .any(|(i, c)| i != idx && c.key() == new_key);
        if clash {
            return Err(Error::DuplicateCharacter(new.to_string()));
        }
        let character = &mut self.characters[idx];
        character.name = new.to_string();
        Ok(character)
    }

    /// Remove by exact name.
    pub fn remove(&mut self, name: &str) -> Result<Character> {
        let idx = self
            .characters
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::CharacterNotFound(name.to_string()))?;
        Ok(self.characters.remove(idx))
    }

    pub fn clear(&mut self) {
        self.characters.clear();
    }

    /// Descending confidence, stable.
    pub fn sort_by_confidence(&mut self) {
        self.characters.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Descending dialogue count, stable.
    pub fn sort_by_dialogue_count(&mut self) {
        self.characters
            .sort_by(|a, b| b.dialogue_count.cmp(&a.dialogue_count));
    }

    /// Overwrite every character's count; names missing from `counts` get 0.
    pub fn set_counts(&mut self, counts: &HashMap<String, usize>) {
        for character in &mut self.characters {
            character.dialogue_count = counts.get(&character.name).copied().unwrap_or(0);
        }
    }
}

impl From<Vec<Character>> for CharacterSet {
    fn from(characters: Vec<Character>) -> Self {
        Self::from_discovered(characters)
    }
}

impl From<CharacterSet> for Vec<Character> {
    fn from(set: CharacterSet) -> Self {
        set.characters
    }
}

impl<'a> IntoIterator for &'a CharacterSet {
    type Item = &'a Character;
    type IntoIter = std::slice::Iter<'a, Character>;

    fn into_iter(self) -> Self::IntoIter {
        self.characters.iter()
    }
}
