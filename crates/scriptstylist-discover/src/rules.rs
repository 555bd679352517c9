//! Rule-based character discovery: no AI dependency.
//!
//! A line is a speaker cue when, after trimming, it is shorter than the cue
//! limit, contains no lowercase letters, does not open with `(`, and is not a
//! screenplay slug or transition. A trailing parenthetical such as `(V.O.)`
//! is stripped to get the name.
//!
//! The caps test also accepts lines with no letters at all (`"..."`, `"1."`);
//! those false positives are accepted. Deduplication is case-sensitive.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scriptstylist_attribute::names::{char_len, strip_trailing_parentheticals};
use scriptstylist_core::{Character, Confidence, DiscoveryConfig, Result, Script};
use tracing::{debug, warn};

use crate::CharacterDiscoverer;

// Scene headings and transitions, anchored at line start.
static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:INT\./EXT\.|INT\.|EXT\.|FADE IN:|FADE OUT:|CUT TO:|CONTINUED|BACK TO:|DISSOLVE TO:)",
    )
    .unwrap()
});

static NO_LOWERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\P{Ll}+$").unwrap());

/// ALL-CAPS speaker cue heuristic.
#[derive(Debug, Clone)]
pub struct RuleBasedDiscovery {
    max_cue_length: usize,
    confidence: Confidence,
}

impl Default for RuleBasedDiscovery {
    fn default() -> Self {
        Self::from_config(&DiscoveryConfig::default())
    }
}

impl RuleBasedDiscovery {
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            max_cue_length: config.max_cue_length,
            confidence: Confidence::new(config.fallback_confidence).unwrap_or_else(|| {
                warn!(
                    "fallback_confidence {} is outside [0, 1]; using {}",
                    config.fallback_confidence,
                    Confidence::RULE_BASED.get()
                );
                Confidence::RULE_BASED
            }),
        }
    }

    /// The cue name carried by `line`, if it is a speaker cue.
    pub fn cue_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        let trimmed = line.trim();
        let len = char_len(trimmed);
        if len == 0 || len >= self.max_cue_length {
            return None;
        }
        if trimmed.starts_with('(') {
            return None;
        }
        if !NO_LOWERCASE_RE.is_match(trimmed) || SLUG_RE.is_match(trimmed) {
            return None;
        }
        let name = strip_trailing_parentheticals(trimmed);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Distinct cue names in order of first appearance (case-sensitive).
    pub fn candidates(&self, script: &Script) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut names = Vec::new();
        for line in script.lines() {
            if let Some(name) = self.cue_name(line) {
                if seen.insert(name) {
                    names.push(name.to_string());
                }
            }
        }
        debug!(
            "Rule-based discovery: {} lines scanned, {} candidates",
            script.len(),
            names.len()
        );
        names
    }

    pub fn discover(&self, script: &Script) -> Vec<Character> {
        self.candidates(script)
            .iter()
            .filter_map(|name| Character::new(name, self.confidence).ok())
            .collect()
    }
}

impl CharacterDiscoverer for RuleBasedDiscovery {
    fn discover(&self, script: &Script) -> Result<Vec<Character>> {
        Ok(RuleBasedDiscovery::discover(self, script))
    }
}
