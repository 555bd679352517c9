//! Speaker matcher: which character, if any, owns a line.
//!
//! Candidate keys are tried longest first, so `"KAMLA DEVI"` wins over
//! `"KAMLA"` on a line starting with `"KAMLA DEVI:"`. A key only matches when
//! the character right after it is end-of-line or non-alphanumeric, so
//! `"CHARACTER A"` never claims `"CHARACTER AB: ..."`.
//!
//! With base-name matching on, a qualified name such as `"ANJALI (bahu)"`
//! contributes a second key `"ANJALI"`. A full name is always longer than its
//! own base, so the full form is always tried first.

use scriptstylist_core::{Character, MatchConfig};
use serde::Serialize;

use crate::names::{base_name, char_len, starts_with_name};

/// Which form of the character's name matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    FullName,
    BaseName,
}

/// A successful match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeakerMatch<'a> {
    pub character: &'a Character,
    pub kind: MatchKind,
}

struct MatchKey<'a> {
    text: &'a str,
    len: usize,
    kind: MatchKind,
    character: &'a Character,
}

/// Matcher over a fixed character slice. Build once per pass, reuse per line.
pub struct SpeakerMatcher<'a> {
    keys: Vec<MatchKey<'a>>,
}

impl<'a> SpeakerMatcher<'a> {
    pub fn new(characters: &'a [Character]) -> Self {
        Self::with_config(characters, &MatchConfig::default())
    }

    pub fn with_config(characters: &'a [Character], config: &MatchConfig) -> Self {
        let mut keys = Vec::with_capacity(characters.len() * 2);
        for character in characters {
            let full = character.name.trim();
            if full.is_empty() {
                continue;
            }
            keys.push(MatchKey {
                text: full,
                len: char_len(full),
                kind: MatchKind::FullName,
                character,
            });
            if config.match_base_names {
                if let Some(base) = base_name(full) {
                    keys.push(MatchKey {
                        text: base,
                        len: char_len(base),
                        kind: MatchKind::BaseName,
                        character,
                    });
                }
            }
        }
        // Stable: equal-length keys keep input order, full names before bases.
        keys.sort_by(|a, b| b.len.cmp(&a.len).then(a.kind.cmp(&b.kind)));
        Self { keys }
    }

    /// Number of candidate keys (full names plus base names).
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn match_line(&self, line: &str) -> Option<&'a Character> {
        self.match_detail(line).map(|m| m.character)
    }

    pub fn match_detail(&self, line: &str) -> Option<SpeakerMatch<'a>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.keys
            .iter()
            .find(|key| starts_with_name(trimmed, key.text))
            .map(|key| SpeakerMatch {
                character: key.character,
                kind: key.kind,
            })
    }
}

/// One-shot match with default options.
pub fn match_speaker<'a>(line: &str, characters: &'a [Character]) -> Option<&'a Character> {
    SpeakerMatcher::new(characters).match_line(line)
}
