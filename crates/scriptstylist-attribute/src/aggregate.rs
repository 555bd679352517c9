//! Dialogue aggregation: runs the matcher over every line of a script.

use std::collections::{BTreeMap, HashMap};

use scriptstylist_core::{Character, MatchConfig, Script};
use serde::Serialize;
use tracing::debug;

use crate::matcher::SpeakerMatcher;

/// Speaker attribution for one script line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAttribution {
    pub index: usize,
    pub speaker: Option<String>,
}

/// Stateless aggregator; every call recomputes from (script, characters).
#[derive(Debug, Clone, Default)]
pub struct DialogueAggregator {
    config: MatchConfig,
}

impl DialogueAggregator {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Speaker for every line, in line order.
    pub fn attribute_lines(&self, script: &Script, characters: &[Character]) -> Vec<LineAttribution> {
        let matcher = SpeakerMatcher::with_config(characters, &self.config);
        script
            .lines()
            .iter()
            .enumerate()
            .map(|(index, line)| LineAttribution {
                index,
                speaker: matcher.match_line(line).map(|c| c.name.clone()),
            })
            .collect()
    }

    /// Lines spoken per character. Every character in `characters` is present,
    /// including those with zero lines.
    pub fn count_dialogues(
        &self,
        script: &Script,
        characters: &[Character],
    ) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> =
            characters.iter().map(|c| (c.name.clone(), 0)).collect();

        let matcher = SpeakerMatcher::with_config(characters, &self.config);
        let mut matched = 0usize;
        for line in script.lines() {
            if let Some(character) = matcher.match_line(line) {
                *counts.entry(character.name.clone()).or_insert(0) += 1;
                matched += 1;
            }
        }

        debug!(
            "Counted dialogues: {} lines, {} attributed, {} characters",
            script.len(),
            matched,
            characters.len()
        );
        counts
    }

    /// Count for one character in isolation (singleton character set).
    ///
    /// Lines that a longer name in the full set would claim are counted here,
    /// so this can exceed the character's share of a full pass.
    pub fn count_single(&self, script: &Script, character: &Character) -> usize {
        self.count_dialogues(script, std::slice::from_ref(character))
            .get(&character.name)
            .copied()
            .unwrap_or(0)
    }

    /// Line indices per speaker, ordered by name. Unattributed lines are omitted.
    pub fn group_by_speaker(
        &self,
        script: &Script,
        characters: &[Character],
    ) -> BTreeMap<String, Vec<usize>> {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for attribution in self.attribute_lines(script, characters) {
            if let Some(speaker) = attribution.speaker {
                groups.entry(speaker).or_default().push(attribution.index);
            }
        }
        groups
    }
}

pub fn attribute_lines(script: &Script, characters: &[Character]) -> Vec<LineAttribution> {
    DialogueAggregator::default().attribute_lines(script, characters)
}

pub fn count_dialogues(script: &Script, characters: &[Character]) -> HashMap<String, usize> {
    DialogueAggregator::default().count_dialogues(script, characters)
}

pub fn count_single(script: &Script, character: &Character) -> usize {
    DialogueAggregator::default().count_single(script, character)
}

pub fn group_by_speaker(script: &Script, characters: &[Character]) -> BTreeMap<String, Vec<usize>> {
    DialogueAggregator::default().group_by_speaker(script, characters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptstylist_core::Confidence;

    const SCENE: &str = "SUNITA: Hello there!\nAMIT: Who is speaking?\nSUNITA: It's me.";

    fn cast(names: &[(&str, f64)]) -> Vec<Character> {
        names
            .iter()
            .map(|(n, c)| Character::new(n, Confidence::new(*c).unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_end_to_end_scene() {
        let script = Script::new(SCENE);
        let chars = cast(&[("SUNITA", 0.9), ("AMIT", 0.9)]);

        let counts = count_dialogues(&script, &chars);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["SUNITA"], 2);
        assert_eq!(counts["AMIT"], 1);

        let speakers: Vec<Option<String>> = attribute_lines(&script, &chars)
            .into_iter()
            .map(|a| a.speaker)
            .collect();
        assert_eq!(
            speakers,
            vec![
                Some("SUNITA".to_string()),
                Some("AMIT".to_string()),
                Some("SUNITA".to_string())
            ]
        );
    }

    #[test]
    fn test_zero_count_characters_are_present() {
        let script = Script::new(SCENE);
        let chars = cast(&[("SUNITA", 0.9), ("NARRATOR", 1.0)]);
        let counts = count_dialogues(&script, &chars);
        assert_eq!(counts["NARRATOR"], 0);
        assert_eq!(counts["SUNITA"], 2);
    }

    #[test]
    fn test_count_conservation() {
        let script = Script::new(
            "KAMLA DEVI: Beta!\n\nKAMLA: Haan?\nThe door creaks.\n  \nKAMLA DEVI: Chai?\nKAMLAX: no",
        );
        let chars = cast(&[("KAMLA", 0.9), ("KAMLA DEVI", 0.9)]);

        let counts = count_dialogues(&script, &chars);
        let total: usize = counts.values().sum();
        let attributed = attribute_lines(&script, &chars)
            .iter()
            .filter(|a| a.speaker.is_some())
            .count();

        assert_eq!(total, attributed);
        assert!(total <= script.non_empty_line_count());
        assert_eq!(counts["KAMLA DEVI"], 2);
        assert_eq!(counts["KAMLA"], 1);
    }

    #[test]
    fn test_idempotent() {
        let script = Script::new(SCENE);
        let chars = cast(&[("SUNITA", 0.9), ("AMIT", 0.9)]);
        assert_eq!(count_dialogues(&script, &chars), count_dialogues(&script, &chars));
    }

    #[test]
    fn test_empty_inputs() {
        let chars = cast(&[("SUNITA", 0.9)]);
        assert_eq!(count_dialogues(&Script::new("   "), &chars)["SUNITA"], 0);
        assert!(count_dialogues(&Script::new(SCENE), &[]).is_empty());
        assert!(attribute_lines(&Script::new(""), &chars).is_empty());
    }

    #[test]
    fn test_count_single_ignores_other_characters() {
        let script = Script::new("KAMLA DEVI: Beta!\nKAMLA: Haan?");
        let chars = cast(&[("KAMLA", 0.9), ("KAMLA DEVI", 0.9)]);

        assert_eq!(count_single(&script, &chars[0]), 2);
        assert_eq!(count_dialogues(&script, &chars)["KAMLA"], 1);
    }

    #[test]
    fn test_group_by_speaker() {
        let script = Script::new(SCENE);
        let chars = cast(&[("SUNITA", 0.9), ("AMIT", 0.9)]);
        let groups = group_by_speaker(&script, &chars);
        assert_eq!(groups["SUNITA"], vec![0, 2]);
        assert_eq!(groups["AMIT"], vec![1]);
    }

    #[test]
    fn test_attribution_serializes() {
        let a = LineAttribution {
            index: 3,
            speaker: Some("AMIT".into()),
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["speaker"], "AMIT");
    }
}
