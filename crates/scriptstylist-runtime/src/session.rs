//! Annotation session: the script being styled plus its character set.

use scriptstylist_attribute::{DialogueAggregator, LineAttribution, SpeakerMatcher};
use scriptstylist_core::{
    Character, CharacterSet, Confidence, Error, Result, Script, StylistConfig,
};
use scriptstylist_discover::{CharacterDiscoverer, Discovered, Discovery, DiscoverySource};
use tracing::{debug, info, warn};

use crate::types::SessionSummary;

/// One open script. Dialogue counts are recomputed after every change to
/// the script or the character set, so they always describe the current pair.
pub struct AnnotationSession {
    config: StylistConfig,
    aggregator: DialogueAggregator,
    discovery: Discovery,
    manual_confidence: Confidence,
    script: Script,
    characters: CharacterSet,
    source: Option<DiscoverySource>,
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::build(StylistConfig::default())
    }
}

impl AnnotationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a validated configuration.
    pub fn with_config(config: StylistConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StylistConfig) -> Self {
        let aggregator = DialogueAggregator::new(config.matching.clone());
        let discovery = Discovery::new(config.discovery.clone());
        let manual = config.discovery.manual_confidence;
        let manual_confidence = Confidence::new(manual).unwrap_or_else(|| {
            warn!(
                "manual_confidence {} is outside [0, 1]; using {}",
                manual,
                Confidence::CERTAIN.get()
            );
            Confidence::CERTAIN
        });
        Self {
            config,
            aggregator,
            discovery,
            manual_confidence,
            script: Script::default(),
            characters: CharacterSet::new(),
            source: None,
        }
    }

    pub fn config(&self) -> &StylistConfig {
        &self.config
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn characters(&self) -> &CharacterSet {
        &self.characters
    }

    /// Where the current characters came from, if discovery has run.
    pub fn source(&self) -> Option<DiscoverySource> {
        self.source
    }

    /// Replace the script. The old character set no longer applies and is dropped.
    pub fn load_script(&mut self, text: &str) {
        self.script = Script::new(text);
        self.characters.clear();
        self.source = None;
        info!("Loaded script: {} lines", self.script.len());
    }

    /// Run discovery on the current script without touching the session.
    pub fn discover(&self, ai: Option<&dyn CharacterDiscoverer>) -> Discovered {
        self.discovery.run(ai, &self.script)
    }

    /// Adopt a discovery result as the character set.
    pub fn apply_discovery(&mut self, discovered: Discovered) {
        let Discovered { characters, source } = discovered;
        self.characters = CharacterSet::from_discovered(characters);
        self.characters.sort_by_confidence();
        self.source = Some(source);
        self.recompute();
        info!(
            "Applied {:?} discovery: {} characters",
            source,
            self.characters.len()
        );
    }

    /// Load `text`, discover its characters and count their dialogue.
    pub fn analyze(&mut self, text: &str, ai: Option<&dyn CharacterDiscoverer>) -> DiscoverySource {
        self.load_script(text);
        let discovered = self.discover(ai);
        let source = discovered.source;
        self.apply_discovery(discovered);
        source
    }

    /// Add a character by hand. Manual characters carry the configured
    /// manual confidence.
    pub fn add_character(&mut self, name: &str) -> Result<&Character> {
        let character = Character::new(name, self.manual_confidence)?;
        let name = character.name.clone();
        self.characters.insert(character)?;
        self.recompute();
        info!("Added character {:?}", name);
        self.lookup(&name)
    }

    pub fn rename_character(&mut self, old: &str, new: &str) -> Result<&Character> {
        let renamed = self.characters.rename(old, new)?.name.clone();
        self.recompute();
        info!("Renamed character {:?} to {:?}", old, renamed);
        self.lookup(&renamed)
    }

    /// Delete by exact name.
    pub fn delete_character(&mut self, name: &str) -> Result<Character> {
        let removed = self.characters.remove(name)?;
        self.recompute();
        info!("Deleted character {:?}", removed.name);
        Ok(removed)
    }

    /// Refresh every dialogue count from the current script and characters.
    pub fn recompute(&mut self) {
        let counts = self
            .aggregator
            .count_dialogues(&self.script, self.characters.as_slice());
        self.characters.set_counts(&counts);
        debug!("Recomputed dialogue counts for {} characters", self.characters.len());
    }

    /// Characters ordered by descending dialogue count.
    pub fn characters_by_dialogue(&self) -> Vec<Character> {
        let mut sorted = self.characters.clone();
        sorted.sort_by_dialogue_count();
        sorted.into()
    }

    pub fn attributions(&self) -> Vec<LineAttribution> {
        self.aggregator
            .attribute_lines(&self.script, self.characters.as_slice())
    }

    /// Speaker of line `index`, or `None` for narration and out-of-range lines.
    pub fn speaker_of(&self, index: usize) -> Option<&Character> {
        let line = self.script.line(index)?;
        SpeakerMatcher::with_config(self.characters.as_slice(), &self.config.matching)
            .match_line(line)
    }

    /// Line indices attributed to `name` (case-insensitive lookup).
    pub fn lines_of(&self, name: &str) -> Result<Vec<usize>> {
        let character = self.lookup(name)?;
        let mut groups = self
            .aggregator
            .group_by_speaker(&self.script, self.characters.as_slice());
        Ok(groups.remove(&character.name).unwrap_or_default())
    }

    pub fn summary(&self) -> SessionSummary {
        let attributed_lines = self.characters.iter().map(|c| c.dialogue_count).sum();
        SessionSummary {
            source: self.source,
            line_count: self.script.len(),
            attributed_lines,
            characters: self.characters.as_slice().to_vec(),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Character> {
        self.characters
            .get(name)
            .ok_or_else(|| Error::CharacterNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = "SUNITA: Hello there!\nAMIT: Who is speaking?\nSUNITA: It's me.";

    fn count(session: &AnnotationSession, name: &str) -> usize {
        session.characters().get(name).unwrap().dialogue_count
    }

    #[test]
    fn test_analyze_without_ai_uses_rules() {
        let mut session = AnnotationSession::new();
        let source = session.analyze("SUNITA\nHello there!\nAMIT\nWho?", None);
        assert_eq!(source, DiscoverySource::RuleBased);
        assert_eq!(session.characters().names(), vec!["SUNITA", "AMIT"]);
        assert_eq!(count(&session, "SUNITA"), 1);
    }

    #[test]
    fn test_add_character_counts_immediately() {
        let mut session = AnnotationSession::new();
        session.load_script(SCENE);
        let added = session.add_character("  SUNITA ").unwrap();
        assert_eq!(added.name, "SUNITA");
        assert_eq!(added.dialogue_count, 2);
        assert_eq!(added.confidence, Confidence::CERTAIN);
    }

    #[test]
    fn test_manual_confidence_from_config() {
        let mut config = StylistConfig::default();
        config.discovery.manual_confidence = 0.7;
        let mut session = AnnotationSession::with_config(config.clone()).unwrap();
        session.load_script(SCENE);
        assert_eq!(session.add_character("AMIT").unwrap().confidence.get(), 0.7);

        // Out of range never reaches a character.
        config.discovery.manual_confidence = 3.0;
        let mut session = AnnotationSession::build(config);
        session.load_script(SCENE);
        assert_eq!(
            session.add_character("AMIT").unwrap().confidence,
            Confidence::CERTAIN
        );
    }

    #[test]
    fn test_add_rejects_blank_and_duplicate() {
        let mut session = AnnotationSession::new();
        session.load_script(SCENE);
        session.add_character("AMIT").unwrap();
        assert!(matches!(session.add_character("   "), Err(Error::InvalidName(_))));
        assert!(matches!(
            session.add_character("amit"),
            Err(Error::DuplicateCharacter(_))
        ));
        assert_eq!(session.characters().len(), 1);
    }

    #[test]
    fn test_adding_longer_name_takes_lines_away() {
        let mut session = AnnotationSession::new();
        session.load_script("KAMLA DEVI: Beta!\nKAMLA: Haan?");
        session.add_character("KAMLA").unwrap();
        assert_eq!(count(&session, "KAMLA"), 2);

        session.add_character("KAMLA DEVI").unwrap();
        assert_eq!(count(&session, "KAMLA"), 1);
        assert_eq!(count(&session, "KAMLA DEVI"), 1);
    }

    #[test]
    fn test_rename_recounts() {
        let mut session = AnnotationSession::new();
        session.load_script(SCENE);
        session.add_character("SUNITHA").unwrap();
        assert_eq!(count(&session, "SUNITHA"), 0);

        let renamed = session.rename_character("sunitha", "SUNITA").unwrap();
        assert_eq!(renamed.dialogue_count, 2);
        assert!(session.characters().get("SUNITHA").is_none());
    }

    #[test]
    fn test_delete_frees_lines() {
        let mut session = AnnotationSession::new();
        session.load_script("KAMLA DEVI: Beta!\nKAMLA: Haan?");
        session.add_character("KAMLA").unwrap();
        session.add_character("KAMLA DEVI").unwrap();

        let removed = session.delete_character("KAMLA DEVI").unwrap();
        assert_eq!(removed.name, "KAMLA DEVI");
        assert_eq!(count(&session, "KAMLA"), 2);
        assert!(matches!(
            session.delete_character("kamla"),
            Err(Error::CharacterNotFound(_))
        ));
    }

    #[test]
    fn test_load_script_resets_characters() {
        let mut session = AnnotationSession::new();
        session.analyze("SUNITA\nHi", None);
        session.load_script("AMIT: Hello");
        assert!(session.characters().is_empty());
        assert_eq!(session.source(), None);
    }

    #[test]
    fn test_speaker_of_and_lines_of() {
        let mut session = AnnotationSession::new();
        session.load_script(SCENE);
        session.add_character("SUNITA").unwrap();
        session.add_character("AMIT").unwrap();

        assert_eq!(session.speaker_of(1).unwrap().name, "AMIT");
        assert!(session.speaker_of(99).is_none());
        assert_eq!(session.lines_of("sunita").unwrap(), vec![0, 2]);
        assert!(session.lines_of("NOBODY").is_err());
    }

    #[test]
    fn test_summary() {
        let mut session = AnnotationSession::new();
        session.load_script("SUNITA: Hi\nThe fan hums.\nAMIT: Hey");
        session.add_character("SUNITA").unwrap();
        let summary = session.summary();
        assert_eq!(summary.line_count, 3);
        assert_eq!(summary.attributed_lines, 1);
        assert_eq!(summary.unattributed_lines(), 2);
        assert_eq!(summary.source, None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = StylistConfig::default();
        config.discovery.fallback_confidence = 2.0;
        assert!(matches!(
            AnnotationSession::with_config(config),
            Err(Error::Config(_))
        ));
    }
}
