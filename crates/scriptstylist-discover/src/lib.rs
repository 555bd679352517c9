//! ScriptStylist Discover: produces the initial character set for a script.
//!
//! The AI collaborator is optional and unreliable, so discovery always ends
//! in a [`Discovered`] value tagged with where its characters came from. An
//! AI failure or an empty AI answer falls back to [`RuleBasedDiscovery`]; the
//! caller decides how to tell the user from [`DiscoverySource`].

pub mod ai;
pub mod rules;

use scriptstylist_core::{Character, DiscoveryConfig, Result, Script};
use serde::Serialize;
use tracing::{info, warn};

pub use ai::{build_discovery_prompt, parse_ai_response, AiCharacter};
pub use rules::RuleBasedDiscovery;

/// Anything that can propose characters for a script.
pub trait CharacterDiscoverer {
    fn discover(&self, script: &Script) -> Result<Vec<Character>>;
}

impl<F> CharacterDiscoverer for F
where
    F: Fn(&Script) -> Result<Vec<Character>>,
{
    fn discover(&self, script: &Script) -> Result<Vec<Character>> {
        self(script)
    }
}

/// Where a discovered character list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscoverySource {
    Ai,
    RuleBased,
}

/// Discovery outcome. Never an error: the rule-based path is always available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discovered {
    pub characters: Vec<Character>,
    pub source: DiscoverySource,
}

impl Discovered {
    pub fn is_fallback(&self) -> bool {
        self.source == DiscoverySource::RuleBased
    }
}

/// AI-first discovery with rule-based fallback.
#[derive(Debug, Clone)]
pub struct Discovery {
    config: DiscoveryConfig,
    rules: RuleBasedDiscovery,
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new(DiscoveryConfig::default())
    }
}

impl Discovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        let rules = RuleBasedDiscovery::from_config(&config);
        Self { config, rules }
    }

    /// Ask `ai` (when enabled and present), falling back to the rules.
    pub fn run(&self, ai: Option<&dyn CharacterDiscoverer>, script: &Script) -> Discovered {
        match ai {
            Some(ai) if self.config.ai_enabled => self.resolve(ai.discover(script), script),
            _ => {
                info!("AI discovery not in use; using rule-based discovery");
                self.rule_based(script)
            }
        }
    }

    /// Turn an AI outcome the caller already has into a [`Discovered`].
    pub fn resolve(&self, ai_result: Result<Vec<Character>>, script: &Script) -> Discovered {
        match ai_result {
            Ok(characters) if !characters.is_empty() => {
                info!("AI discovery found {} characters", characters.len());
                Discovered {
                    characters,
                    source: DiscoverySource::Ai,
                }
            }
            Ok(_) => {
                warn!("AI discovery returned no characters; falling back to rules");
                self.rule_based(script)
            }
            Err(e) => {
                warn!("AI discovery failed: {}; falling back to rules", e);
                self.rule_based(script)
            }
        }
    }

    /// Convenience: validate a raw model reply, then resolve it.
    pub fn resolve_raw(&self, raw: &str, script: &Script) -> Discovered {
        self.resolve(parse_ai_response(raw), script)
    }

    fn rule_based(&self, script: &Script) -> Discovered {
        Discovered {
            characters: self.rules.discover(script),
            source: DiscoverySource::RuleBased,
        }
    }
}
