//! ScriptStylist Attribute: decides which character speaks each script line.
//!
//! Matching is longest-name-first with a boundary check, so one character's
//! name being a textual prefix of another's never produces a false match.
//! Aggregation drives the matcher over a whole script and is a pure function
//! of (script, characters): nothing is cached between calls.

pub mod aggregate;
pub mod matcher;
pub mod names;

pub use aggregate::{
    attribute_lines, count_dialogues, count_single, group_by_speaker, DialogueAggregator,
    LineAttribution,
};
pub use matcher::{match_speaker, MatchKind, SpeakerMatch, SpeakerMatcher};
