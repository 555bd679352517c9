//! Runtime types.

use scriptstylist_core::Character;
use scriptstylist_discover::DiscoverySource;
use serde::Serialize;

/// Snapshot of a session for the UI layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// `None` until a discovery result has been applied.
    pub source: Option<DiscoverySource>,
    #[serde(rename = "lineCount")]
    pub line_count: usize,
    #[serde(rename = "attributedLines")]
    pub attributed_lines: usize,
    /// Characters in display order.
    pub characters: Vec<Character>,
}

impl SessionSummary {
    pub fn unattributed_lines(&self) -> usize {
        self.line_count - self.attributed_lines
    }
}
