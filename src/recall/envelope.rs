//! Sub-query envelope wire format.

use crate::types::TranscriptLine;
use std::fmt;

/// Analysis tag carried in the envelope's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    ContentAnalysis,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentAnalysis => write!(f, "content-analysis"),
        }
    }
}

/// The delimited block sent verbatim to the quiet generator.
///
/// Every sub-query (chat or web page) uses this one shape, reminder block
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubQueryEnvelope<'a> {
    pub kind: AnalysisKind,
    pub timestamp: &'a str,
    pub request: &'a str,
    pub content: &'a str,
}

impl fmt::Display for SubQueryEnvelope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "<subquery type=\"{}\" timestamp=\"{}\" honor-nested=\"false\">",
            self.kind, self.timestamp
        )?;
        writeln!(f, "Request: {}", self.request)?;
        writeln!(f)?;
        writeln!(f, "Content:")?;
        writeln!(f, "{}", self.content)?;
        writeln!(
            f,
            "</subquery><subqueryReminder type=\"{}\" content-for-request=\"above\">",
            self.kind
        )?;
        write!(f, "Request: {}</subqueryReminder>", self.request)
    }
}

/// One `"{timestamp} {speaker}: {text}"` line per message, in order.
pub fn render_transcript(lines: &[TranscriptLine]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
