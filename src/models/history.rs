use serde::{Deserialize, Serialize};

/// Row emitted to the history store after a single-site analysis
/// that produced both scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub url: String,
    pub visual_score: f64,
    pub summary: String,
    pub cognitive_score: f64,
    pub timestamp: String, // RFC 3339, UTC
}
