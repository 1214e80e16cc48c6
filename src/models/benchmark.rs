use crate::models::cognitive::CognitiveReport;
use crate::models::visual::VisualReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteAnalysis {
    pub url: String,
    pub visual: VisualReport,
    pub cognitive: CognitiveReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteOverlap {
    pub competitor: String,
    /// Percentage 0.0–100.0, relative to the primary palette size
    pub overlap_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    VisualDifferentiation,
    ContentSimplification,
    PaletteOverlap,
    ComplexityGap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub observation: String,
    pub impact: String,
    pub recommendation: String,
    pub expected_outcome: String,
    pub predicted_improvement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub primary_url: String,
    pub competitor_urls: Vec<String>,
    /// Primary first, then competitors in input order
    pub visual_scores: Vec<f64>,
    pub cognitive_scores: Vec<f64>,
    pub avg_visual: f64,
    pub avg_cognitive: f64,
    pub palette_overlaps: Vec<PaletteOverlap>,
    pub complexity_delta: f64,
    pub insights: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub sites: Vec<SiteAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub current: usize,
    pub total: usize,
    pub current_url: String,
}
