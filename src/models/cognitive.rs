use serde::{Deserialize, Serialize};

/// Raw intermediates pulled from the visible text of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSignals {
    pub word_count: usize,
    pub token_count: usize,
    pub polysyllabic_count: usize,
    pub sentence_count: usize,
    pub syllable_count: usize,
    pub paragraph_count: usize,
    pub heading_count: usize,
    pub flesch_reading_ease: f64,
    pub avg_words_per_paragraph: f64,
    pub jargon_ratio: f64,
    pub hierarchy_ratio: f64,
}

/// Sub-scores, each 0.0–10.0 rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CognitiveBreakdown {
    pub readability: f64,
    pub density: f64,
    pub complexity: f64,
    pub hierarchy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitiveReport {
    pub score: f64,
    pub breakdown: CognitiveBreakdown,
    pub signals: TextSignals,
    pub feedback: Vec<String>,
}
