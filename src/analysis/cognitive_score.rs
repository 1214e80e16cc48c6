use super::round1;
use super::text::sub_scores;
use crate::models::cognitive::{CognitiveBreakdown, CognitiveReport, TextSignals};

pub fn score_cognitive(signals: &TextSignals) -> CognitiveReport {
    let raw = sub_scores(signals);
    let breakdown = CognitiveBreakdown {
        readability: round1(raw.readability),
        density: round1(raw.density),
        complexity: round1(raw.complexity),
        hierarchy: round1(raw.hierarchy),
    };

    CognitiveReport {
        score: combine(&raw),
        breakdown,
        signals: signals.clone(),
        feedback: feedback(signals, &raw),
    }
}

/// Unweighted mean of the four unrounded sub-scores; only the result is
/// rounded to one decimal.
pub fn combine(breakdown: &CognitiveBreakdown) -> f64 {
    let sum = breakdown.readability + breakdown.density + breakdown.complexity + breakdown.hierarchy;
    round1((sum / 4.0).clamp(0.0, 10.0))
}

/// Checks fire independently, always in this order.
pub fn feedback(signals: &TextSignals, raw: &CognitiveBreakdown) -> Vec<String> {
    let mut notes = Vec::new();
    if signals.avg_words_per_paragraph > 100.0 {
        notes.push("High information density detected.".to_string());
    }
    if raw.hierarchy < 5.0 {
        notes.push("Message hierarchy is unclear.".to_string());
    }
    if signals.jargon_ratio > 0.2 {
        notes.push("High jargon usage detected.".to_string());
    }
    if raw.readability < 5.0 {
        notes.push("Readability is low; consider simpler wording.".to_string());
    }
    notes
}
