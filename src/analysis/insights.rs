use super::round1;
use crate::models::benchmark::{PaletteOverlap, Recommendation, RecommendationCategory};

const MAX_RECOMMENDATIONS: usize = 5;
const COMPLEXITY_PREDICTION_CAP: f64 = 1.5;

#[derive(Debug, Clone, Copy)]
pub struct InsightInputs<'a> {
    pub primary_visual: f64,
    pub primary_cognitive: f64,
    pub avg_visual: f64,
    pub avg_cognitive: f64,
    pub palette_overlaps: &'a [PaletteOverlap],
    pub complexity_delta: f64,
}

pub fn generate_recommendations(inputs: &InsightInputs<'_>) -> Vec<Recommendation> {
    let mut recs = vec![
        visual_differentiation(inputs.primary_visual, inputs.avg_visual),
        content_simplification(inputs.primary_cognitive, inputs.avg_cognitive),
    ];
    if let Some(rec) = palette_overlap(inputs.palette_overlaps) {
        recs.push(rec);
    }
    recs.push(complexity_gap(inputs.complexity_delta));

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

fn visual_differentiation(primary: f64, average: f64) -> Recommendation {
    let behind = primary < average;
    let (action, predicted) = if behind {
        (
            "experiment with a bolder, unique accent colour, e.g. introduce a high-contrast brand hue in key CTAs.",
            round1((average - primary) * 0.5),
        )
    } else {
        (
            "double down on your minimalist layout and whitespace to maintain top-tier visual clarity.",
            round1((primary - average) * 0.3),
        )
    };

    Recommendation {
        category: RecommendationCategory::VisualDifferentiation,
        observation: format!("Your visual distinctiveness scores {primary:.1} vs industry average of {average:.1}"),
        impact: format!(
            "This suggests your site is {} on visual memorability.",
            if behind { "underperforming" } else { "leading" }
        ),
        recommendation: format!("Consider {action}"),
        expected_outcome: format!("Could improve overall visual score by ~{predicted:.1}"),
        predicted_improvement: predicted,
    }
}

fn content_simplification(primary: f64, average: f64) -> Recommendation {
    let behind = primary < average;
    let (action, predicted) = if behind {
        (
            "simplify headline copy and reduce paragraphs by 20%, focusing on single-sentence value props above the fold.",
            round1((average - primary) * 0.6),
        )
    } else {
        (
            "maintain your clear, concise tone but audit pages for any jargon spikes.",
            round1((primary - average) * 0.2),
        )
    };

    Recommendation {
        category: RecommendationCategory::ContentSimplification,
        observation: format!("Your cognitive load scores {primary:.1} vs industry average of {average:.1}"),
        impact: format!(
            "This indicates your messaging is {} competitors to process.",
            if behind { "more complex than" } else { "easier than" }
        ),
        recommendation: format!("Consider {action}"),
        expected_outcome: format!("Could improve overall cognitive score by ~{predicted:.1}"),
        predicted_improvement: predicted,
    }
}

/// Built from the competitor with the highest overlap; the first one wins ties.
fn palette_overlap(overlaps: &[PaletteOverlap]) -> Option<Recommendation> {
    let top = overlaps
        .iter()
        .fold(None::<&PaletteOverlap>, |best, o| match best {
            Some(b) if b.overlap_pct >= o.overlap_pct => Some(b),
            _ => Some(o),
        })?;
    let predicted = 1.0;

    Some(Recommendation {
        category: RecommendationCategory::PaletteOverlap,
        observation: format!("Your colour palette overlaps {:.1}% with {}", top.overlap_pct, top.competitor),
        impact: "High overlap risks brand confusion in a crowded market.".to_string(),
        recommendation: "Consider diversifying your accent palette: introduce at least 2 unique brand colours not used by competitors.".to_string(),
        expected_outcome: format!("Could improve visual distinctiveness by ~{predicted:.1}"),
        predicted_improvement: predicted,
    })
}

fn complexity_gap(delta: f64) -> Recommendation {
    let higher = delta > 0.0;
    let (impact, action, predicted) = if higher {
        (
            "Too high a complexity gap can overwhelm first-time visitors.",
            "reduce multi-syllable terms by 30%, using plain-language synonyms for common jargon.",
            round1((delta * 0.4).min(COMPLEXITY_PREDICTION_CAP)),
        )
    } else {
        (
            "Your simpler structure gives you a readability edge.",
            "leverage your clear language in marketing materials to reinforce recall.",
            0.5,
        )
    };

    Recommendation {
        category: RecommendationCategory::ComplexityGap,
        observation: format!(
            "Your content complexity is {:.1} points {} than competitor average",
            delta.abs(),
            if higher { "higher" } else { "lower" }
        ),
        impact: impact.to_string(),
        recommendation: format!("Consider {action}"),
        expected_outcome: format!("Could improve cognitive clarity by ~{predicted:.1}"),
        predicted_improvement: predicted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlap(competitor: &str, pct: f64) -> PaletteOverlap {
        PaletteOverlap {
            competitor: competitor.to_string(),
            overlap_pct: pct,
        }
    }

    fn inputs(overlaps: &[PaletteOverlap], delta: f64) -> InsightInputs<'_> {
        InsightInputs {
            primary_visual: 6.0,
            primary_cognitive: 7.0,
            avg_visual: 8.0,
            avg_cognitive: 6.0,
            palette_overlaps: overlaps,
            complexity_delta: delta,
        }
    }

    #[test]
    fn positive_complexity_delta_selects_reduce_jargon() {
        let recs = generate_recommendations(&inputs(&[], 2.0));
        let gap = recs
            .iter()
            .find(|r| r.category == RecommendationCategory::ComplexityGap)
            .unwrap();
        assert_eq!(gap.predicted_improvement, 0.8);
        assert!(gap.recommendation.contains("reduce multi-syllable terms"));
        assert_eq!(gap.observation, "Your content complexity is 2.0 points higher than competitor average");
    }

    #[test]
    fn complexity_prediction_is_capped() {
        let recs = generate_recommendations(&inputs(&[], 6.0));
        assert_eq!(recs.last().unwrap().predicted_improvement, 1.5);
    }

    #[test]
    fn non_positive_delta_uses_fixed_prediction() {
        let recs = generate_recommendations(&inputs(&[], -1.2));
        let gap = recs.last().unwrap();
        assert_eq!(gap.predicted_improvement, 0.5);
        assert!(gap.observation.contains("1.2 points lower"));
        assert!(gap.impact.contains("readability edge"));
    }

    #[test]
    fn visual_and_cognitive_branches_follow_sign_of_gap() {
        let recs = generate_recommendations(&inputs(&[], 0.0));
        let visual = &recs[0];
        assert!(visual.impact.contains("underperforming"));
        assert_eq!(visual.predicted_improvement, 1.0);
        assert!(visual.recommendation.starts_with("Consider experiment with a bolder"));

        let cognitive = &recs[1];
        assert!(cognitive.impact.contains("easier than"));
        assert_eq!(cognitive.predicted_improvement, 0.2);
    }

    #[test]
    fn palette_record_only_with_overlap_data() {
        assert_eq!(generate_recommendations(&inputs(&[], 1.0)).len(), 3);

        let overlaps = [overlap("https://a.example", 40.0), overlap("https://b.example", 80.0), overlap("https://c.example", 80.0)];
        let recs = generate_recommendations(&inputs(&overlaps, 1.0));
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[2].category, RecommendationCategory::PaletteOverlap);
        assert_eq!(recs[2].observation, "Your colour palette overlaps 80.0% with https://b.example");
        assert_eq!(recs[2].predicted_improvement, 1.0);
    }

    #[test]
    fn never_more_than_five_records() {
        let overlaps: Vec<PaletteOverlap> = (0..20).map(|i| overlap(&format!("https://{i}.example"), i as f64)).collect();
        assert!(generate_recommendations(&inputs(&overlaps, 3.0)).len() <= 5);
    }
}
