use super::round1;
use crate::models::visual::{BrandFlags, ColorSwatch, VisualBreakdown, VisualReport};

pub fn build_breakdown(
    whitespace_ratio: f64,
    element_count: usize,
    typography_count: usize,
    palette: Vec<ColorSwatch>,
    flags: BrandFlags,
) -> VisualBreakdown {
    let [brand_colour_consistent, hierarchy_present, imagery_matches_tone] = flags.resolved();
    VisualBreakdown {
        whitespace_ratio,
        element_count,
        colour_diversity: palette.len(),
        typography_count,
        brand_colour_consistent,
        hierarchy_present,
        imagery_matches_tone,
        palette,
    }
}

/// Unclamped sum of the piecewise bands.
pub fn band_total(b: &VisualBreakdown) -> f64 {
    let whitespace = if b.whitespace_ratio > 0.5 {
        2.5
    } else if b.whitespace_ratio > 0.3 {
        2.0
    } else {
        1.0
    };

    let elements = if b.element_count < 200 {
        2.5
    } else if b.element_count < 350 {
        1.5
    } else {
        0.5
    };

    let colour = if b.colour_diversity >= 5 {
        2.0
    } else if b.colour_diversity >= 3 {
        1.0
    } else {
        0.5
    };

    let typography = if b.typography_count >= 4 {
        2.0
    } else if b.typography_count >= 2 {
        1.0
    } else {
        0.5
    };

    let flags = [b.brand_colour_consistent, b.hierarchy_present, b.imagery_matches_tone]
        .iter()
        .filter(|&&flag| flag)
        .count() as f64;

    whitespace + elements + colour + typography + flags
}

pub fn score_visual(breakdown: &VisualBreakdown) -> f64 {
    round1(band_total(breakdown).clamp(0.0, 10.0))
}

pub fn generate_summary(score: f64, breakdown: &VisualBreakdown) -> String {
    let mut parts = Vec::new();

    if score >= 8.0 {
        parts.push("This site has strong visual branding with excellent use of space, colour, and consistent styling.");
    } else if score >= 5.0 {
        parts.push("The site is moderately distinctive but could benefit from improved hierarchy or colour consistency.");
    } else {
        parts.push("Visual branding could be improved. Consider simplifying layout, reducing clutter, or using more consistent colours.");
    }

    if breakdown.whitespace_ratio < 0.2 {
        parts.push("Whitespace is limited, which may contribute to visual clutter.");
    }
    if breakdown.typography_count > 4 {
        parts.push("The site uses many font styles, which might reduce consistency.");
    }
    if breakdown.colour_diversity < 3 {
        parts.push("Limited colour diversity may make the site feel flat.");
    }

    parts.join(" ")
}

pub fn build_report(breakdown: VisualBreakdown) -> VisualReport {
    let score = score_visual(&breakdown);
    let summary = generate_summary(score, &breakdown);
    VisualReport {
        score,
        summary,
        breakdown,
    }
}
