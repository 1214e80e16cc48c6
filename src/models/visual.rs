use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub hex: String,
    pub rgb: [u8; 3],
    /// Share of clustered pixels, 0.0–1.0
    pub proportion: f64,
}

/// The three brand-consistency signals. `None` means no brand profile
/// supplied a value; scoring treats that as satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFlags {
    pub brand_colour_consistent: Option<bool>,
    pub hierarchy_present: Option<bool>,
    pub imagery_matches_tone: Option<bool>,
}

impl BrandFlags {
    pub fn all(value: bool) -> Self {
        Self {
            brand_colour_consistent: Some(value),
            hierarchy_present: Some(value),
            imagery_matches_tone: Some(value),
        }
    }

    /// Resolved values in fixed order: colour, hierarchy, imagery.
    pub fn resolved(&self) -> [bool; 3] {
        [
            self.brand_colour_consistent.unwrap_or(true),
            self.hierarchy_present.unwrap_or(true),
            self.imagery_matches_tone.unwrap_or(true),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualBreakdown {
    pub whitespace_ratio: f64,
    pub element_count: usize,
    pub colour_diversity: usize,
    pub typography_count: usize,
    pub brand_colour_consistent: bool,
    pub hierarchy_present: bool,
    pub imagery_matches_tone: bool,
    pub palette: Vec<ColorSwatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualReport {
    pub score: f64,
    pub summary: String,
    pub breakdown: VisualBreakdown,
}
