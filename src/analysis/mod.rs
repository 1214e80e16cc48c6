pub mod benchmark;
pub mod cognitive_score;
pub mod edges;
pub mod insights;
pub mod palette;
pub mod text;
pub mod typography;
pub mod visual_score;
pub mod whitespace;

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
