use image::GrayImage;

/// Share of pixels whose greyscale luminance is strictly above `threshold`.
pub fn whitespace_ratio(gray: &GrayImage, threshold: u8) -> f64 {
    let total = gray.width() as usize * gray.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let near_white = gray.pixels().filter(|p| p.0[0] > threshold).count();
    near_white as f64 / total as f64
}
