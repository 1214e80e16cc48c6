use image::DynamicImage;

/// Rendered image + markup captured for one URL.
/// Created once per analysis request and never persisted by the core.
#[derive(Debug, Clone)]
pub struct SiteSnapshot {
    pub url: String,
    pub image: DynamicImage,
    pub markup: String,
}

impl SiteSnapshot {
    pub fn new(url: impl Into<String>, image: DynamicImage, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            image,
            markup: markup.into(),
        }
    }
}
