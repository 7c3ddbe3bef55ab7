use std::time::Duration;

/// Where a wallpaper comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(String),
    Url(String),
}

impl ImageSource {
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            ImageSource::Url(s.to_string())
        } else {
            ImageSource::File(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::File(s) | ImageSource::Url(s) => s,
        }
    }
}

/// Cycles the wallpaper list on a fixed interval.
#[derive(Debug)]
pub struct BackgroundRotator {
    images: Vec<String>,
    default_image: String,
    index: usize,
    interval: Duration,
    since_change: Duration,
}

impl BackgroundRotator {
    /// Local paths first, then direct URLs. Blank entries are dropped.
    pub fn new(
        local: &[String],
        urls: &[String],
        default_image: &str,
        interval: Duration,
    ) -> Self {
        let images = local
            .iter()
            .chain(urls)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        log::info!(
            "background: {} image(s), rotating every {}s",
            images.len(),
            interval.as_secs()
        );
        Self {
            images,
            default_image: default_image.to_string(),
            index: 0,
            interval,
            since_change: Duration::ZERO,
        }
    }

    /// Whether any configured image is in use.
    pub fn use_custom(&self) -> bool {
        !self.images.is_empty()
    }

    pub fn count(&self) -> usize {
        self.images.len().max(1)
    }

    pub fn current(&self) -> &str {
        self.images
            .get(self.index)
            .map(String::as_str)
            .unwrap_or(&self.default_image)
    }

    pub fn current_source(&self) -> ImageSource {
        ImageSource::parse(self.current())
    }

    /// Advance the clock. Returns true when the image changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.images.len() <= 1 || self.interval.is_zero() {
            return false;
        }
        self.since_change += dt;
        if self.since_change < self.interval {
            return false;
        }
        self.since_change -= self.interval;
        self.index = (self.index + 1) % self.images.len();
        log::debug!("background -> {}", self.current());
        true
    }

    /// Add fetched photo URLs to the rotation.
    pub fn extend(&mut self, urls: impl IntoIterator<Item = String>) {
        let before = self.images.len();
        self.images
            .extend(urls.into_iter().filter(|s| !s.trim().is_empty()));
        log::info!("background: added {} photo(s)", self.images.len() - before);
    }
}
