use regex::Regex;

/// Profile image URLs are capped at this many characters (extension
/// stripped) before the size-variant suffixes are attached, matching how
/// the media host truncates resized profile filenames.
pub const PROFILE_STEM_CAP: usize = 65;

const PROFILE_SIZE_SUFFIXES: [&str; 3] = ["_400x400", "_normal", "_bigger"];

/// Compiled image URL patterns for one media host.
pub struct ImagePatterns {
    media: Regex,
    profile: Regex,
    filename: Regex,
}

impl ImagePatterns {
    pub fn for_host(media_host: &str) -> Result<Self, regex::Error> {
        let host = regex::escape(media_host);
        Ok(Self {
            media: Regex::new(&format!(r"https://{host}/media/[A-Za-z0-9_.\-]+\.jpg"))?,
            profile: Regex::new(&format!(
                r"https://{host}/profile_images/[0-9]+/[A-Za-z0-9_.\-]+\.jpg"
            ))?,
            filename: Regex::new(r"[A-Za-z0-9_.\-]+\.jpg")?,
        })
    }

    /// Every candidate image URL in one page: media matches, plus each
    /// profile match spread across the size variants the page HTML does
    /// not enumerate.
    pub fn extract_image_urls(&self, html: &str) -> Vec<String> {
        let mut urls: Vec<String> = self
            .media
            .find_iter(html)
            .map(|m| m.as_str().to_string())
            .collect();
        for m in self.profile.find_iter(html) {
            urls.push(m.as_str().to_string());
            urls.extend(profile_size_spread(m.as_str()));
        }
        urls
    }

    /// Trailing `<token>.jpg` segment used as the stored filename.
    pub fn filename_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.filename.find(url).map(|m| m.as_str())
    }
}

/// Synthesize the resized filenames a profile image is stored under: the
/// unsized default plus the `_400x400`, `_normal` and `_bigger` variants,
/// with the stem truncated at [`PROFILE_STEM_CAP`].
pub fn profile_size_spread(profile_url: &str) -> Vec<String> {
    let stem = profile_url.strip_suffix(".jpg").unwrap_or(profile_url);
    let stem = truncate_prefix(stem, PROFILE_STEM_CAP);

    let mut variants = Vec::with_capacity(1 + PROFILE_SIZE_SUFFIXES.len());
    variants.push(format!("{stem}.jpg"));
    for suffix in PROFILE_SIZE_SUFFIXES {
        variants.push(format!("{stem}{suffix}.jpg"));
    }
    variants
}

fn truncate_prefix(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
