use regex::{Captures, Regex};
use reqwest::Url;

// The two canonical markup roles the parsers relabel judge pages into, so a
// downstream renderer needs no judge-specific styling knowledge.
pub const TITLE_CLASS: &str = "vj-title";
pub const CONTENT_CLASS: &str = "vj-content";
pub const TITLE_STYLE: &str = "font-weight: bold; font-size: 1.25em; margin: 0.6em 0 0.3em 0;";
pub const CONTENT_STYLE: &str = "font-size: 14px; line-height: 1.5;";

pub fn content_block(inner: &str) -> String {
    format!(
        "<div class=\"{}\" style=\"{}\">{}</div>",
        CONTENT_CLASS, CONTENT_STYLE, inner
    )
}

/// Rewrites judge-relative `src`/`href` attributes to absolute URLs against
/// the judge's static prefix, so statement images and stylesheets resolve
/// outside the judge's own pages.
pub struct StatementRewriter {
    base: Url,
    link: Regex,
}

impl StatementRewriter {
    /// `static_prefix` is an adapter constant and must be a valid URL.
    pub fn new(static_prefix: &str) -> Self {
        StatementRewriter {
            base: Url::parse(static_prefix).unwrap(),
            link: Regex::new(r#"(src|href)="([^"]*)""#).unwrap(),
        }
    }

    pub fn absolutize(&self, html: &str) -> String {
        self.link
            .replace_all(html, |caps: &Captures| {
                let value = &caps[2];
                if value.starts_with("http://")
                    || value.starts_with("https://")
                    || value.starts_with("data:")
                    || value.starts_with('#')
                    || value.is_empty()
                {
                    caps[0].to_string()
                } else {
                    match self.base.join(value) {
                        Ok(url) => format!("{}=\"{}\"", &caps[1], url),
                        Err(_) => caps[0].to_string(),
                    }
                }
            })
            .into_owned()
    }
}
