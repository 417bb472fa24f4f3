//! Script tag discovery in page HTML.

use regex::Regex;
use std::sync::OnceLock;

fn script_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<script\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#)
            .expect("static script regex")
    })
}

/// Returns the `src` of every `<script>` tag, resolved against `base_url`.
///
/// Relative URLs that cannot be joined are dropped. Duplicates keep their
/// first position.
pub fn script_urls_from_html(html: &str, base_url: &str) -> Vec<String> {
    let base = url::Url::parse(base_url).ok();
    let mut out: Vec<String> = Vec::new();
    for cap in script_src_regex().captures_iter(html) {
        let raw = cap[1].trim();
        let absolute = match &base {
            Some(b) => b.join(raw).map(|u| u.to_string()).ok(),
            None => url::Url::parse(raw).map(|u| u.to_string()).ok(),
        };
        if let Some(u) = absolute {
            if !out.contains(&u) {
                out.push(u);
            }
        }
    }
    out
}
