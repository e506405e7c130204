// src/app/utils.rs
use chrono::NaiveDate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_BLOCK_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</p\s*>|<br\s*/?>|</li\s*>|</h[1-6]\s*>").unwrap());
static RE_DROP_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap());
// a `<` not followed by a tag name is text, e.g. "5 < 6"
static RE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>").unwrap());
static RE_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

/// Turn the API's HTML summary into plain text. Markup is never interpreted;
/// paragraph and line breaks become newlines and common entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let no_scripts = RE_DROP_BLOCK.replace_all(html, "");
    let broken = RE_BLOCK_BREAK.replace_all(&no_scripts, "\n");
    let stripped = RE_TAG.replace_all(&broken, "");
    let decoded = RE_ENTITY.replace_all(&stripped, |caps: &regex::Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .lines()
        .map(|l| l.split_whitespace().join(" "))
        .filter(|l| !l.is_empty())
        .join("\n\n")
}

fn decode_entity(body: &str) -> Option<String> {
    let ch = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        char::from_u32(u32::from_str_radix(hex, 16).ok()?)?
    } else if let Some(dec) = body.strip_prefix('#') {
        char::from_u32(dec.parse().ok()?)?
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => ' ',
            "hellip" => '…',
            "mdash" => '—',
            "ndash" => '–',
            "rsquo" => '’',
            "lsquo" => '‘',
            "rdquo" => '”',
            "ldquo" => '“',
            _ => return None,
        }
    };
    Some(ch.to_string())
}

/// "2008-01-20" → "20 Jan 2008"; anything unparseable is shown as given.
pub fn format_premiered(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "—".to_string(),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| d.format("%-d %b %Y").to_string())
            .unwrap_or_else(|_| s.to_string()),
    }
}

pub fn join_genres(genres: &[String]) -> String {
    if genres.is_empty() {
        "—".to_string()
    } else {
        genres.iter().join(", ")
    }
}

/// Only http(s) links are offered as clickable.
pub fn safe_link(url: Option<&str>) -> Option<&str> {
    url.map(str::trim)
        .filter(|u| u.starts_with("https://") || u.starts_with("http://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_keeps_paragraphs() {
        let html = "<p><b>Under the Dome</b> is the story of a small town.</p><p>Second <i>para</i>.</p>";
        assert_eq!(
            html_to_text(html),
            "Under the Dome is the story of a small town.\n\nSecond para."
        );
    }

    #[test]
    fn scripts_and_handlers_never_survive() {
        let html = r#"<p onclick="steal()">Hi<script>alert('x')</script><img src=x onerror=alert(1)></p>"#;
        let text = html_to_text(html);
        assert_eq!(text, "Hi");
        assert!(!text.contains('<'));
    }

    #[test]
    fn bare_angle_brackets_are_text() {
        assert_eq!(
            html_to_text("<p>Ratings: 5 < 6 and 7 > 3.</p>"),
            "Ratings: 5 < 6 and 7 > 3."
        );
        assert_eq!(html_to_text("a <!-- note --> b"), "a b");
    }

    #[test]
    fn decodes_entities_once() {
        assert_eq!(html_to_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_to_text("a &lt;b&gt; c"), "a <b> c");
        assert_eq!(html_to_text("caf&#233; &#x2014; ok"), "café — ok");
        assert_eq!(html_to_text("&amp;lt;"), "&lt;");
        assert_eq!(html_to_text("&bogus; stays"), "&bogus; stays");
    }

    #[test]
    fn line_breaks_and_whitespace_collapse() {
        assert_eq!(html_to_text("one<br>two<br/>  three   four"), "one\n\ntwo\n\nthree four");
        assert_eq!(html_to_text("   "), "");
    }

    #[test]
    fn premiere_dates() {
        assert_eq!(format_premiered(Some("2008-01-20")), "20 Jan 2008");
        assert_eq!(format_premiered(Some("2008")), "2008");
        assert_eq!(format_premiered(None), "—");
        assert_eq!(format_premiered(Some("")), "—");
    }

    #[test]
    fn genres_and_links() {
        assert_eq!(join_genres(&["Drama".into(), "Action".into()]), "Drama, Action");
        assert_eq!(join_genres(&[]), "—");
        assert_eq!(safe_link(Some("https://amc.com")), Some("https://amc.com"));
        assert_eq!(safe_link(Some("javascript:alert(1)")), None);
        assert_eq!(safe_link(None), None);
    }
}
