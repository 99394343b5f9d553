//! Untappd beer search.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use vinol_core::{MatchCandidate, ProductIdentity};

use super::{compile, encode_component, resolve_href, select_text, RatingSource};

/// Generic tokens that only add noise to an Untappd search.
const BLACKLISTED_TOKENS: [&str; 2] = ["beer", "ab"];

static ITEM: LazyLock<Selector> = LazyLock::new(|| compile(".beer-item"));
static DETAILS: LazyLock<Selector> = LazyLock::new(|| compile(".beer-details"));
static ITEM_LINK: LazyLock<Selector> = LazyLock::new(|| compile(r#"a[href^="/beer/"]"#));
static RATING: LazyLock<Selector> = LazyLock::new(|| compile(".rating .caps"));

#[derive(Debug, Clone)]
pub struct Untappd {
    base_url: String,
}

impl Untappd {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RatingSource for Untappd {
    fn name(&self) -> &'static str {
        "untappd"
    }

    fn search_url(&self, identity: &ProductIdentity) -> String {
        let query = search_query(&identity.name);
        format!("{}/search?q={}", self.base_url, encode_component(&query))
    }

    fn parse(&self, markup: &str) -> Option<MatchCandidate> {
        let doc = Html::parse_document(markup);

        doc.select(&ITEM).find_map(|item| {
            let name = join_detail_lines(&select_text(item, &DETAILS));
            let url = item
                .select(&ITEM_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_href(&self.base_url, href))
                .unwrap_or_default();
            let rating = item
                .select(&RATING)
                .next()
                .and_then(|el| el.value().attr("data-rating"))
                .and_then(format_rating)
                .unwrap_or_default();

            if name.is_empty() || url.is_empty() || rating.is_empty() {
                return None;
            }
            Some(MatchCandidate { name, url, rating })
        })
    }
}

/// Search terms for a beer name: whitespace-separated tokens with
/// case-insensitive duplicates and blacklisted tokens dropped, first
/// occurrence kept.
#[must_use]
pub fn search_query(name: &str) -> String {
    let mut seen = HashSet::new();
    name.split_whitespace()
        .filter(|token| {
            let lower = token.to_lowercase();
            !BLACKLISTED_TOKENS.contains(&lower.as_str()) && seen.insert(lower)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_detail_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rounds the raw `data-rating` value to two decimals and renders it as the
/// shortest plain decimal (`"3.75"`, `"4"`). Unrated beers carry a zero
/// rating and yield `None`.
fn format_rating(raw: &str) -> Option<String> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.abs() < f64::EPSILON {
        return None;
    }
    Some(rounded.to_string())
}

#[cfg(test)]
#[path = "untappd_test.rs"]
mod tests;
