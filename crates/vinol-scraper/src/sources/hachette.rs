//! Hachette wine guide search.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use vinol_core::{MatchCandidate, ProductIdentity};

use super::{compile, encode_component, resolve_href, select_text, RatingSource};

const HEART: &str = "❤";

static BLOCK: LazyLock<Selector> = LazyLock::new(|| compile(".vinResult .block"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| compile(".title h2"));
static SUB_TITLE: LazyLock<Selector> = LazyLock::new(|| compile(".sub-title h2"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| compile(".title a"));
static ACTIVE_STAR: LazyLock<Selector> = LazyLock::new(|| compile(".stars .active"));
static HEART_ICON: LazyLock<Selector> = LazyLock::new(|| compile(".which .icon-heart"));
static STARS_HEADING: LazyLock<Selector> = LazyLock::new(|| compile(".stars h2"));

#[derive(Debug, Clone)]
pub struct Hachette {
    base_url: String,
}

impl Hachette {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RatingSource for Hachette {
    fn name(&self) -> &'static str {
        "hachette"
    }

    /// `{base}/vins/list?search=<name>` followed by colour, type and vintage
    /// filters. Filter keys stay literal; every encoded space becomes `+`.
    fn search_url(&self, identity: &ProductIdentity) -> String {
        let mut url = format!(
            "{}/vins/list?search={}",
            self.base_url,
            encode_component(&identity.name)
        );

        if let Some(color) = color_filter(&identity.subcategory) {
            url.push_str("&filtre[couleur]=");
            url.push_str(&encode_component(color));
        }
        url.push_str("&filtre[type]=");
        url.push_str(type_filter(&identity.subcategory));

        let vintage = identity.vintage.trim();
        if !vintage.is_empty() {
            url.push_str("&filtre[millesime]=");
            url.push_str(&encode_component(vintage));
        }

        url.replace("%20", "+")
    }

    fn parse(&self, markup: &str) -> Option<MatchCandidate> {
        let doc = Html::parse_document(markup);

        // Acceptance is looser than Untappd's: any one non-empty field is a match.
        doc.select(&BLOCK).find_map(|block| {
            let name = join_non_empty(
                &[
                    select_text(block, &TITLE),
                    select_text(block, &SUB_TITLE),
                ],
                " ",
            );
            let url = block
                .select(&TITLE_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_href(&self.base_url, href))
                .unwrap_or_default();

            // Always present: no active stars renders as "0".
            let stars = block.select(&ACTIVE_STAR).count().to_string();
            let heart = if block.select(&HEART_ICON).next().is_some() {
                HEART.to_string()
            } else {
                String::new()
            };
            let year = first_integer_token(&select_text(block, &STARS_HEADING))
                .map(|token| format!("({token})"))
                .unwrap_or_default();
            let rating = join_non_empty(&[stars, heart, year], " ");

            if name.is_empty() && url.is_empty() && rating.is_empty() {
                return None;
            }
            Some(MatchCandidate { name, url, rating })
        })
    }
}

fn color_filter(subcategory: &str) -> Option<&'static str> {
    match subcategory.trim().to_lowercase().as_str() {
        "rött" => Some("rouge"),
        "rosé" => Some("rosé"),
        "vitt" => Some("blanc"),
        _ => None,
    }
}

fn type_filter(subcategory: &str) -> &'static str {
    if subcategory.trim().to_lowercase() == "mousserande" {
        "effervescent"
    } else {
        "tranquille"
    }
}

/// First whitespace-separated token that begins with an integer, e.g. the
/// vintage in `"Millésime 2016"`.
fn first_integer_token(text: &str) -> Option<&str> {
    text.split_whitespace().find(|token| {
        let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
        digits.starts_with(|c: char| c.is_ascii_digit())
    })
}

fn join_non_empty(parts: &[String], sep: &str) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
#[path = "hachette_test.rs"]
mod tests;
