//! External rating sources.
//!
//! Each source turns a [`ProductIdentity`] into a search URL and parses that
//! search page's markup into at most one [`MatchCandidate`]. Matching is
//! "first acceptable result block", not "best result".

mod hachette;
mod untappd;

pub use hachette::Hachette;
pub use untappd::Untappd;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use scraper::{ElementRef, Selector};
use vinol_core::{Category, MatchCandidate, ProductIdentity};

/// Characters left unescaped by JavaScript's `encodeURIComponent`, which is
/// the query convention both sources expect.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Query builder and result parser for one rating site.
pub trait RatingSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn search_url(&self, identity: &ProductIdentity) -> String;

    /// Returns the first acceptable match in a search results page, if any.
    fn parse(&self, markup: &str) -> Option<MatchCandidate>;
}

/// The rating source for each supported [`Category`].
#[derive(Debug, Clone)]
pub struct Sources {
    beer: Untappd,
    wine: Hachette,
}

impl Sources {
    pub fn new(untappd_base_url: impl Into<String>, hachette_base_url: impl Into<String>) -> Self {
        Self {
            beer: Untappd::new(untappd_base_url),
            wine: Hachette::new(hachette_base_url),
        }
    }

    #[must_use]
    pub fn for_category(&self, category: Category) -> &dyn RatingSource {
        match category {
            Category::Beer => &self.beer,
            Category::Wine => &self.wine,
        }
    }
}

impl Default for Sources {
    fn default() -> Self {
        Self::new(
            vinol_core::config::DEFAULT_UNTAPPD_BASE_URL,
            vinol_core::config::DEFAULT_HACHETTE_BASE_URL,
        )
    }
}

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Resolves `href` against `base`, returning `None` for empty or unparseable
/// links.
pub(crate) fn resolve_href(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}

/// Concatenated text of every element under `scope` matching `selector`.
pub(crate) fn select_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
}

pub(crate) fn compile(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}
