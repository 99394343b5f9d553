//! Product identification from retailer product-page URLs.
//!
//! Product pages live under `/produkt/<category>/<slug>-<id><variant>/`,
//! where `<category>` is `ol` or `vin` and the last hyphen-delimited token of
//! the slug is the numeric product id followed by a two-character package
//! variant suffix.

use reqwest::Url;

use crate::products::Category;

const PRODUCT_PATH_PREFIX: &str = "produkt";
const VARIANT_SUFFIX_LEN: usize = 2;

/// A product reference recovered from a retailer URL alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub category: Category,
    pub product_id: String,
    pub url: String,
}

/// Parses a retailer product-page URL into a [`ProductRef`].
///
/// Returns `None` for URLs that are not product pages, whose category segment
/// is not beer or wine, or whose id token is not numeric once the variant
/// suffix is stripped.
#[must_use]
pub fn parse_product_url(url: &str) -> Option<ProductRef> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .collect();

    let prefix_pos = segments.iter().position(|s| *s == PRODUCT_PATH_PREFIX)?;
    let category = Category::from_path_segment(segments.get(prefix_pos + 1)?)?;

    // The slug must come after the category segment.
    if segments.len() < prefix_pos + 3 {
        return None;
    }
    let last = segments.last()?;
    let product_id = product_id_from_slug(last)?;

    Some(ProductRef {
        category,
        product_id,
        url: url.to_string(),
    })
}

fn product_id_from_slug(slug: &str) -> Option<String> {
    let token = slug.rsplit('-').next()?;
    let cut = token.len().checked_sub(VARIANT_SUFFIX_LEN)?;
    let id = token.get(..cut)?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_beer_product_url() {
        let r = parse_product_url("https://www.systembolaget.se/produkt/ol/brewco-pale-ale-152903/")
            .unwrap();
        assert_eq!(r.category, Category::Beer);
        assert_eq!(r.product_id, "1529");
    }

    #[test]
    fn parses_wine_product_url_without_trailing_slash() {
        let r = parse_product_url("https://www.systembolaget.se/produkt/vin/chateau-x-7654301")
            .unwrap();
        assert_eq!(r.category, Category::Wine);
        assert_eq!(r.product_id, "76543");
    }

    #[test]
    fn ignores_query_string() {
        let r = parse_product_url(
            "https://www.systembolaget.se/produkt/ol/stout-889912/?utm_source=x",
        )
        .unwrap();
        assert_eq!(r.product_id, "8899");
    }

    #[test]
    fn rejects_other_categories() {
        assert!(parse_product_url("https://www.systembolaget.se/produkt/sprit/gin-123401/").is_none());
    }

    #[test]
    fn rejects_non_product_paths() {
        assert!(parse_product_url("https://www.systembolaget.se/sortiment/ol/").is_none());
        assert!(parse_product_url("https://www.systembolaget.se/produkt/ol/").is_none());
        assert!(parse_product_url("not a url").is_none());
    }

    #[test]
    fn rejects_short_or_non_numeric_ids() {
        assert!(parse_product_url("https://www.systembolaget.se/produkt/ol/ale-01/").is_none());
        assert!(parse_product_url("https://www.systembolaget.se/produkt/ol/pale-ale/").is_none());
    }
}
