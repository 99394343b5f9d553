//! Retailer page extraction.
//!
//! Product pages embed the full product record as JSON in the `data-props`
//! attribute of the `[data-react-component="ProductDetailPageContainer"]`
//! element, under the `product` key. Listing pages link to product pages
//! whose URLs carry the category and product id (see
//! [`vinol_core::parse_product_url`]).

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use vinol_core::{parse_product_url, Category, ProductIdentity, ProductRef};

use crate::error::ExtractError;
use crate::sources::{compile, resolve_href};

static PRODUCT_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| compile(r#"[data-react-component="ProductDetailPageContainer"]"#));
static PRODUCT_LINK: LazyLock<Selector> = LazyLock::new(|| compile(r#"a[href*="/produkt/"]"#));

#[derive(Debug, Deserialize)]
struct ContainerProps {
    product: Option<RawProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    product_name_bold: Option<String>,
    product_name_thin: Option<String>,
    producer_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    vintage: Option<String>,
    category_level1: Option<String>,
    category_level2: Option<String>,
}

/// Vintages arrive as either `"2018"` or `2018` depending on the page build.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Extracts the product identity from a retailer product page, or `None` if
/// the page has no usable name or its category is not beer or wine.
#[must_use]
pub fn extract(markup: &str, page_url: &str) -> Option<ProductIdentity> {
    try_extract(markup, page_url).ok()
}

/// Like [`extract`], but reports why extraction failed.
///
/// # Errors
///
/// Returns an [`ExtractError`] when the product container or its JSON is
/// missing, the name is empty, or the top-level category is absent or not
/// one of `Öl` / `Vin`.
pub fn try_extract(markup: &str, page_url: &str) -> Result<ProductIdentity, ExtractError> {
    let doc = Html::parse_document(markup);
    let props = doc
        .select(&PRODUCT_CONTAINER)
        .next()
        .and_then(|el| el.value().attr("data-props"))
        .ok_or(ExtractError::MissingContainer)?;

    let parsed: ContainerProps =
        serde_json::from_str(props).map_err(|e| ExtractError::InvalidProps(e.to_string()))?;
    let product = parsed
        .product
        .ok_or_else(|| ExtractError::InvalidProps("missing `product` key".to_string()))?;

    let name = [&product.product_name_bold, &product.product_name_thin]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        return Err(ExtractError::MissingName);
    }

    let category_label = product
        .category_level1
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .ok_or(ExtractError::MissingCategory)?;
    let category = Category::from_retailer_label(category_label)
        .ok_or_else(|| ExtractError::UnsupportedCategory(category_label.to_string()))?;

    Ok(ProductIdentity {
        name,
        producer: product.producer_name.unwrap_or_default().trim().to_string(),
        vintage: product.vintage.unwrap_or_default().trim().to_string(),
        category,
        subcategory: product.category_level2.unwrap_or_default().trim().to_string(),
        url: page_url.to_string(),
    })
}

/// Collects the beer and wine product pages linked from a listing page, in
/// document order, one entry per product id.
#[must_use]
pub fn collect_product_refs(markup: &str, base_url: &str) -> Vec<ProductRef> {
    let doc = Html::parse_document(markup);
    let mut seen = HashSet::new();

    doc.select(&PRODUCT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_href(base_url, href))
        .filter_map(|url| parse_product_url(&url))
        .filter(|product| seen.insert(product.product_id.clone()))
        .collect()
}

#[cfg(test)]
#[path = "retailer_test.rs"]
mod tests;
