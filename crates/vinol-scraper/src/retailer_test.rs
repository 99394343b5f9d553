use serde_json::json;

use super::*;

const PAGE_URL: &str = "https://www.systembolaget.se/produkt/ol/brewco-pale-ale-152903/";

/// Wraps a props object the way the retailer renders it: JSON, HTML-escaped,
/// in a `data-props` attribute.
fn product_page(props: &serde_json::Value) -> String {
    let escaped = props
        .to_string()
        .replace('&', "&amp;")
        .replace('"', "&quot;");
    format!(
        r#"<html><body>
<header><div data-react-component="Header" data-props="{{}}"></div></header>
<div data-react-component="ProductDetailPageContainer" data-props="{escaped}"></div>
</body></html>"#
    )
}

fn props(product: serde_json::Value) -> serde_json::Value {
    json!({ "product": product, "isLoggedIn": false })
}

#[test]
fn extracts_beer_identity() {
    let page = product_page(&props(json!({
        "productNameBold": "Pale Ale",
        "productNameThin": null,
        "producerName": "BrewCo",
        "vintage": "",
        "categoryLevel1": "Öl",
        "categoryLevel2": "Ale brittisk-amerikansk stil",
    })));

    let identity = extract(&page, PAGE_URL).unwrap();
    assert_eq!(identity.name, "Pale Ale");
    assert_eq!(identity.producer, "BrewCo");
    assert_eq!(identity.vintage, "");
    assert_eq!(identity.category, Category::Beer);
    assert_eq!(identity.subcategory, "Ale brittisk-amerikansk stil");
    assert_eq!(identity.url, PAGE_URL);
}

#[test]
fn joins_name_fragments_and_reads_numeric_vintage() {
    let page = product_page(&props(json!({
        "productNameBold": "Château Pey La Tour",
        "productNameThin": "Réserve du Château",
        "producerName": "Vignobles Dourthe",
        "vintage": 2018,
        "categoryLevel1": "Vin",
        "categoryLevel2": "Rött vin",
    })));

    let identity = extract(&page, PAGE_URL).unwrap();
    assert_eq!(identity.name, "Château Pey La Tour Réserve du Château");
    assert_eq!(identity.vintage, "2018");
    assert_eq!(identity.category, Category::Wine);
}

#[test]
fn missing_producer_and_vintage_are_empty() {
    let page = product_page(&props(json!({
        "productNameBold": "Lager",
        "categoryLevel1": "öl",
    })));
    let identity = extract(&page, PAGE_URL).unwrap();
    assert_eq!(identity.producer, "");
    assert_eq!(identity.vintage, "");
    assert_eq!(identity.subcategory, "");
}

#[test]
fn unsupported_category_is_rejected() {
    let page = product_page(&props(json!({
        "productNameBold": "London Dry Gin",
        "categoryLevel1": "Sprit",
    })));
    assert_eq!(
        try_extract(&page, PAGE_URL),
        Err(ExtractError::UnsupportedCategory("Sprit".to_string()))
    );
    assert_eq!(extract(&page, PAGE_URL), None);
}

#[test]
fn missing_category_is_rejected() {
    let page = product_page(&props(json!({ "productNameBold": "Mystery" })));
    assert_eq!(try_extract(&page, PAGE_URL), Err(ExtractError::MissingCategory));
}

#[test]
fn missing_name_is_rejected() {
    let page = product_page(&props(json!({
        "productNameBold": "  ",
        "productNameThin": null,
        "categoryLevel1": "Öl",
    })));
    assert_eq!(try_extract(&page, PAGE_URL), Err(ExtractError::MissingName));
}

#[test]
fn thin_name_alone_is_enough() {
    let page = product_page(&props(json!({
        "productNameThin": "Nummer 3",
        "categoryLevel1": "Öl",
    })));
    assert_eq!(extract(&page, PAGE_URL).unwrap().name, "Nummer 3");
}

#[test]
fn page_without_container_is_rejected() {
    assert_eq!(
        try_extract("<html><body><h1>Pale Ale</h1></body></html>", PAGE_URL),
        Err(ExtractError::MissingContainer)
    );
}

#[test]
fn malformed_props_are_rejected() {
    let page = r#"<div data-react-component="ProductDetailPageContainer" data-props="{not json"></div>"#;
    assert!(matches!(
        try_extract(page, PAGE_URL),
        Err(ExtractError::InvalidProps(_))
    ));

    let page = product_page(&json!({ "somethingElse": true }));
    assert!(matches!(
        try_extract(&page, PAGE_URL),
        Err(ExtractError::InvalidProps(_))
    ));
}

#[test]
fn collects_unique_beer_and_wine_links() {
    let listing = r#"<html><body>
<a href="/produkt/ol/brewco-pale-ale-152903/">Pale Ale</a>
<a href="/produkt/ol/brewco-pale-ale-152903/"><img src="x.png"></a>
<a href="/produkt/sprit/gin-100001/">Gin</a>
<a href="https://www.systembolaget.se/produkt/vin/chateau-x-7654301/">Château X</a>
<a href="/produkt/ol/brewco-pale-ale-152912/">Pale Ale 6-pack</a>
<a href="/sortiment/ol/">Alla öl</a>
</body></html>"#;

    let refs = collect_product_refs(listing, "https://www.systembolaget.se");
    let ids: Vec<(&str, Category)> = refs
        .iter()
        .map(|r| (r.product_id.as_str(), r.category))
        .collect();
    assert_eq!(
        ids,
        vec![("1529", Category::Beer), ("76543", Category::Wine)]
    );
    assert_eq!(
        refs[0].url,
        "https://www.systembolaget.se/produkt/ol/brewco-pale-ale-152903/"
    );
}
