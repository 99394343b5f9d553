//! Command handlers for the CLI.
//!
//! Products are always looked up one at a time. A failed product is printed
//! as an error line and the run continues.

use anyhow::Context;
use serde_json::json;
use vinol_core::{AppConfig, ProductIdentity, RatingMarker};
use vinol_scraper::{
    annotate_products, collect_product_refs, KeyValueStore, Lookup, LookupService, PageFetcher,
    Sources,
};

/// Look up each product page in order and print its marker.
pub(crate) async fn run_lookup(
    config: &AppConfig,
    urls: &[String],
    json_output: bool,
) -> anyhow::Result<()> {
    let lookup = Lookup::from_config(config).context("failed to build lookup client")?;
    let urls: Vec<String> = urls
        .iter()
        .map(|url| absolute_product_url(&config.retailer_base_url, url))
        .collect();

    annotate_and_print(&lookup, urls, json_output).await;
    Ok(())
}

/// Fetch a listing page, then look up every beer and wine it links to.
pub(crate) async fn run_scan(
    config: &AppConfig,
    listing_url: &str,
    json_output: bool,
) -> anyhow::Result<()> {
    let lookup = Lookup::from_config(config).context("failed to build lookup client")?;
    scan_listing(&lookup, listing_url, json_output).await?;
    Ok(())
}

/// Returns each linked product URL with its terminal marker, in link order.
async fn scan_listing<F: PageFetcher, S: KeyValueStore>(
    lookup: &Lookup<F, S>,
    listing_url: &str,
    json_output: bool,
) -> anyhow::Result<Vec<(String, RatingMarker)>> {
    let markup = lookup
        .fetcher()
        .fetch_page(listing_url)
        .await
        .with_context(|| format!("failed to fetch listing page {listing_url}"))?;

    let refs = collect_product_refs(&markup, listing_url);
    tracing::info!(listing_url, products = refs.len(), "found products on listing page");
    if refs.is_empty() {
        eprintln!("no beer or wine products linked from {listing_url}");
        return Ok(Vec::new());
    }

    let urls: Vec<String> = refs.into_iter().map(|r| r.url).collect();
    let markers = annotate_and_print(lookup, urls.clone(), json_output).await;
    Ok(urls.into_iter().zip(markers).collect())
}

pub(crate) fn print_search_url(config: &AppConfig, identity: &ProductIdentity) {
    println!("{}", search_url_for(config, identity));
}

fn search_url_for(config: &AppConfig, identity: &ProductIdentity) -> String {
    let sources = Sources::new(&config.untappd_base_url, &config.hachette_base_url);
    sources.for_category(identity.category).search_url(identity)
}

async fn annotate_and_print<L: LookupService>(
    lookup: &L,
    urls: Vec<String>,
    json_output: bool,
) -> Vec<RatingMarker> {
    let on_marker = |index: usize, marker: &RatingMarker| {
        let url = urls.get(index).map_or("", String::as_str);
        if !marker.is_terminal() {
            eprintln!("[{}] {url} …", index + 1);
        } else if !json_output {
            println!("[{}] {url} {marker}", index + 1);
        }
    };

    let markers = annotate_products(lookup, urls.clone(), &on_marker).await;

    if json_output {
        let rows: Vec<serde_json::Value> = urls
            .iter()
            .zip(&markers)
            .map(|(url, marker)| json!({ "url": url, "result": marker }))
            .collect();
        println!("{}", serde_json::Value::Array(rows));
    }
    markers
}

/// Accepts either an absolute URL or a path on the retailer site.
fn absolute_product_url(retailer_base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            retailer_base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
