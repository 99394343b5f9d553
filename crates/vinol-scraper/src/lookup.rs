//! Lookup orchestration: retailer page → identity → rating source → cached
//! search → match.

use std::future::Future;

use vinol_core::{
    parse_product_url, AppConfig, LookupError, LookupRequest, LookupResult, MatchCandidate,
    ProductIdentity,
};

use crate::cache::{FileStore, KeyValueStore, MemoryStore, TtlCache};
use crate::client::{HttpClient, PageFetcher};
use crate::error::ScraperError;
use crate::retailer;
use crate::sources::Sources;

/// Request/response boundary between the page side and the lookup side.
///
/// Exactly one of result or error comes back per request.
pub trait LookupService: Send + Sync {
    fn request(
        &self,
        request: LookupRequest,
    ) -> impl Future<Output = Result<LookupResult, LookupError>> + Send;
}

/// Resolves retailer product pages to external ratings.
///
/// Search results are cached per search URL, including "no match" outcomes.
/// Failures are never retried here.
pub struct Lookup<F, S> {
    fetcher: F,
    sources: Sources,
    cache: TtlCache<S>,
}

impl Lookup<HttpClient, Box<dyn KeyValueStore>> {
    /// Builds a lookup with an HTTP fetcher and a memory or file-backed cache,
    /// as selected by `config.cache_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let fetcher = HttpClient::new(config.request_timeout_secs, &config.user_agent)?;
        let sources = Sources::new(&config.untappd_base_url, &config.hachette_base_url);
        let store: Box<dyn KeyValueStore> = match &config.cache_dir {
            Some(dir) => {
                tracing::debug!(dir = %dir.display(), "using file-backed rating cache");
                Box::new(FileStore::new(dir))
            }
            None => Box::new(MemoryStore::new()),
        };
        let cache = TtlCache::with_ttl_hours(store, config.cache_ttl_hours);
        Ok(Self::new(fetcher, sources, cache))
    }
}

impl<F: PageFetcher, S: KeyValueStore> Lookup<F, S> {
    pub fn new(fetcher: F, sources: Sources, cache: TtlCache<S>) -> Self {
        Self {
            fetcher,
            sources,
            cache,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Looks up the external rating for one retailer product page.
    ///
    /// A search that matches nothing is a success with `product` unset.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] carrying `page_url` when the product page or
    /// the search page cannot be fetched, or when the page does not describe
    /// a beer or wine.
    pub async fn lookup(&self, page_url: &str) -> Result<LookupResult, LookupError> {
        let mut audit = Audit::default();
        let outcome = self.resolve(page_url, &mut audit).await;
        audit.log(page_url, &outcome);
        outcome.map_err(|e| LookupError::new(e.to_string(), page_url))
    }

    async fn resolve(
        &self,
        page_url: &str,
        audit: &mut Audit,
    ) -> Result<LookupResult, ScraperError> {
        let markup = self.fetcher.fetch_page(page_url).await?;
        let identity = retailer::try_extract(&markup, page_url)?;
        audit.identity = Some(identity.clone());

        let source = self.sources.for_category(identity.category);
        let search_url = source.search_url(&identity);
        audit.search_url = Some(search_url.clone());

        let product: Option<MatchCandidate> = self
            .cache
            .get_or_fetch(&search_url, |url| async move {
                let body = self.fetcher.fetch_page(&url).await?;
                let parsed = source.parse(&body);
                tracing::debug!(
                    source = source.name(),
                    url = %url,
                    matched = parsed.is_some(),
                    "parsed search results"
                );
                Ok::<_, ScraperError>(parsed)
            })
            .await?;

        Ok(LookupResult {
            search_url,
            product,
        })
    }
}

impl<F: PageFetcher, S: KeyValueStore> LookupService for Lookup<F, S> {
    async fn request(&self, request: LookupRequest) -> Result<LookupResult, LookupError> {
        self.lookup(&request.url).await
    }
}

/// What a lookup had learned by the time it finished, for the audit line.
#[derive(Default)]
struct Audit {
    identity: Option<ProductIdentity>,
    search_url: Option<String>,
}

impl Audit {
    fn log(&self, page_url: &str, outcome: &Result<LookupResult, ScraperError>) {
        let product_id = parse_product_url(page_url).map(|r| r.product_id);
        let product_id = product_id.as_deref().unwrap_or("");
        let (name, producer, vintage, category) = match &self.identity {
            Some(id) => (
                id.name.as_str(),
                id.producer.as_str(),
                id.vintage.as_str(),
                id.category.as_str(),
            ),
            None => ("", "", "", ""),
        };
        let search_url = self.search_url.as_deref().unwrap_or("");

        match outcome {
            Ok(LookupResult {
                product: Some(found),
                ..
            }) => tracing::info!(
                page_url,
                product_id,
                name,
                producer,
                vintage,
                search_url,
                "{name} ({category}) => {} {} {}",
                found.name,
                found.rating,
                found.url
            ),
            Ok(LookupResult { product: None, .. }) => tracing::info!(
                page_url,
                product_id,
                name,
                producer,
                vintage,
                search_url,
                "{name} ({category}) => not found"
            ),
            Err(e) => tracing::warn!(
                page_url,
                product_id,
                name,
                producer,
                vintage,
                search_url,
                error = %e,
                "{name} ({category}) => error"
            ),
        }
    }
}

#[cfg(test)]
#[path = "lookup_test.rs"]
mod tests;
