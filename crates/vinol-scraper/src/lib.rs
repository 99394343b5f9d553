//! Rating lookup pipeline: retailer page extraction, Untappd/Hachette search
//! and parsing, a TTL cache over search results, and sequential batch runs.

pub mod batch;
pub mod cache;
pub mod client;
pub mod error;
pub mod lookup;
pub mod retailer;
pub mod sources;

pub use batch::{annotate_products, run_serially};
pub use cache::{CacheEntry, FileStore, KeyValueStore, MemoryStore, TtlCache};
pub use client::{HttpClient, PageFetcher};
pub use error::{CacheError, ExtractError, ScraperError};
pub use lookup::{Lookup, LookupService};
pub use retailer::{collect_product_refs, extract, try_extract};
pub use sources::{Hachette, RatingSource, Sources, Untappd};
