use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Retail categories that have an external rating source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Beer,
    Wine,
}

impl Category {
    /// Maps the retailer's top-level category label (`"Öl"`, `"Vin"`) to a
    /// [`Category`]. Matching is case-insensitive; any other label is
    /// unsupported.
    #[must_use]
    pub fn from_retailer_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "öl" => Some(Self::Beer),
            "vin" => Some(Self::Wine),
            _ => None,
        }
    }

    /// Maps the category segment of a retailer product path
    /// (`/produkt/ol/...`, `/produkt/vin/...`).
    #[must_use]
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "ol" => Some(Self::Beer),
            "vin" => Some(Self::Wine),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beer => "beer",
            Self::Wine => "wine",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beer" | "öl" | "ol" => Ok(Self::Beer),
            "wine" | "vin" => Ok(Self::Wine),
            other => Err(format!("unsupported category \"{other}\"")),
        }
    }
}

/// What a retailer product is, independent of the retailer's page layout.
///
/// Produced once per lookup and consumed by exactly one rating source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdentity {
    /// Display name: bold and thin name fragments joined with a space.
    pub name: String,
    /// May be empty.
    pub producer: String,
    /// May be empty.
    pub vintage: String,
    pub category: Category,
    /// Second-level retailer category, e.g. `"Rött"` or `"Mousserande"`.
    pub subcategory: String,
    /// Retailer page the identity was extracted from.
    pub url: String,
}

/// A single best-effort match from an external rating source.
///
/// `rating` is source-specific: a decimal score for beer, a composite
/// stars/heart/year string for wine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub name: String,
    pub url: String,
    pub rating: String,
}

/// Successful lookup envelope. A missing `product` means no match was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub search_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<MatchCandidate>,
}

/// Returned only when extraction or transport fails, never for a missing match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{msg} ({url})")]
pub struct LookupError {
    pub msg: String,
    /// The retailer product page the lookup was started from.
    pub url: String,
}

impl LookupError {
    pub fn new(msg: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            url: url.into(),
        }
    }
}

/// Request crossing the page/lookup boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Retailer product-page URL.
    pub url: String,
}

/// Per-product display state driven by the batch runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RatingMarker {
    Loading,
    Found {
        search_url: String,
        product: MatchCandidate,
    },
    NotFound {
        search_url: String,
    },
    Error {
        msg: String,
    },
}

impl RatingMarker {
    /// Builds the terminal marker for a finished lookup.
    #[must_use]
    pub fn from_outcome(outcome: Result<LookupResult, LookupError>) -> Self {
        match outcome {
            Ok(LookupResult {
                search_url,
                product: Some(product),
            }) => Self::Found {
                search_url,
                product,
            },
            Ok(LookupResult {
                search_url,
                product: None,
            }) => Self::NotFound { search_url },
            Err(err) => Self::Error { msg: err.msg },
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

impl std::fmt::Display for RatingMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "…"),
            Self::Found { product, .. } => {
                write!(f, "{} {} <{}>", product.rating, product.name, product.url)
            }
            Self::NotFound { search_url } => write!(f, "not found <{search_url}>"),
            Self::Error { msg } => write!(f, "error: {msg}"),
        }
    }
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
