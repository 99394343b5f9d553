//! Sequential batch execution.
//!
//! A listing page can show dozens of products; looking them up one at a time
//! keeps at most one request in flight against the rating sites. There is no
//! cancellation: dropping the returned future abandons the rest of the batch.

use std::future::Future;

use vinol_core::{LookupRequest, RatingMarker};

use crate::lookup::LookupService;

/// Runs `task` over `items` one at a time and returns the results in input
/// order. Task `i + 1` is not started until task `i` has completed.
pub async fn run_serially<T, U, F, Fut>(mut task: F, items: impl IntoIterator<Item = T>) -> Vec<U>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = U>,
{
    let items = items.into_iter();
    let mut results = Vec::with_capacity(items.size_hint().0);
    for item in items {
        results.push(task(item).await);
    }
    results
}

/// Looks up each product page in turn and reports its display state.
///
/// For every index, `on_marker` sees [`RatingMarker::Loading`] and then
/// exactly one terminal marker before the next product starts. A failed
/// lookup becomes [`RatingMarker::Error`] for that product and the batch
/// carries on. Returns the terminal markers in input order.
pub async fn annotate_products<L, M>(
    service: &L,
    page_urls: impl IntoIterator<Item = String>,
    on_marker: &M,
) -> Vec<RatingMarker>
where
    L: LookupService,
    M: Fn(usize, &RatingMarker),
{
    run_serially(
        move |(index, url): (usize, String)| async move {
            on_marker(index, &RatingMarker::Loading);
            let outcome = service.request(LookupRequest { url }).await;
            let marker = RatingMarker::from_outcome(outcome);
            on_marker(index, &marker);
            marker
        },
        page_urls.into_iter().enumerate(),
    )
    .await
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
