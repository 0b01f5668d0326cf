use std::time::{Duration, UNIX_EPOCH};

use reqwest::header::HeaderMap;

static RESET_HEADER: &str = "x-rate-limit-reset";

/// Epoch second at which the current rate limit window resets, taken from
/// the response headers of a throttled request.
pub(crate) fn reset_from_headers(headers: &HeaderMap) -> Option<u64> {
    headers.get(RESET_HEADER)?.to_str().ok()?.parse().ok()
}

/// Time remaining until `reset`, zero if the reset is already in the past.
pub fn duration_until(reset: u64) -> Duration {
    let now = UNIX_EPOCH.elapsed().unwrap_or_default();
    Duration::from_secs(reset).saturating_sub(now)
}

/// Sleeps out the rate limit window ending at epoch second `reset`.
pub async fn wait_until(reset: u64) {
    tokio::time::sleep(duration_until(reset)).await;
}
