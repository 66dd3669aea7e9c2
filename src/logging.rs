//! Logging for outgoing API requests and their responses.

use reqwest::Method;

/// Response bodies longer than this many characters are truncated at the
/// `info` level and logged in full at the `debug` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log an outgoing request at the `info` level.
///
/// The bearer token is never passed in, so it cannot end up in the logs.
pub(crate) fn log_request(method: &Method, url: &str, query: &[(&str, u64)]) {
    tracing::info!("Sending request: {method} {url} {query:?}");
}

/// Log a response body, truncating it to [LOG_BODY_LENGTH_LIMIT] characters.
pub(crate) fn log_response(status: u16, body: &str) {
    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(prefix) => {
            tracing::info!("Received response: {status}\nbody: {prefix}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Received response: {status}\nbody: {body:?}"),
    }
}

/// The first `limit` characters of `text`, or `None` if it is not longer than that.
fn truncate(text: &str, limit: usize) -> Option<&str> {
    text.char_indices()
        .nth(limit)
        .map(|(byte_index, _)| &text[..byte_index])
}
