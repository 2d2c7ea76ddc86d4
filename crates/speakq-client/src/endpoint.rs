//! Inference endpoint URL construction.

use url::Url;

use crate::error::ClientResult;

/// Build `{base}{path}?text={encoded}`.
///
/// The text is percent-encoded as a single query component, so `&`, `=`, `#`
/// and non-ASCII characters reach the server intact.
pub(crate) fn synthesis_url(base_url: &str, infer_path: &str, text: &str) -> ClientResult<Url> {
    let raw = format!(
        "{base_url}{infer_path}?text={}",
        urlencoding::encode(text)
    );
    Ok(Url::parse(&raw)?)
}
