//! First-success-wins resolution over an ordered candidate list.

use tracing::debug;

use super::errors::{AssetResult, FetchError};
use super::fetcher::AssetFetcher;

/// Outcome of resolving one asset slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// A candidate fetched and decoded.
    Found(T),
    /// Every candidate failed softly.
    Exhausted { tried: Vec<String> },
    /// The origin failed hard; the batch should stop.
    Aborted(FetchError),
}

impl<T> Resolution<T> {
    /// The resolved value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Resolution::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Try `candidates` in order until one fetches and decodes.
///
/// Fetch and decode failures of a candidate move on to the next one. A hard
/// fetch failure stops immediately.
pub async fn resolve_first<F, T, D>(fetcher: &F, candidates: &[String], decode: D) -> Resolution<T>
where
    F: AssetFetcher,
    D: Fn(&str, Vec<u8>) -> AssetResult<T>,
{
    let mut tried = Vec::with_capacity(candidates.len());

    for name in candidates {
        tried.push(name.clone());

        match fetcher.fetch(name).await {
            Ok(bytes) => match decode(name, bytes) {
                Ok(value) => {
                    debug!("Resolved {}", name);
                    return Resolution::Found(value);
                }
                Err(e) => debug!("Candidate rejected: {}", e),
            },
            Err(e) if e.is_hard() => return Resolution::Aborted(e),
            Err(e) => debug!("Candidate skipped: {}", e),
        }
    }

    Resolution::Exhausted { tried }
}
