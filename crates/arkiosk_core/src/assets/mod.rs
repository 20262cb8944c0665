//! Asset resolution: fetch, decode and cache per-career content.
//!
//! Each career declares ordered candidate filenames for its model and its
//! video. [`AssetCache::preload`] walks the roster once, resolving each slot
//! with [`resolve_first`] against an [`AssetFetcher`] (local directory or
//! HTTP origin). Absent slots are warnings, never errors.

mod cache;
pub mod decode;
mod errors;
mod fetcher;
mod resolver;

pub use cache::AssetCache;
pub use decode::{decode_model, decode_video};
pub use errors::{AssetError, AssetResult, FetchError, FetchResult};
pub use fetcher::{AssetFetcher, FsFetcher, HttpFetcher};
pub use resolver::{resolve_first, Resolution};
