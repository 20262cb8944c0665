//! Career asset cache, populated once by preload.

use std::sync::Arc;

use futures_util::future::join;
use tracing::{debug, info, warn};

use super::decode::{decode_model, decode_video};
use super::errors::{AssetError, FetchError};
use super::fetcher::AssetFetcher;
use super::resolver::{resolve_first, Resolution};
use crate::models::{AssetEntry, AssetKind, AssetMap, Career};

/// Resolves every career's model and video once and keeps the result.
#[derive(Debug)]
pub struct AssetCache {
    careers: Vec<Career>,
    assets: Option<AssetMap>,
    batch_warning: Option<FetchError>,
}

impl AssetCache {
    /// Create an empty cache for the given roster.
    pub fn new(careers: Vec<Career>) -> Self {
        Self {
            careers,
            assets: None,
            batch_warning: None,
        }
    }

    /// Create a cache that is already populated.
    pub fn preloaded(careers: Vec<Career>, assets: AssetMap) -> Self {
        Self {
            careers,
            assets: Some(assets),
            batch_warning: None,
        }
    }

    /// Resolve all assets, reporting cumulative progress as a percentage.
    ///
    /// Progress never decreases and reaches 100 exactly once. Missing assets
    /// leave their slot absent. A hard origin failure skips the remaining
    /// fetches and is kept as the batch warning. Once populated, later calls
    /// return the cached map without fetching or reporting progress.
    pub async fn preload<F>(&mut self, fetcher: &F, on_progress: impl FnMut(u32)) -> AssetMap
    where
        F: AssetFetcher,
    {
        if let Some(assets) = &self.assets {
            debug!("Assets already preloaded; reusing cache");
            return assets.clone();
        }

        let mut progress = Progress::new(self.careers.len(), on_progress);
        let mut assets = AssetMap::new();
        let mut aborted: Option<FetchError> = None;

        for career in &self.careers {
            let mut entry = AssetEntry::default();

            if aborted.is_none() {
                let (model, video) = join(
                    resolve_first(fetcher, &career.model_candidates, decode_model),
                    resolve_first(fetcher, &career.video_candidates, decode_video),
                )
                .await;

                entry.model = settle(career, AssetKind::Model, model, &mut aborted).map(Arc::new);
                entry.video = settle(career, AssetKind::Video, video, &mut aborted).map(Arc::new);
            }

            assets.insert(career.id.clone(), entry);
            progress.step();
        }
        progress.finish();

        let ready = assets.values().filter(|entry| entry.is_ready()).count();
        info!("Preloaded assets: {}/{} careers ready", ready, assets.len());

        self.batch_warning = aborted;
        self.assets = Some(assets.clone());
        assets
    }

    /// Whether preload has completed.
    pub fn is_loaded(&self) -> bool {
        self.assets.is_some()
    }

    /// The cached map, once preloaded.
    pub fn assets(&self) -> Option<&AssetMap> {
        self.assets.as_ref()
    }

    /// Cached entry for a career.
    pub fn entry(&self, career: &str) -> Option<&AssetEntry> {
        self.assets.as_ref()?.get(career)
    }

    /// Roster entry for a career.
    pub fn career(&self, career: &str) -> Option<&Career> {
        self.careers.iter().find(|c| c.id.as_str() == career)
    }

    pub fn careers(&self) -> &[Career] {
        &self.careers
    }

    /// Hard origin failure that cut the last preload short.
    pub fn batch_warning(&self) -> Option<&FetchError> {
        self.batch_warning.as_ref()
    }
}

/// Turn a resolution into a slot value, logging failures.
fn settle<T>(
    career: &Career,
    kind: AssetKind,
    resolution: Resolution<T>,
    aborted: &mut Option<FetchError>,
) -> Option<T> {
    match resolution {
        Resolution::Found(value) => Some(value),
        Resolution::Exhausted { tried } => {
            warn!("{}", AssetError::unavailable(career.id.clone(), kind, tried));
            None
        }
        Resolution::Aborted(e) => {
            if aborted.is_none() {
                warn!("Skipping remaining asset fetches: {}", e);
                *aborted = Some(e);
            }
            None
        }
    }
}

/// Integer percentage reporter that only ever moves forward.
struct Progress<P: FnMut(u32)> {
    total: usize,
    done: usize,
    reported: u32,
    report: P,
}

impl<P: FnMut(u32)> Progress<P> {
    fn new(total: usize, report: P) -> Self {
        Self {
            total,
            done: 0,
            reported: 0,
            report,
        }
    }

    fn step(&mut self) {
        self.done += 1;
        let percent = (self.done * 100 / self.total.max(1)).min(100) as u32;
        self.emit(percent);
    }

    fn finish(&mut self) {
        self.emit(100);
    }

    fn emit(&mut self, percent: u32) {
        if percent > self.reported {
            self.reported = percent;
            (self.report)(percent);
        }
    }
}
