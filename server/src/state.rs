use std::sync::Arc;

use regionmap_shared::svg::{SvgError, make_responsive, scan_regions};
use serde::Serialize;

use crate::config::ASSET_REGION_TAG;

/// What startup learned about the region image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetSummary {
    pub file: String,
    /// Elements with an `id`, i.e. the ones a dataset can color.
    pub regions: usize,
    pub named: usize,
}

impl AssetSummary {
    pub fn inspect(file: &str, markup: &str) -> Result<Self, SvgError> {
        make_responsive(markup)?;
        let scanned = scan_regions(markup, ASSET_REGION_TAG);
        Ok(Self {
            file: file.to_owned(),
            regions: scanned.iter().filter(|r| r.id.is_some()).count(),
            named: scanned
                .iter()
                .filter(|r| r.id.is_some() && r.name.is_some())
                .count(),
        })
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    pub asset: Arc<AssetSummary>,
}

impl AppState {
    pub fn new(asset: AssetSummary) -> Self {
        Self {
            asset: Arc::new(asset),
        }
    }
}
