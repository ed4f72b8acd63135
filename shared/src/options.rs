use serde::{Deserialize, Serialize};

use crate::interaction::TooltipStyle;
use crate::scale::{ColorRange, ColorSpace};

pub const DEFAULT_ASSET_URL: &str = "/assets/regions.svg";
pub const DEFAULT_REGION_TAG: &str = "path";

/// CSS length: bare numbers are pixels, strings pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Px(f64),
    Css(String),
}

impl Dimension {
    pub fn to_css(&self) -> String {
        match self {
            Dimension::Px(px) => format!("{px}px"),
            Dimension::Css(css) => css.clone(),
        }
    }
}

impl From<f64> for Dimension {
    fn from(px: f64) -> Self {
        Dimension::Px(px)
    }
}

impl From<&str> for Dimension {
    fn from(css: &str) -> Self {
        Dimension::Css(css.to_owned())
    }
}

/// Everything about a heatmap instance except its dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    pub width: Dimension,
    pub height: Dimension,
    pub color_range: ColorRange,
    pub color_space: ColorSpace,
    pub tooltip_style: TooltipStyle,
    /// Extra text shown next to the value, e.g. a unit.
    pub tooltip_detail: Option<String>,
    pub asset_url: String,
    /// Element name that carries region ids in the image.
    pub region_tag: String,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            width: Dimension::Css("100%".to_owned()),
            height: Dimension::Css("400px".to_owned()),
            color_range: ColorRange::default(),
            color_space: ColorSpace::default(),
            tooltip_style: TooltipStyle::default(),
            tooltip_detail: None,
            asset_url: DEFAULT_ASSET_URL.to_owned(),
            region_tag: DEFAULT_REGION_TAG.to_owned(),
        }
    }
}
