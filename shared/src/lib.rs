pub mod binder;
pub mod colors;
pub mod dataset;
pub mod format;
pub mod interaction;
pub mod lifecycle;
pub mod loader;
pub mod options;
pub mod scale;
pub mod surface;
pub mod svg;

#[cfg(test)]
mod testing;

pub use colors::Rgba;
pub use dataset::Dataset;
pub use interaction::{HoverState, HoverTarget, TooltipStyle};
pub use lifecycle::{CycleOutcome, LifecycleCoordinator, LoadTicket, run_cycle};
pub use loader::{AssetLoader, CancelToken, LoadError};
pub use options::{Dimension, HeatmapOptions};
pub use scale::{ColorRange, ColorScale, ColorSpace};
pub use surface::{Emphasis, PointerKind, PointerSample, RegionKey, RegionSurface};
