use crate::dataset::Dataset;
use crate::format::plain_value;
use crate::interaction::BoundRegion;
use crate::scale::ColorScale;
use crate::surface::{PointerKind, RegionKey, RegionSurface};

/// The three listeners attached to one region.
#[derive(Debug)]
pub struct RegionHandlers<L> {
    pub region: RegionKey,
    pub enter: L,
    pub leave: L,
    pub moved: L,
}

/// Every listener registered during one bind cycle, kept for symmetric removal.
#[derive(Debug)]
pub struct HandlerRegistry<L> {
    entries: Vec<RegionHandlers<L>>,
}

impl<L> Default for HandlerRegistry<L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<L> HandlerRegistry<L> {
    /// Number of individual listeners held.
    pub fn handler_count(&self) -> usize {
        self.entries.len() * PointerKind::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn register<S>(&mut self, surface: &mut S, region: RegionKey)
    where
        S: RegionSurface<Listener = L>,
    {
        let enter = surface.listen(region, PointerKind::Enter);
        let leave = surface.listen(region, PointerKind::Leave);
        let moved = surface.listen(region, PointerKind::Move);
        self.entries.push(RegionHandlers {
            region,
            enter,
            leave,
            moved,
        });
    }

    /// Remove every listener from `surface`, leaving the registry empty.
    /// Returns how many listeners were removed.
    pub fn clear<S>(&mut self, surface: &mut S) -> usize
    where
        S: RegionSurface<Listener = L>,
    {
        let removed = self.handler_count();
        for entry in self.entries.drain(..) {
            surface.unlisten(entry.region, PointerKind::Enter, entry.enter);
            surface.unlisten(entry.region, PointerKind::Leave, entry.leave);
            surface.unlisten(entry.region, PointerKind::Move, entry.moved);
        }
        removed
    }
}

/// Result of styling one freshly injected document.
#[derive(Debug)]
pub struct Binding<L> {
    pub registry: HandlerRegistry<L>,
    pub regions: Vec<BoundRegion>,
}

/// Color, label and wire up every region that has a value in `dataset`.
///
/// Regions without an id or without a (finite) value are left untouched.
pub fn bind<S: RegionSurface>(
    surface: &mut S,
    dataset: &Dataset,
    scale: &ColorScale,
) -> Binding<S::Listener> {
    let mut registry = HandlerRegistry::default();
    let mut regions = Vec::new();

    for info in surface.regions() {
        let Some(id) = info.id else {
            continue;
        };
        let Some(value) = dataset.get(&id) else {
            continue;
        };

        let fill = scale.map(value);
        let label = info.name.unwrap_or_else(|| id.clone());
        let aria_label = format!("{label}: {}", plain_value(value));
        surface.paint(info.key, &fill.to_string(), &aria_label);
        registry.register(surface, info.key);

        regions.push(BoundRegion {
            key: info.key,
            id,
            label,
            value,
            fill,
        });
    }

    Binding { registry, regions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgba;
    use crate::scale::ColorRange;
    use crate::testing::MemorySurface;

    const MAP: &str = r#"<svg><path id="A" name="Alpha"/><path id="B"/><path id="C" name="Gamma"/><path id="D" name="Delta"/><path/></svg>"#;

    fn scale_for(data: &Dataset) -> ColorScale {
        let range = ColorRange::new(Rgba::rgb(255, 255, 255), Rgba::rgb(255, 0, 0));
        ColorScale::new(data.domain().unwrap(), range)
    }

    #[test]
    fn paints_matching_regions_with_scaled_colors() {
        let data: Dataset = [("A", 10.0), ("B", 30.0), ("C", 20.0)].into_iter().collect();
        let mut surface = MemorySurface::new();
        surface.inject(MAP);

        let binding = bind(&mut surface, &data, &scale_for(&data));

        assert_eq!(surface.fill("A"), Some("rgb(255, 255, 255)"));
        assert_eq!(surface.fill("B"), Some("rgb(255, 0, 0)"));
        assert_eq!(surface.fill("C"), Some("rgb(255, 128, 128)"));
        assert_eq!(binding.regions.len(), 3);
        assert_eq!(binding.registry.handler_count(), 9);
    }

    #[test]
    fn labels_fall_back_to_id() {
        let data: Dataset = [("A", 10.0), ("B", 30.0)].into_iter().collect();
        let mut surface = MemorySurface::new();
        surface.inject(MAP);

        bind(&mut surface, &data, &scale_for(&data));

        assert_eq!(surface.label("A"), Some("Alpha: 10"));
        assert_eq!(surface.label("B"), Some("B: 30"));
    }

    #[test]
    fn regions_missing_from_dataset_are_untouched() {
        let data: Dataset = [("A", 1.0), ("Z", 2.0)].into_iter().collect();
        let mut surface = MemorySurface::new();
        surface.inject(MAP);

        let binding = bind(&mut surface, &data, &scale_for(&data));

        assert_eq!(surface.fill("D"), None);
        assert_eq!(surface.label("D"), None);
        assert_eq!(surface.listener_count_for("D"), 0);
        assert_eq!(binding.regions.len(), 1);
    }

    #[test]
    fn clear_removes_exactly_what_was_registered() {
        let data: Dataset = [("A", 1.0), ("B", 2.0), ("D", 3.0)].into_iter().collect();
        let mut surface = MemorySurface::new();
        surface.inject(MAP);

        let mut binding = bind(&mut surface, &data, &scale_for(&data));
        assert_eq!(surface.live_listeners(), 9);

        let removed = binding.registry.clear(&mut surface);

        assert_eq!(removed, 9);
        assert_eq!(surface.live_listeners(), 0);
        assert_eq!(surface.removed_listeners(), 9);
        assert!(binding.registry.is_empty());
        assert_eq!(binding.registry.clear(&mut surface), 0);
    }
}
