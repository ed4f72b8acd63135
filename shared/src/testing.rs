//! In-memory `RegionSurface` used by the unit tests.

use std::collections::HashMap;

use crate::surface::{Emphasis, PointerKind, RegionInfo, RegionKey, RegionSurface};
use crate::svg::scan_regions;

#[derive(Debug, Default, Clone)]
struct RegionRecord {
    id: Option<String>,
    name: Option<String>,
    fill: Option<String>,
    label: Option<String>,
    emphasis: Emphasis,
}

#[derive(Debug, Default)]
pub(crate) struct MemorySurface {
    markup: Option<String>,
    regions: Vec<RegionRecord>,
    live: HashMap<u64, (RegionKey, PointerKind)>,
    next_listener: u64,
    removed: usize,
    injections: usize,
}

impl MemorySurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    pub(crate) fn injections(&self) -> usize {
        self.injections
    }

    fn by_id(&self, id: &str) -> Option<&RegionRecord> {
        self.regions.iter().find(|r| r.id.as_deref() == Some(id))
    }

    fn key_of(&self, id: &str) -> Option<RegionKey> {
        self.regions
            .iter()
            .position(|r| r.id.as_deref() == Some(id))
            .map(RegionKey)
    }

    pub(crate) fn key(&self, id: &str) -> RegionKey {
        self.key_of(id).expect("region id present in markup")
    }

    pub(crate) fn fill(&self, id: &str) -> Option<&str> {
        self.by_id(id)?.fill.as_deref()
    }

    pub(crate) fn label(&self, id: &str) -> Option<&str> {
        self.by_id(id)?.label.as_deref()
    }

    pub(crate) fn emphasis(&self, id: &str) -> Emphasis {
        self.by_id(id).map(|r| r.emphasis).unwrap_or_default()
    }

    pub(crate) fn listener_count_for(&self, id: &str) -> usize {
        let Some(key) = self.key_of(id) else {
            return 0;
        };
        self.live.values().filter(|(k, _)| *k == key).count()
    }

    pub(crate) fn live_listeners(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn removed_listeners(&self) -> usize {
        self.removed
    }
}

impl RegionSurface for MemorySurface {
    type Listener = u64;

    fn inject(&mut self, markup: &str) {
        self.injections += 1;
        self.markup = Some(markup.to_owned());
        self.regions = scan_regions(markup, "path")
            .into_iter()
            .map(|r| RegionRecord {
                id: r.id,
                name: r.name,
                ..RegionRecord::default()
            })
            .collect();
    }

    fn clear(&mut self) {
        self.markup = None;
        self.regions.clear();
    }

    fn regions(&self) -> Vec<RegionInfo> {
        self.regions
            .iter()
            .enumerate()
            .map(|(i, r)| RegionInfo {
                key: RegionKey(i),
                id: r.id.clone(),
                name: r.name.clone(),
            })
            .collect()
    }

    fn paint(&mut self, region: RegionKey, fill: &str, label: &str) {
        if let Some(r) = self.regions.get_mut(region.0) {
            r.fill = Some(fill.to_owned());
            r.label = Some(label.to_owned());
        }
    }

    fn set_emphasis(&mut self, region: RegionKey, emphasis: Emphasis) {
        if let Some(r) = self.regions.get_mut(region.0) {
            r.emphasis = emphasis;
        }
    }

    fn listen(&mut self, region: RegionKey, kind: PointerKind) -> u64 {
        let id = self.next_listener;
        self.next_listener += 1;
        self.live.insert(id, (region, kind));
        id
    }

    fn unlisten(&mut self, region: RegionKey, kind: PointerKind, listener: u64) {
        let entry = self.live.remove(&listener);
        assert_eq!(entry, Some((region, kind)), "listener removed twice or mismatched");
        self.removed += 1;
    }
}
