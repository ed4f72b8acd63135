use crate::colors::Rgba;
use crate::format::format_value;
use crate::surface::{Emphasis, PointerKind, PointerSample, RegionKey};

/// Gap between the pointer and the tooltip box, in pixels.
pub const TOOLTIP_MARGIN: f64 = 12.0;

/// A region the binder made interactive.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundRegion {
    pub key: RegionKey,
    pub id: String,
    /// `name` attribute, or the id when the image has none.
    pub label: String,
    pub value: f64,
    pub fill: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub region: RegionKey,
    pub id: String,
    pub label: String,
    pub value: f64,
    pub fill: Rgba,
}

impl HoverTarget {
    pub fn formatted_value(&self) -> String {
        format_value(self.value)
    }

    pub fn tooltip_text(&self) -> String {
        format!("{}: {}", self.label, self.formatted_value())
    }
}

/// Transient hover record the presentation layer renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverState {
    pub target: Option<HoverTarget>,
    pub pointer: PointerSample,
}

impl HoverState {
    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn hovered(&self) -> Option<RegionKey> {
        self.target.as_ref().map(|t| t.region)
    }
}

/// Styling changes to push to the surface after a transition.
pub type EmphasisPlan = Vec<(RegionKey, Emphasis)>;

/// Hover state machine over the regions of the current bind cycle.
#[derive(Debug, Default)]
pub struct InteractionController {
    bound: Vec<BoundRegion>,
    state: HoverState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn bound(&self) -> &[BoundRegion] {
        &self.bound
    }

    /// Start tracking a new bind cycle's regions. Hover must already be idle.
    pub fn attach(&mut self, bound: Vec<BoundRegion>) {
        debug_assert!(!self.state.is_active());
        self.bound = bound;
    }

    /// Return to idle and forget the bound regions.
    pub fn detach(&mut self) -> EmphasisPlan {
        let plan = self.reset();
        self.bound.clear();
        plan
    }

    pub fn handle(&mut self, region: RegionKey, kind: PointerKind, sample: PointerSample) -> EmphasisPlan {
        match kind {
            PointerKind::Enter => self.enter(region, sample),
            PointerKind::Leave => self.leave(region),
            PointerKind::Move => {
                self.move_to(region, sample);
                Vec::new()
            }
        }
    }

    pub fn enter(&mut self, region: RegionKey, sample: PointerSample) -> EmphasisPlan {
        let Some(entered) = self.bound.iter().find(|r| r.key == region) else {
            return Vec::new();
        };
        if self.state.hovered() == Some(region) {
            self.state.pointer = sample;
            return Vec::new();
        }
        let target = HoverTarget {
            region,
            id: entered.id.clone(),
            label: entered.label.clone(),
            value: entered.value,
            fill: entered.fill,
        };

        // Never go Hovering(A) -> Hovering(B) directly: revert A first.
        let mut plan = self.reset();
        self.state = HoverState {
            target: Some(target),
            pointer: sample,
        };
        plan.extend(self.bound.iter().map(|r| {
            let emphasis = if r.key == region {
                Emphasis::Emphasized
            } else {
                Emphasis::Muted
            };
            (r.key, emphasis)
        }));
        plan
    }

    pub fn leave(&mut self, region: RegionKey) -> EmphasisPlan {
        if self.state.hovered() != Some(region) {
            return Vec::new();
        }
        self.reset()
    }

    pub fn move_to(&mut self, region: RegionKey, sample: PointerSample) -> bool {
        if self.state.hovered() != Some(region) {
            return false;
        }
        self.state.pointer = sample;
        true
    }

    /// Force idle. Yields a neutral plan only if something was hovered.
    pub fn reset(&mut self) -> EmphasisPlan {
        if self.state.target.take().is_none() {
            return Vec::new();
        }
        self.state.pointer = PointerSample::default();
        self.bound
            .iter()
            .map(|r| (r.key, Emphasis::Neutral))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipStyle {
    /// Single `label: value` line.
    Minimal,
    /// Title, value, fill swatch and the supplementary text chip.
    #[default]
    Extended,
}

/// Top-left corner for a `size` tooltip near the pointer.
///
/// Sits [`TOOLTIP_MARGIN`] below-right of the pointer, flips to the other side
/// on an axis that would overflow the container, then clamps inside it.
pub fn place_tooltip(pointer: PointerSample, size: (f64, f64)) -> (f64, f64) {
    let axis = |at: f64, extent: f64, container: f64| {
        let mut start = at + TOOLTIP_MARGIN;
        if container > 0.0 && start + extent > container {
            start = at - TOOLTIP_MARGIN - extent;
        }
        let upper = (container - extent).max(0.0);
        if container > 0.0 {
            start.clamp(0.0, upper)
        } else {
            start.max(0.0)
        }
    };
    (
        axis(pointer.x, size.0, pointer.width),
        axis(pointer.y, size.1, pointer.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(i: usize, label: &str, value: f64) -> BoundRegion {
        BoundRegion {
            key: RegionKey(i),
            id: label.to_owned(),
            label: label.to_owned(),
            value,
            fill: Rgba::rgb(0, 0, 0),
        }
    }

    fn controller() -> InteractionController {
        let mut c = InteractionController::new();
        c.attach(vec![region(0, "A", 10.0), region(1, "B", 30.0), region(2, "C", 20.0)]);
        c
    }

    fn at(x: f64, y: f64) -> PointerSample {
        PointerSample {
            x,
            y,
            width: 400.0,
            height: 300.0,
        }
    }

    fn final_emphasis(plan: &EmphasisPlan, key: usize) -> Option<Emphasis> {
        plan.iter()
            .rev()
            .find(|(k, _)| *k == RegionKey(key))
            .map(|(_, e)| *e)
    }

    #[test]
    fn enter_emphasizes_one_and_mutes_the_rest() {
        let mut c = controller();
        let plan = c.enter(RegionKey(1), at(5.0, 6.0));
        assert_eq!(
            plan,
            vec![
                (RegionKey(0), Emphasis::Muted),
                (RegionKey(1), Emphasis::Emphasized),
                (RegionKey(2), Emphasis::Muted),
            ]
        );
        let target = c.state().target.as_ref().unwrap();
        assert_eq!(target.tooltip_text(), "B: 30");
        assert_eq!(c.state().pointer, at(5.0, 6.0));
    }

    #[test]
    fn move_updates_pointer_only() {
        let mut c = controller();
        c.enter(RegionKey(0), at(1.0, 1.0));
        let plan = c.handle(RegionKey(0), PointerKind::Move, at(9.0, 8.0));
        assert!(plan.is_empty());
        assert_eq!(c.state().pointer, at(9.0, 8.0));
        assert_eq!(c.state().hovered(), Some(RegionKey(0)));
    }

    #[test]
    fn move_on_other_region_is_ignored() {
        let mut c = controller();
        c.enter(RegionKey(0), at(1.0, 1.0));
        assert!(!c.move_to(RegionKey(2), at(9.0, 9.0)));
        assert_eq!(c.state().pointer, at(1.0, 1.0));
    }

    #[test]
    fn leave_restores_uniform_styling() {
        let mut c = controller();
        c.enter(RegionKey(2), at(1.0, 1.0));
        let plan = c.leave(RegionKey(2));
        assert!(!c.state().is_active());
        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|(_, e)| *e == Emphasis::Neutral));
    }

    #[test]
    fn switching_regions_reverts_before_emphasizing() {
        let mut c = controller();
        c.enter(RegionKey(0), at(1.0, 1.0));
        let plan = c.enter(RegionKey(1), at(2.0, 2.0));

        // Neutral pass for every region comes first.
        assert!(plan[..3].iter().all(|(_, e)| *e == Emphasis::Neutral));
        assert_eq!(final_emphasis(&plan, 0), Some(Emphasis::Muted));
        assert_eq!(final_emphasis(&plan, 1), Some(Emphasis::Emphasized));
        assert_eq!(c.state().hovered(), Some(RegionKey(1)));
    }

    #[test]
    fn stale_leave_after_switch_is_ignored() {
        let mut c = controller();
        c.enter(RegionKey(0), at(1.0, 1.0));
        c.enter(RegionKey(1), at(2.0, 2.0));
        assert!(c.leave(RegionKey(0)).is_empty());
        assert_eq!(c.state().hovered(), Some(RegionKey(1)));
    }

    #[test]
    fn unbound_regions_are_inert() {
        let mut c = controller();
        assert!(c.enter(RegionKey(7), at(1.0, 1.0)).is_empty());
        assert!(!c.state().is_active());
    }

    #[test]
    fn reset_when_idle_is_a_no_op() {
        let mut c = controller();
        assert!(c.reset().is_empty());
    }

    #[test]
    fn detach_clears_hover_and_bound_regions() {
        let mut c = controller();
        c.enter(RegionKey(0), at(1.0, 1.0));
        let plan = c.detach();
        assert_eq!(plan.len(), 3);
        assert!(c.bound().is_empty());
        assert_eq!(c.state(), &HoverState::default());
    }

    #[test]
    fn tooltip_sits_below_right_of_pointer() {
        assert_eq!(place_tooltip(at(100.0, 50.0), (80.0, 40.0)), (112.0, 62.0));
    }

    #[test]
    fn tooltip_flips_near_far_edges() {
        assert_eq!(place_tooltip(at(380.0, 290.0), (80.0, 40.0)), (288.0, 238.0));
    }

    #[test]
    fn tooltip_clamps_when_container_is_too_small() {
        let tiny = PointerSample {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 20.0,
        };
        assert_eq!(place_tooltip(tiny, (80.0, 40.0)), (0.0, 0.0));
    }
}
