use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use regionmap_shared::interaction::place_tooltip;
use regionmap_shared::{
    ColorSpace, CycleOutcome, Dataset, HeatmapOptions, HoverState, LifecycleCoordinator,
    TooltipStyle, run_cycle,
};

use crate::dom::{DomSurface, PointerDispatch};
use crate::loader::FetchLoader;

type Engine = LifecycleCoordinator<DomSurface>;

/// Size used for tooltip placement; the rendered box is capped to this width.
const EXTENDED_TOOLTIP_SIZE: (f64, f64) = (200.0, 84.0);
const MINIMAL_TOOLTIP_SIZE: (f64, f64) = (160.0, 30.0);

struct HeatmapInstance {
    engine: Rc<RefCell<Engine>>,
    region_tag: String,
    color_space: ColorSpace,
}

thread_local! {
    static INSTANCES: RefCell<HashMap<u64, HeatmapInstance>> = RefCell::new(HashMap::new());
    static NEXT_INSTANCE_ID: Cell<u64> = const { Cell::new(0) };
}

fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    })
}

/// Engine for `instance`, rebuilt when the surface configuration changes.
fn engine_for(
    instance: u64,
    container: &web_sys::HtmlElement,
    region_tag: &str,
    color_space: ColorSpace,
    hover: RwSignal<HoverState>,
) -> Rc<RefCell<Engine>> {
    INSTANCES.with(|slot| {
        let mut instances = slot.borrow_mut();
        if let Some(existing) = instances.get(&instance)
            && existing.region_tag == region_tag
            && existing.color_space == color_space
        {
            return existing.engine.clone();
        }
        if let Some(old) = instances.remove(&instance) {
            old.engine.borrow_mut().teardown();
        }

        let engine = Rc::new_cyclic(|weak: &Weak<RefCell<Engine>>| {
            let weak = weak.clone();
            let dispatch: PointerDispatch = Rc::new(move |region, kind, sample| {
                let Some(engine) = weak.upgrade() else {
                    return;
                };
                let changed = {
                    let Ok(mut engine) = engine.try_borrow_mut() else {
                        return;
                    };
                    engine
                        .pointer(region, kind, sample)
                        .then(|| engine.hover().clone())
                };
                if let Some(state) = changed {
                    hover.set(state);
                }
            });
            let surface = DomSurface::new(container.clone(), region_tag, dispatch);
            RefCell::new(LifecycleCoordinator::new(surface).with_color_space(color_space))
        });

        instances.insert(
            instance,
            HeatmapInstance {
                engine: engine.clone(),
                region_tag: region_tag.to_owned(),
                color_space,
            },
        );
        engine
    })
}

fn release_instance(instance: u64) {
    let released = INSTANCES.with(|slot| slot.borrow_mut().remove(&instance));
    if let Some(released) = released {
        released.engine.borrow_mut().teardown();
    }
}

fn report_outcome(source: &str, outcome: &CycleOutcome) {
    if let CycleOutcome::Failed(e) = outcome {
        web_sys::console::warn_1(&format!("Region image {source} not rendered: {e}").into());
    }
}

/// Region image colored by `data`, with a hover tooltip.
///
/// The image is re-fetched and re-bound whenever the dataset or any option
/// that affects coloring changes; size and tooltip options only restyle.
#[component]
pub fn Heatmap(
    #[prop(into)] data: Signal<Dataset>,
    #[prop(optional, into)] options: MaybeProp<HeatmapOptions>,
) -> impl IntoView {
    let container_ref = NodeRef::<leptos::html::Div>::new();
    let hover = RwSignal::new(HoverState::default());
    let instance = next_instance_id();

    let opts = Memo::new(move |_| options.get().unwrap_or_default());
    let cycle_inputs = Memo::new(move |_| {
        let o = opts.get();
        (o.color_range, o.color_space, o.asset_url, o.region_tag)
    });

    Effect::new(move || {
        let dataset = data.get();
        let (range, color_space, asset_url, region_tag) = cycle_inputs.get();
        let Some(container) = container_ref.get() else {
            return;
        };
        let container: &web_sys::HtmlElement = &container;

        let engine = engine_for(instance, container, &region_tag, color_space, hover);
        let ticket = engine.borrow_mut().update(dataset, range);
        hover.set(HoverState::default());
        let Some(ticket) = ticket else {
            return;
        };

        spawn_local(async move {
            let outcome = run_cycle(&*engine, &FetchLoader, &asset_url, ticket).await;
            report_outcome(&asset_url, &outcome);
        });
    });

    on_cleanup(move || release_instance(instance));

    let tooltip_style = Signal::derive(move || opts.with(|o| o.tooltip_style));
    let tooltip_detail = Signal::derive(move || opts.with(|o| o.tooltip_detail.clone()));

    view! {
        <div
            class="regionmap"
            style="position: relative;"
            style:width=move || opts.with(|o| o.width.to_css())
            style:height=move || opts.with(|o| o.height.to_css())
        >
            <div node_ref=container_ref class="regionmap-image" style="width: 100%; height: 100%;" />
            <HeatmapTooltip hover=hover verbosity=tooltip_style detail=tooltip_detail />
        </div>
    }
}

fn tooltip_size(style: TooltipStyle) -> (f64, f64) {
    match style {
        TooltipStyle::Extended => EXTENDED_TOOLTIP_SIZE,
        TooltipStyle::Minimal => MINIMAL_TOOLTIP_SIZE,
    }
}

/// Inline CSS for the tooltip box at `left` / `top`.
fn tooltip_box_css(left: f64, top: f64, style: TooltipStyle) -> String {
    let (width, _) = tooltip_size(style);
    format!(
        "position: absolute; left: {left:.0}px; top: {top:.0}px; max-width: {width:.0}px; \
         pointer-events: none; z-index: 50;"
    )
}

#[component]
fn HeatmapTooltip(
    hover: RwSignal<HoverState>,
    verbosity: Signal<TooltipStyle>,
    detail: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        {move || {
            let state = hover.get();
            let Some(target) = state.target else {
                return view! { <div style="display:none;" /> }.into_any();
            };
            let style = verbosity.get();
            let (left, top) = place_tooltip(state.pointer, tooltip_size(style));
            let css = tooltip_box_css(left, top, style);

            match style {
                TooltipStyle::Minimal => view! {
                    <div class="regionmap-tooltip regionmap-tooltip-minimal" role="tooltip" style=css>
                        {target.tooltip_text()}
                    </div>
                }
                .into_any(),
                TooltipStyle::Extended => {
                    let swatch = format!("background: {};", target.fill);
                    let value = target.formatted_value();
                    view! {
                        <div class="regionmap-tooltip tooltip-animate" role="tooltip" style=css>
                            <div class="regionmap-tooltip-title">
                                <span class="regionmap-tooltip-swatch" style=swatch />
                                {target.label.clone()}
                            </div>
                            <div class="regionmap-tooltip-body">
                                <span class="regionmap-tooltip-value">{value}</span>
                                {detail.get().map(|text| view! {
                                    <span class="regionmap-tooltip-detail">{text}</span>
                                })}
                            </div>
                        </div>
                    }
                    .into_any()
                }
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_box_uses_whole_pixels() {
        let css = tooltip_box_css(112.4, 61.6, TooltipStyle::Extended);
        assert!(css.contains("left: 112px"));
        assert!(css.contains("top: 62px"));
        assert!(css.contains("max-width: 200px"));
    }

    #[test]
    fn minimal_tooltip_is_narrower() {
        let css = tooltip_box_css(0.0, 0.0, TooltipStyle::Minimal);
        assert!(css.contains("max-width: 160px"));
        assert!(css.contains("pointer-events: none"));
    }

    #[test]
    fn instance_ids_are_unique() {
        let a = next_instance_id();
        let b = next_instance_id();
        assert_ne!(a, b);
    }
}
