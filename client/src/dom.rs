use std::rc::Rc;

use regionmap_shared::{Emphasis, PointerKind, PointerSample, RegionKey, RegionSurface};
use regionmap_shared::surface::RegionInfo;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CssStyleDeclaration, Element, HtmlElement, MouseEvent};

pub(crate) type PointerDispatch = Rc<dyn Fn(RegionKey, PointerKind, PointerSample)>;

const REGION_TRANSITION: &str = "all 0.3s ease-out";
const EMPHASIS_FILTER: &str = "brightness(1.2) drop-shadow(0 0 8px rgba(254, 93, 33, 0.5))";

/// Inline style properties applied for each emphasis level.
pub(crate) fn emphasis_style(emphasis: Emphasis) -> [(&'static str, &'static str); 3] {
    match emphasis {
        Emphasis::Neutral => [("transform", "scale(1)"), ("filter", "none"), ("opacity", "1")],
        Emphasis::Emphasized => [
            ("transform", "scale(1.02)"),
            ("filter", EMPHASIS_FILTER),
            ("opacity", "1"),
        ],
        Emphasis::Muted => [("transform", "scale(1)"), ("filter", "none"), ("opacity", "0.3")],
    }
}

/// A registered DOM listener. Dropping it frees the JS closure, so it must
/// outlive its registration.
pub(crate) struct DomListener {
    callback: Closure<dyn Fn(MouseEvent)>,
}

/// `RegionSurface` over a live container element.
pub(crate) struct DomSurface {
    container: HtmlElement,
    region_tag: String,
    elements: Vec<Element>,
    dispatch: PointerDispatch,
}

impl DomSurface {
    pub(crate) fn new(container: HtmlElement, region_tag: &str, dispatch: PointerDispatch) -> Self {
        Self {
            container,
            region_tag: region_tag.to_owned(),
            elements: Vec::new(),
            dispatch,
        }
    }

    fn collect_regions(&mut self) {
        self.elements.clear();
        let Ok(nodes) = self.container.query_selector_all(&self.region_tag) else {
            web_sys::console::warn_1(
                &format!("invalid region selector: {}", self.region_tag).into(),
            );
            return;
        };
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                self.elements.push(el);
            }
        }
    }

    fn element(&self, region: RegionKey) -> Option<&Element> {
        self.elements.get(region.0)
    }
}

fn style_of(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(svg) = el.dyn_ref::<web_sys::SvgElement>() {
        return Some(svg.style());
    }
    el.dyn_ref::<HtmlElement>().map(|html| html.style())
}

fn pointer_sample(container: &HtmlElement, e: &MouseEvent) -> PointerSample {
    let rect = container.get_bounding_client_rect();
    PointerSample {
        x: e.client_x() as f64 - rect.left(),
        y: e.client_y() as f64 - rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

impl RegionSurface for DomSurface {
    type Listener = DomListener;

    fn inject(&mut self, markup: &str) {
        self.container.set_inner_html(markup);
        self.collect_regions();
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.container.set_inner_html("");
    }

    fn regions(&self) -> Vec<RegionInfo> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, el)| RegionInfo {
                key: RegionKey(i),
                id: el.get_attribute("id"),
                name: el.get_attribute("name"),
            })
            .collect()
    }

    fn paint(&mut self, region: RegionKey, fill: &str, label: &str) {
        let Some(el) = self.element(region) else {
            return;
        };
        el.set_attribute("fill", fill).ok();
        el.set_attribute("aria-label", label).ok();
        el.set_attribute("role", "img").ok();
        if let Some(style) = style_of(el) {
            style.set_property("transition", REGION_TRANSITION).ok();
            style.set_property("transform-box", "fill-box").ok();
            style.set_property("transform-origin", "center").ok();
        }
    }

    fn set_emphasis(&mut self, region: RegionKey, emphasis: Emphasis) {
        let Some(style) = self.element(region).and_then(style_of) else {
            return;
        };
        for (prop, value) in emphasis_style(emphasis) {
            style.set_property(prop, value).ok();
        }
    }

    fn listen(&mut self, region: RegionKey, kind: PointerKind) -> DomListener {
        let dispatch = self.dispatch.clone();
        let container = self.container.clone();
        let callback = Closure::<dyn Fn(MouseEvent)>::new(move |e: MouseEvent| {
            dispatch(region, kind, pointer_sample(&container, &e));
        });
        if let Some(el) = self.element(region) {
            el.add_event_listener_with_callback(
                kind.event_name(),
                callback.as_ref().unchecked_ref(),
            )
            .ok();
        }
        DomListener { callback }
    }

    fn unlisten(&mut self, region: RegionKey, kind: PointerKind, listener: DomListener) {
        if let Some(el) = self.element(region) {
            el.remove_event_listener_with_callback(
                kind.event_name(),
                listener.callback.as_ref().unchecked_ref(),
            )
            .ok();
        }
    }
}
