use gloo_storage::Storage;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use regionmap_shared::{ColorRange, ColorSpace, Dataset, HeatmapOptions, Rgba, TooltipStyle};

use crate::heatmap::Heatmap;

const SETTINGS_KEY: &str = "regionmap_settings";
const SAMPLE_DATA_URL: &str = "/data/sample.json";

fn remove_loading_shell() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

/// Named gradient the demo can switch between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum Palette {
    #[default]
    Ember,
    Ocean,
    Forest,
}

impl Palette {
    const ALL: [Palette; 3] = [Palette::Ember, Palette::Ocean, Palette::Forest];

    fn label(self) -> &'static str {
        match self {
            Palette::Ember => "Ember",
            Palette::Ocean => "Ocean",
            Palette::Forest => "Forest",
        }
    }

    fn range(self) -> ColorRange {
        match self {
            Palette::Ember => ColorRange::default(),
            Palette::Ocean => ColorRange::new(Rgba::rgb(224, 243, 255), Rgba::rgb(8, 69, 148)),
            Palette::Forest => ColorRange::new(Rgba::rgb(237, 248, 233), Rgba::rgb(0, 109, 44)),
        }
    }

    fn next(self) -> Palette {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    palette: Palette,
    color_space: ColorSpace,
    tooltip_style: TooltipStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette: Palette::Ember,
            color_space: ColorSpace::Rgb,
            tooltip_style: TooltipStyle::Extended,
        }
    }
}

impl Settings {
    fn heatmap_options(&self) -> HeatmapOptions {
        HeatmapOptions {
            height: "70vh".into(),
            color_range: self.palette.range(),
            color_space: self.color_space,
            tooltip_style: self.tooltip_style,
            ..HeatmapOptions::default()
        }
    }
}

async fn fetch_dataset() -> Result<Dataset, String> {
    let resp = gloo_net::http::Request::get(SAMPLE_DATA_URL)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<Dataset>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

#[component]
pub fn App() -> impl IntoView {
    let saved: Settings = gloo_storage::LocalStorage::get(SETTINGS_KEY).unwrap_or_default();
    let palette = RwSignal::new(saved.palette);
    let color_space = RwSignal::new(saved.color_space);
    let tooltip_style = RwSignal::new(saved.tooltip_style);

    let dataset: RwSignal<Dataset> = RwSignal::new(Dataset::new());
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let fetch_nonce = RwSignal::new(0u64);

    let settings = Memo::new(move |_| Settings {
        palette: palette.get(),
        color_space: color_space.get(),
        tooltip_style: tooltip_style.get(),
    });

    // Persist settings to localStorage on any change
    Effect::new(move || {
        let _ = gloo_storage::LocalStorage::set(SETTINGS_KEY, settings.get());
    });

    Effect::new(move || {
        fetch_nonce.track();
        spawn_local(async move {
            match fetch_dataset().await {
                Ok(data) => {
                    load_error.set(None);
                    dataset.set(data);
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("Sample data unavailable: {e}").into());
                    load_error.set(Some(e));
                }
            }
            remove_loading_shell();
        });
    });

    let options = Signal::derive(move || settings.with(Settings::heatmap_options));

    view! {
        <main class="regionmap-demo">
            <header class="regionmap-toolbar">
                <h1>"Region heatmap"</h1>
                <button on:click=move |_| palette.update(|p| *p = p.next())>
                    {move || format!("Palette: {}", palette.get().label())}
                </button>
                <button on:click=move |_| {
                    color_space.update(|s| {
                        *s = match s {
                            ColorSpace::Rgb => ColorSpace::Hsl,
                            ColorSpace::Hsl => ColorSpace::Rgb,
                        }
                    })
                }>
                    {move || match color_space.get() {
                        ColorSpace::Rgb => "Blend: RGB",
                        ColorSpace::Hsl => "Blend: HSL",
                    }}
                </button>
                <button on:click=move |_| {
                    tooltip_style.update(|s| {
                        *s = match s {
                            TooltipStyle::Extended => TooltipStyle::Minimal,
                            TooltipStyle::Minimal => TooltipStyle::Extended,
                        }
                    })
                }>
                    {move || match tooltip_style.get() {
                        TooltipStyle::Extended => "Tooltip: detailed",
                        TooltipStyle::Minimal => "Tooltip: compact",
                    }}
                </button>
                <button on:click=move |_| fetch_nonce.update(|n| *n += 1)>"Reload data"</button>
            </header>
            {move || load_error.get().map(|e| view! {
                <p class="regionmap-error">{format!("Could not load sample data ({e}).")}</p>
            })}
            <Heatmap data=dataset options=options />
        </main>
    }
}
