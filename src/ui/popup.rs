/// Popup settings panel: swatches, presets, favorites, history, toggles.
///
/// Every control writes through the synced store and re-reads the record
/// afterwards, so the popup never trusts its own view of the state. The
/// new tab page picks the same writes up through change events.
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::bounded_list::{self, AppendOutcome};
use crate::presets::{self, Preset};
use crate::settings::{
    BackgroundType, Preferences, PreferenceUpdate, Swatch, SwatchKind, normalize_hex_color,
};
use crate::store::SettingsStore;
use crate::ui::components::{SwatchButton, Toast, ToggleRow};
use crate::ui::host::ChromeStore;
use crate::wallpaper::WallpaperCategory;

const TOAST_MS: i32 = 2_000;

const COLOR_SWATCHES: &[(&str, &str)] = &[
    ("#FFFFFF", "White"),
    ("#F7F1E3", "Cream"),
    ("#FFD6E0", "Blush"),
    ("#C9E4FF", "Sky"),
    ("#D4F1C5", "Mint"),
    ("#E2D6FF", "Lavender"),
    ("#2C3E50", "Slate"),
    ("#1A1A2E", "Midnight"),
];

const GRADIENT_SWATCHES: &[(&str, &str)] = &[
    (
        "linear-gradient(135deg, #FF9A8B 0%, #FF6A88 55%, #FF99AC 100%)",
        "Sunrise",
    ),
    (
        "linear-gradient(135deg, #00C9FF 0%, #92FE9D 100%)",
        "Aurora",
    ),
    (
        "linear-gradient(135deg, #667EEA 0%, #764BA2 100%)",
        "Royal",
    ),
    (
        "linear-gradient(135deg, #2C3E50 0%, #FD746C 100%)",
        "Dusk",
    ),
    (
        "linear-gradient(135deg, #76B852 0%, #8DC26F 100%)",
        "Meadow",
    ),
    (
        "linear-gradient(135deg, #F83600 0%, #F9D423 100%)",
        "Flame",
    ),
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Colors,
    Presets,
    Settings,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Colors, Tab::Presets, Tab::Settings];

    fn label(&self) -> &'static str {
        match self {
            Tab::Colors => "Colors",
            Tab::Presets => "Presets",
            Tab::Settings => "Settings",
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let store = use_memo((), |_| ChromeStore::new());
    let prefs = use_state(|| None::<Preferences>);
    let tab = use_state(|| Tab::Colors);
    let hex_input = use_state(String::new);
    let toast = use_state(|| None::<String>);

    {
        let store = store.clone();
        let prefs = prefs.clone();
        use_effect_with((), move |_| {
            {
                let store = store.clone();
                let prefs = prefs.clone();
                spawn_local(async move {
                    refresh(&store, &prefs).await;
                });
            }
            // Re-read the record on every change event, so edits made
            // on another device or surface show up here too.
            let listener_store = store.clone();
            store.subscribe(move |_| {
                let store = listener_store.clone();
                let prefs = prefs.clone();
                spawn_local(async move {
                    refresh(&store, &prefs).await;
                });
            });
        });
    }

    let Some(current) = (*prefs).clone() else {
        return html! { <div class="popup popup-loading"></div> };
    };

    let apply_swatch = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |(swatch, record, message): (Swatch, bool, String)| {
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                if apply_background(&store, &prefs, swatch, record).await {
                    show_toast(&toast, &message);
                }
            });
        })
    };

    let on_custom_apply = {
        let hex_input = hex_input.clone();
        let toast = toast.clone();
        let apply_swatch = apply_swatch.clone();
        Callback::from(move |_| {
            let Some(color) = normalize_hex_color(&hex_input) else {
                show_toast(&toast, "Invalid hex color!");
                return;
            };
            apply_swatch.emit((
                Swatch::color(&color),
                true,
                "Custom color applied!".to_string(),
            ));
        })
    };

    let on_add_favorite = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |_| {
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                add_favorite(&store, &prefs, &toast).await;
            });
        })
    };

    let on_remove_favorite = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |index: usize| {
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                remove_favorite(&store, &prefs, index).await;
                show_toast(&toast, "Removed from favorites");
            });
        })
    };

    let on_preset = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |preset: &'static Preset| {
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                if let Err(err) = presets::update_for(preset).apply(&*store).await {
                    log::warn!("failed to apply preset: {err}");
                    return;
                }
                refresh(&store, &prefs).await;
                show_toast(&toast, &format!("{} mode activated!", preset.label));
            });
        })
    };

    let on_particles = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |on: bool| {
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                if let Err(err) = PreferenceUpdate::new().show_particles(on).apply(&*store).await {
                    log::warn!("failed to save particles toggle: {err}");
                    return;
                }
                refresh(&store, &prefs).await;
                show_toast(
                    &toast,
                    if on { "Particles enabled" } else { "Particles disabled" },
                );
            });
        })
    };

    let on_weather = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |on: bool| {
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                if let Err(err) = PreferenceUpdate::new().show_weather(on).apply(&*store).await {
                    log::warn!("failed to save weather toggle: {err}");
                    return;
                }
                refresh(&store, &prefs).await;
                show_toast(
                    &toast,
                    if on { "Weather enabled" } else { "Weather disabled" },
                );
            });
        })
    };

    let on_wallpaper_category = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let Some(category) = WallpaperCategory::from_keyword(&select.value()) else {
                return;
            };
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                if let Err(err) = PreferenceUpdate::new().wallpaper(category).apply(&*store).await {
                    log::warn!("failed to save wallpaper category: {err}");
                    return;
                }
                refresh(&store, &prefs).await;
                show_toast(&toast, &format!("{} wallpaper applied!", category.label()));
            });
        })
    };

    let on_reset = {
        let store = store.clone();
        let prefs = prefs.clone();
        let toast = toast.clone();
        Callback::from(move |_| {
            let store = store.clone();
            let prefs = prefs.clone();
            let toast = toast.clone();
            spawn_local(async move {
                if let Err(err) = crate::settings::reset(&*store).await {
                    log::warn!("reset failed: {err}");
                    return;
                }
                refresh(&store, &prefs).await;
                show_toast(&toast, "Reset to default");
            });
        })
    };

    let current_background = match (current.background_type, &current.background_gradient) {
        (BackgroundType::Gradient, Some(gradient)) => gradient.clone(),
        _ => current.background_color.clone(),
    };

    html! {
        <div class="popup">
            <header class="popup-header">
                <span class="popup-title">{"Aura"}</span>
                <span
                    class="current-color"
                    style={format!("background: {current_background};")}
                    title={current_background.clone()}
                />
            </header>

            <nav class="tabs">
                {for Tab::ALL.iter().map(|candidate| {
                    let tab = tab.clone();
                    let candidate = *candidate;
                    let class = if *tab == candidate { "tab active" } else { "tab" };
                    html! {
                        <button {class} onclick={Callback::from(move |_| tab.set(candidate))}>
                            {candidate.label()}
                        </button>
                    }
                })}
            </nav>

            {match *tab {
                Tab::Colors => colors_tab(
                    &current,
                    &hex_input,
                    apply_swatch.clone(),
                    on_custom_apply,
                    on_add_favorite,
                    on_remove_favorite,
                ),
                Tab::Presets => presets_tab(on_preset),
                Tab::Settings => settings_tab(
                    &current,
                    on_particles,
                    on_weather,
                    on_wallpaper_category,
                    on_reset,
                ),
            }}

            <Toast message={(*toast).clone()} />
        </div>
    }
}

fn colors_tab(
    current: &Preferences,
    hex_input: &UseStateHandle<String>,
    apply_swatch: Callback<(Swatch, bool, String)>,
    on_custom_apply: Callback<MouseEvent>,
    on_add_favorite: Callback<MouseEvent>,
    on_remove_favorite: Callback<usize>,
) -> Html {
    let hex_oninput = {
        let hex_input = hex_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                hex_input.set(input.value());
            }
        })
    };

    html! {
        <div class="tab-panel">
            <section class="swatch-section">
                <h2>{"Solid colors"}</h2>
                <div class="swatch-grid">
                    {for COLOR_SWATCHES.iter().map(|(value, name)| {
                        let selected = current.background_type == BackgroundType::Color
                            && current.background_color.eq_ignore_ascii_case(value);
                        let onclick = {
                            let apply_swatch = apply_swatch.clone();
                            let value = *value;
                            let name = *name;
                            Callback::from(move |_| {
                                apply_swatch.emit((
                                    Swatch::color(value),
                                    true,
                                    format!("{name} applied!"),
                                ));
                            })
                        };
                        html! {
                            <SwatchButton
                                background={*value}
                                title={*name}
                                {selected}
                                {onclick}
                            />
                        }
                    })}
                </div>
            </section>

            <section class="swatch-section">
                <h2>{"Gradients"}</h2>
                <div class="swatch-grid">
                    {for GRADIENT_SWATCHES.iter().map(|(value, name)| {
                        let selected = current.background_type == BackgroundType::Gradient
                            && current.background_gradient.as_deref() == Some(*value);
                        let onclick = {
                            let apply_swatch = apply_swatch.clone();
                            let value = *value;
                            let name = *name;
                            Callback::from(move |_| {
                                apply_swatch.emit((
                                    Swatch::gradient(value),
                                    true,
                                    format!("{name} applied!"),
                                ));
                            })
                        };
                        html! {
                            <SwatchButton
                                background={*value}
                                title={*name}
                                {selected}
                                {onclick}
                            />
                        }
                    })}
                </div>
            </section>

            <section class="custom-color">
                <input
                    class="hex-input"
                    placeholder="#RRGGBB"
                    value={(**hex_input).clone()}
                    oninput={hex_oninput}
                />
                <button onclick={on_custom_apply}>{"Apply"}</button>
                <button class="favorite-btn" onclick={on_add_favorite} title="Add current to favorites">
                    {"★"}
                </button>
            </section>

            <section class="swatch-section">
                <h2>{"Favorites"}</h2>
                <div class="swatch-grid">
                    {for current.favorites.iter().enumerate().map(|(index, fav)| {
                        let onclick = {
                            let apply_swatch = apply_swatch.clone();
                            let fav = fav.clone();
                            Callback::from(move |_| {
                                apply_swatch.emit((
                                    fav.clone(),
                                    false,
                                    "Favorite applied!".to_string(),
                                ));
                            })
                        };
                        let onremove = {
                            let on_remove_favorite = on_remove_favorite.clone();
                            Callback::from(move |_| on_remove_favorite.emit(index))
                        };
                        html! {
                            <SwatchButton
                                background={fav.value.clone()}
                                title={swatch_title(fav)}
                                selected=false
                                {onclick}
                                {onremove}
                            />
                        }
                    })}
                </div>
            </section>

            <section class="swatch-section">
                <h2>{"Recent"}</h2>
                <div class="swatch-grid">
                    {for current.history.iter().map(|item| {
                        let onclick = {
                            let apply_swatch = apply_swatch.clone();
                            let item = item.clone();
                            Callback::from(move |_| {
                                apply_swatch.emit((
                                    item.clone(),
                                    false,
                                    "Color applied!".to_string(),
                                ));
                            })
                        };
                        html! {
                            <SwatchButton
                                background={item.value.clone()}
                                title={swatch_title(item)}
                                selected=false
                                {onclick}
                            />
                        }
                    })}
                </div>
            </section>
        </div>
    }
}

fn presets_tab(on_preset: Callback<&'static Preset>) -> Html {
    html! {
        <div class="tab-panel">
            <div class="preset-grid">
                {for presets::PRESETS.iter().map(|preset| {
                    let onclick = {
                        let on_preset = on_preset.clone();
                        Callback::from(move |_| on_preset.emit(preset))
                    };
                    html! {
                        <button
                            class="preset-card"
                            style={format!("background: {};", preset.gradient)}
                            {onclick}
                        >
                            {preset.label}
                        </button>
                    }
                })}
            </div>
        </div>
    }
}

fn settings_tab(
    current: &Preferences,
    on_particles: Callback<bool>,
    on_weather: Callback<bool>,
    on_wallpaper_category: Callback<Event>,
    on_reset: Callback<MouseEvent>,
) -> Html {
    html! {
        <div class="tab-panel">
            <ToggleRow
                label="Particles"
                checked={current.show_particles}
                onchange={on_particles}
            />
            <ToggleRow
                label="Weather"
                checked={current.show_weather}
                onchange={on_weather}
            />

            <div class="setting-row">
                <span class="setting-label">{"Wallpaper"}</span>
                <select class="category-select" onchange={on_wallpaper_category}>
                    {for WallpaperCategory::ALL.iter().map(|category| {
                        let selected = current.background_type == BackgroundType::Wallpaper
                            && current.wallpaper_category == *category;
                        html! {
                            <option value={category.keyword()} {selected}>
                                {category.label()}
                            </option>
                        }
                    })}
                </select>
            </div>

            <button class="reset-btn" onclick={on_reset}>{"Reset to default"}</button>
        </div>
    }
}

fn swatch_title(swatch: &Swatch) -> String {
    match swatch.kind {
        SwatchKind::Gradient => "Gradient".to_string(),
        SwatchKind::Color => swatch.value.clone(),
    }
}

fn show_toast(toast: &UseStateHandle<Option<String>>, message: &str) {
    toast.set(Some(message.to_string()));
    let toast = toast.clone();
    let clear = Closure::once_into_js(move || toast.set(None));
    if let Some(window) = web_sys::window() {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            clear.unchecked_ref(),
            TOAST_MS,
        );
    }
}

async fn refresh(store: &ChromeStore, prefs: &UseStateHandle<Option<Preferences>>) {
    match Preferences::load(store).await {
        Ok(loaded) => prefs.set(Some(loaded)),
        Err(err) => log::warn!("failed to load preferences: {err}"),
    }
}

/// Write a background selection and, when asked, promote it in the
/// recent-colors list. Returns false when the write failed.
async fn apply_background(
    store: &ChromeStore,
    prefs: &UseStateHandle<Option<Preferences>>,
    swatch: Swatch,
    record_history: bool,
) -> bool {
    let update = match swatch.kind {
        SwatchKind::Color => PreferenceUpdate::new().solid_color(&swatch.value),
        SwatchKind::Gradient => PreferenceUpdate::new().gradient(&swatch.value),
    };
    if let Err(err) = update.apply(store).await {
        log::warn!("failed to save background: {err}");
        return false;
    }

    if record_history {
        match Preferences::load(store).await {
            Ok(loaded) => {
                let mut history = loaded.history;
                let _ = bounded_list::append(&mut history, swatch, &bounded_list::HISTORY, |a, b| {
                    a == b
                });
                if let Err(err) = PreferenceUpdate::new().history(&history).apply(store).await {
                    log::warn!("failed to save history: {err}");
                }
            }
            Err(err) => log::warn!("failed to load history: {err}"),
        }
    }

    refresh(store, prefs).await;
    true
}

async fn add_favorite(
    store: &ChromeStore,
    prefs: &UseStateHandle<Option<Preferences>>,
    toast: &UseStateHandle<Option<String>>,
) {
    let loaded = match Preferences::load(store).await {
        Ok(loaded) => loaded,
        Err(err) => {
            log::warn!("failed to load favorites: {err}");
            return;
        }
    };

    let swatch = match (loaded.background_type, &loaded.background_gradient) {
        (BackgroundType::Gradient, Some(gradient)) => Swatch::gradient(gradient),
        _ => Swatch::color(&loaded.background_color),
    };

    let mut favorites = loaded.favorites;
    match bounded_list::append(&mut favorites, swatch, &bounded_list::FAVORITES, |a, b| a == b) {
        AppendOutcome::Rejected => {
            show_toast(toast, "Already in favorites!");
        }
        _ => {
            if let Err(err) = PreferenceUpdate::new().favorites(&favorites).apply(store).await {
                log::warn!("failed to save favorites: {err}");
                return;
            }
            refresh(store, prefs).await;
            show_toast(toast, "Added to favorites!");
        }
    }
}

async fn remove_favorite(
    store: &ChromeStore,
    prefs: &UseStateHandle<Option<Preferences>>,
    index: usize,
) {
    let loaded = match Preferences::load(store).await {
        Ok(loaded) => loaded,
        Err(err) => {
            log::warn!("failed to load favorites: {err}");
            return;
        }
    };

    let mut favorites = loaded.favorites;
    if bounded_list::remove_at(&mut favorites, index).is_none() {
        return;
    }
    if let Err(err) = PreferenceUpdate::new().favorites(&favorites).apply(store).await {
        log::warn!("failed to save favorites: {err}");
        return;
    }
    refresh(store, prefs).await;
}
