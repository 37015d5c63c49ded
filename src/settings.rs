/// Settings model: the canonical shape and defaults of every synced
/// preference, plus typed read/merge-write access over the store.
///
/// Every field lives under its own key in the synced partition. Reads
/// batch all keys in one call and substitute the documented default for
/// anything missing or of unexpected shape, so callers never see a
/// partial record. Writes go through `PreferenceUpdate`, which merges
/// only the fields it names.
use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::store::{JsonMap, SettingsStore, StorageArea, StoreError};
use crate::wallpaper::WallpaperCategory;

pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// Storage keys for the synced partition, one per preference field.
pub mod keys {
    pub const BACKGROUND_TYPE: &str = "backgroundType";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const BACKGROUND_GRADIENT: &str = "backgroundGradient";
    pub const SEARCH_ENGINE: &str = "searchEngine";
    pub const SHOW_PARTICLES: &str = "showParticles";
    pub const SHOW_WEATHER: &str = "showWeather";
    pub const FOCUS_MODE: &str = "focusMode";
    pub const WALLPAPER_CATEGORY: &str = "wallpaperCategory";
    pub const QUICK_LINKS: &str = "quickLinks";
    pub const TODOS: &str = "todos";
    pub const FAVORITES: &str = "favorites";
    pub const HISTORY: &str = "history";

    pub const ALL: &[&str] = &[
        BACKGROUND_TYPE,
        BACKGROUND_COLOR,
        BACKGROUND_GRADIENT,
        SEARCH_ENGINE,
        SHOW_PARTICLES,
        SHOW_WEATHER,
        FOCUS_MODE,
        WALLPAPER_CATEGORY,
        QUICK_LINKS,
        TODOS,
        FAVORITES,
        HISTORY,
    ];
}

/// Which background field is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Color,
    Gradient,
    Wallpaper,
}

/// Search engine registry: key, display name, query URL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    DuckDuckGo,
    Bing,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 3] = [
        SearchEngine::Google,
        SearchEngine::DuckDuckGo,
        SearchEngine::Bing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
            SearchEngine::Bing => "Bing",
        }
    }

    pub fn query_url(&self, query: &str) -> String {
        let base = match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com/?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
        };
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{base}{encoded}")
    }

    /// Cycle order for the search-box engine toggle.
    pub fn next(&self) -> SearchEngine {
        match self {
            SearchEngine::Google => SearchEngine::DuckDuckGo,
            SearchEngine::DuckDuckGo => SearchEngine::Bing,
            SearchEngine::Bing => SearchEngine::Google,
        }
    }
}

/// A quick link tile on the new-tab page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub name: String,
    pub url: String,
}

impl QuickLink {
    pub fn new(name: &str, url: &str) -> QuickLink {
        QuickLink {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    /// Favicon service URL for the link's host; `None` when the stored URL
    /// does not parse, in which case the UI hides the icon element.
    pub fn favicon_url(&self) -> Option<String> {
        let parsed = Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        Some(format!(
            "https://www.google.com/s2/favicons?domain={host}&sz=64"
        ))
    }
}

/// Validate a user-supplied quick link URL. Only http/https are accepted.
pub fn validate_link_url(input: &str) -> Option<String> {
    let parsed = Url::parse(input.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
}

impl TodoItem {
    pub fn new(text: &str) -> TodoItem {
        TodoItem {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwatchKind {
    Color,
    Gradient,
}

/// A favorites/history entry: a color or gradient value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    #[serde(rename = "type")]
    pub kind: SwatchKind,
    pub value: String,
}

impl Swatch {
    pub fn color(value: &str) -> Swatch {
        Swatch {
            kind: SwatchKind::Color,
            value: value.to_string(),
        }
    }

    pub fn gradient(value: &str) -> Swatch {
        Swatch {
            kind: SwatchKind::Gradient,
            value: value.to_string(),
        }
    }
}

/// The full preference record. Field names match the storage keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub background_type: BackgroundType,
    pub background_color: String,
    pub background_gradient: Option<String>,
    pub search_engine: SearchEngine,
    pub show_particles: bool,
    pub show_weather: bool,
    pub focus_mode: bool,
    pub wallpaper_category: WallpaperCategory,
    pub quick_links: Vec<QuickLink>,
    pub todos: Vec<TodoItem>,
    pub favorites: Vec<Swatch>,
    pub history: Vec<Swatch>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            background_type: BackgroundType::Color,
            background_color: DEFAULT_COLOR.to_string(),
            background_gradient: None,
            search_engine: SearchEngine::Google,
            show_particles: true,
            show_weather: true,
            focus_mode: false,
            wallpaper_category: WallpaperCategory::Nature,
            quick_links: default_quick_links(),
            todos: Vec::new(),
            favorites: Vec::new(),
            history: Vec::new(),
        }
    }
}

pub fn default_quick_links() -> Vec<QuickLink> {
    vec![
        QuickLink::new("Gmail", "https://mail.google.com"),
        QuickLink::new("YouTube", "https://youtube.com"),
        QuickLink::new("GitHub", "https://github.com"),
        QuickLink::new("Twitter", "https://twitter.com"),
    ]
}

impl Preferences {
    /// Batched read of every preference key. Missing keys and values of
    /// unexpected shape both fall back to the field's default.
    pub async fn load(store: &impl SettingsStore) -> Result<Preferences, StoreError> {
        let mut raw = store.get(StorageArea::Sync, keys::ALL).await?;
        let defaults = Preferences::default();
        Ok(Preferences {
            background_type: field_or(&mut raw, keys::BACKGROUND_TYPE, defaults.background_type),
            background_color: field_or(&mut raw, keys::BACKGROUND_COLOR, defaults.background_color),
            background_gradient: field_or(&mut raw, keys::BACKGROUND_GRADIENT, None),
            search_engine: field_or(&mut raw, keys::SEARCH_ENGINE, defaults.search_engine),
            show_particles: field_or(&mut raw, keys::SHOW_PARTICLES, true),
            show_weather: field_or(&mut raw, keys::SHOW_WEATHER, true),
            focus_mode: field_or(&mut raw, keys::FOCUS_MODE, false),
            wallpaper_category: field_or(
                &mut raw,
                keys::WALLPAPER_CATEGORY,
                defaults.wallpaper_category,
            ),
            quick_links: field_or(&mut raw, keys::QUICK_LINKS, defaults.quick_links),
            todos: field_or(&mut raw, keys::TODOS, Vec::new()),
            favorites: field_or(&mut raw, keys::FAVORITES, Vec::new()),
            history: field_or(&mut raw, keys::HISTORY, Vec::new()),
        })
    }

    fn to_entries(&self) -> JsonMap {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => JsonMap::new(),
        }
    }
}

fn field_or<T: DeserializeOwned>(raw: &mut JsonMap, key: &str, fallback: T) -> T {
    match raw.remove(key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("stored value for {key} has unexpected shape ({err}), using default");
                fallback
            }
        },
        None => fallback,
    }
}

/// Typed partial update, merged into the synced partition on `apply`.
#[derive(Debug, Default)]
pub struct PreferenceUpdate {
    entries: JsonMap,
}

impl PreferenceUpdate {
    pub fn new() -> PreferenceUpdate {
        PreferenceUpdate::default()
    }

    /// Select a solid color background. Clears any gradient so the record
    /// never names a stale authoritative field.
    pub fn solid_color(self, color: &str) -> PreferenceUpdate {
        self.put(keys::BACKGROUND_COLOR, json!(color))
            .put(keys::BACKGROUND_TYPE, json!(BackgroundType::Color))
            .put(keys::BACKGROUND_GRADIENT, serde_json::Value::Null)
    }

    pub fn gradient(self, gradient: &str) -> PreferenceUpdate {
        self.put(keys::BACKGROUND_GRADIENT, json!(gradient))
            .put(keys::BACKGROUND_TYPE, json!(BackgroundType::Gradient))
    }

    pub fn wallpaper(self, category: WallpaperCategory) -> PreferenceUpdate {
        self.put(keys::WALLPAPER_CATEGORY, json!(category))
            .put(keys::BACKGROUND_TYPE, json!(BackgroundType::Wallpaper))
    }

    pub fn search_engine(self, engine: SearchEngine) -> PreferenceUpdate {
        self.put(keys::SEARCH_ENGINE, json!(engine))
    }

    pub fn show_particles(self, on: bool) -> PreferenceUpdate {
        self.put(keys::SHOW_PARTICLES, json!(on))
    }

    pub fn show_weather(self, on: bool) -> PreferenceUpdate {
        self.put(keys::SHOW_WEATHER, json!(on))
    }

    pub fn focus_mode(self, on: bool) -> PreferenceUpdate {
        self.put(keys::FOCUS_MODE, json!(on))
    }

    pub fn quick_links(self, links: &[QuickLink]) -> PreferenceUpdate {
        self.put(keys::QUICK_LINKS, json!(links))
    }

    pub fn todos(self, todos: &[TodoItem]) -> PreferenceUpdate {
        self.put(keys::TODOS, json!(todos))
    }

    pub fn favorites(self, favorites: &[Swatch]) -> PreferenceUpdate {
        self.put(keys::FAVORITES, json!(favorites))
    }

    pub fn history(self, history: &[Swatch]) -> PreferenceUpdate {
        self.put(keys::HISTORY, json!(history))
    }

    fn put(mut self, key: &str, value: serde_json::Value) -> PreferenceUpdate {
        self.entries.insert(key.to_string(), value);
        self
    }

    pub async fn apply(self, store: &impl SettingsStore) -> Result<(), StoreError> {
        store.set(StorageArea::Sync, self.entries).await
    }
}

/// Rewrite every preference field to its default.
pub async fn reset(store: &impl SettingsStore) -> Result<(), StoreError> {
    store
        .set(StorageArea::Sync, Preferences::default().to_entries())
        .await
}

static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
static FIRST_HEX: OnceLock<Regex> = OnceLock::new();

/// Normalize a user-supplied hex color: trim, auto-prefix a missing `#`,
/// require exactly six hex digits, uppercase the result.
pub fn normalize_hex_color(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let candidate = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };
    let pattern = HEX_COLOR.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid pattern"));
    pattern
        .is_match(&candidate)
        .then(|| candidate.to_ascii_uppercase())
}

/// Classify a background value (color or gradient string) as light or
/// dark from the luminance of its first `#RRGGBB` color. Values without
/// one are treated as light.
pub fn is_light_background(background: &str) -> bool {
    let pattern =
        FIRST_HEX.get_or_init(|| Regex::new(r"#([0-9A-Fa-f]{6})").expect("valid pattern"));
    let Some(caps) = pattern.captures(background) else {
        return true;
    };
    let hex = &caps[1];
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0) as f32;
    let luminance = 0.299 * channel(0) + 0.587 * channel(2) + 0.114 * channel(4);
    luminance > 128.0
}
