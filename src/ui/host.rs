/// Host browser bridge: chrome.storage, HTTP fetch, and the collaborators
/// the core only drives (particle canvas, ambient audio, page reload).
///
/// The JS side lives in host.js next to the extension pages. Its fetch
/// helper aborts after the timeout and rejects on non-2xx statuses, and
/// its storage change relay only forwards events for the sync area.
use wasm_bindgen::prelude::*;

use crate::store::{ChangeSet, JsonMap, SettingsStore, StorageArea, StoreError};

#[wasm_bindgen(module = "/host.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(area: &str, keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(area: &str, entries: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(area: &str, keys: JsValue) -> Result<(), JsValue>;

    fn onSyncStorageChanged(callback: &js_sys::Function);

    #[wasm_bindgen(catch)]
    async fn fetchJson(url: &str, timeout_ms: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn probeImage(url: &str) -> Result<(), JsValue>;

    fn startParticles();

    fn stopParticles();

    fn playAmbientSound(name: &str);

    fn stopAmbientSound();

    fn reloadPage();
}

pub const FETCH_TIMEOUT_MS: u32 = 5_000;

fn area_name(area: StorageArea) -> &'static str {
    match area {
        StorageArea::Sync => "sync",
        StorageArea::Local => "local",
    }
}

fn backend_error(err: JsValue) -> StoreError {
    StoreError::Backend(format!("{err:?}"))
}

/// chrome.storage behind the `SettingsStore` capability.
#[derive(Clone, Default)]
pub struct ChromeStore;

impl ChromeStore {
    pub fn new() -> ChromeStore {
        ChromeStore
    }
}

impl SettingsStore for ChromeStore {
    async fn get(&self, area: StorageArea, keys: &[&str]) -> Result<JsonMap, StoreError> {
        let keys_js = serde_wasm_bindgen::to_value(keys)
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        let raw = getStorage(area_name(area), keys_js)
            .await
            .map_err(backend_error)?;
        serde_wasm_bindgen::from_value(raw).map_err(|err| StoreError::Backend(err.to_string()))
    }

    async fn set(&self, area: StorageArea, entries: JsonMap) -> Result<(), StoreError> {
        let entries_js = serde_wasm_bindgen::to_value(&entries)
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        setStorage(area_name(area), entries_js)
            .await
            .map_err(backend_error)
    }

    async fn remove(&self, area: StorageArea, keys: &[&str]) -> Result<(), StoreError> {
        let keys_js = serde_wasm_bindgen::to_value(keys)
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        removeStorage(area_name(area), keys_js)
            .await
            .map_err(backend_error)
    }

    fn subscribe(&self, listener: impl Fn(&ChangeSet) + 'static) {
        let callback = Closure::<dyn Fn(JsValue)>::new(move |changes: JsValue| {
            match serde_wasm_bindgen::from_value::<ChangeSet>(changes) {
                Ok(set) => listener(&set),
                Err(err) => log::warn!("undecodable storage change event: {err}"),
            }
        });
        onSyncStorageChanged(callback.as_ref().unchecked_ref());
        // The listener lives for the rest of the page's lifetime.
        callback.forget();
    }
}

/// Timeout-bounded GET returning the response body as text. Expiry and
/// non-success statuses both surface as errors.
pub async fn fetch_json(url: &str) -> Result<String, String> {
    let body = fetchJson(url, FETCH_TIMEOUT_MS)
        .await
        .map_err(|err| format!("{err:?}"))?;
    body.as_string().ok_or_else(|| "non-text response".to_string())
}

/// Resolve once the image at `url` has loaded, so wallpaper caching only
/// happens after a successful fetch.
pub async fn probe_image(url: &str) -> Result<(), String> {
    probeImage(url).await.map_err(|err| format!("{err:?}"))
}

pub fn start_particles() {
    startParticles();
}

pub fn stop_particles() {
    stopParticles();
}

pub fn play_ambient_sound(name: &str) {
    playAmbientSound(name);
}

pub fn stop_ambient_sound() {
    stopAmbientSound();
}

pub fn reload_page() {
    reloadPage();
}
