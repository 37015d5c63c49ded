/// Change propagation policy: how a surface reacts to synced-partition
/// change events delivered by the store.
///
/// Background changes can either force a full page reload or re-apply in
/// place; both behaviors exist in the wild, so the choice is a per-surface
/// policy rather than a hardcoded rule. Feature toggles always start or
/// stop the activity in place. Keys a surface has no policy for are
/// ignored.
use crate::settings::keys;
use crate::store::ChangeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundPolicy {
    /// Discard the surface and reload the page on any background change.
    ReloadPage,
    /// Re-derive the background live, keeping the rest of the surface's
    /// in-memory state.
    #[default]
    ReapplyInPlace,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropagationPolicy {
    pub background: BackgroundPolicy,
}

/// What the surface must do in response to one change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    Reload,
    ReapplyBackground,
    SetParticles(bool),
    SetWeather(bool),
}

const BACKGROUND_KEYS: &[&str] = &[
    keys::BACKGROUND_COLOR,
    keys::BACKGROUND_GRADIENT,
    keys::BACKGROUND_TYPE,
    keys::WALLPAPER_CATEGORY,
];

/// Translate a change event into surface actions. Multiple background
/// keys changing together collapse into a single action, and a planned
/// reload subsumes everything else.
pub fn plan(changes: &ChangeSet, policy: &PropagationPolicy) -> Vec<SurfaceAction> {
    let background_changed = BACKGROUND_KEYS.iter().any(|key| changes.contains_key(*key));
    if background_changed && policy.background == BackgroundPolicy::ReloadPage {
        return vec![SurfaceAction::Reload];
    }

    let mut actions = Vec::new();
    if background_changed {
        actions.push(SurfaceAction::ReapplyBackground);
    }
    if let Some(on) = bool_change(changes, keys::SHOW_PARTICLES) {
        actions.push(SurfaceAction::SetParticles(on));
    }
    if let Some(on) = bool_change(changes, keys::SHOW_WEATHER) {
        actions.push(SurfaceAction::SetWeather(on));
    }
    actions
}

fn bool_change(changes: &ChangeSet, key: &str) -> Option<bool> {
    changes.get(key)?.new_value.as_ref()?.as_bool()
}
