/// One-click popup presets: a gradient plus the matching feature toggles.
use crate::settings::PreferenceUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub label: &'static str,
    pub gradient: &'static str,
    pub particles: bool,
    pub weather: bool,
}

pub static PRESETS: [Preset; 6] = [
    Preset {
        id: "focus",
        label: "Focus",
        gradient: "linear-gradient(135deg, #141E30 0%, #243B55 100%)",
        particles: false,
        weather: false,
    },
    Preset {
        id: "calm",
        label: "Calm",
        gradient: "linear-gradient(135deg, #C6F6D5 0%, #E6FFFA 100%)",
        particles: true,
        weather: true,
    },
    Preset {
        id: "energy",
        label: "Energy",
        gradient: "linear-gradient(135deg, #FA709A 0%, #FEE140 100%)",
        particles: true,
        weather: true,
    },
    Preset {
        id: "sunset",
        label: "Sunset",
        gradient: "linear-gradient(135deg, #FAD961 0%, #F76B1C 100%)",
        particles: true,
        weather: true,
    },
    Preset {
        id: "midnight",
        label: "Midnight",
        gradient: "linear-gradient(135deg, #0F0C29 0%, #302B63 50%, #24243E 100%)",
        particles: true,
        weather: false,
    },
    Preset {
        id: "ocean",
        label: "Ocean",
        gradient: "linear-gradient(135deg, #4FACFE 0%, #00F2FE 100%)",
        particles: true,
        weather: true,
    },
];

pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.id == id)
}

/// The partial update a preset card applies in one write.
pub fn update_for(preset: &Preset) -> PreferenceUpdate {
    PreferenceUpdate::new()
        .gradient(preset.gradient)
        .show_particles(preset.particles)
        .show_weather(preset.weather)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{BackgroundType, Preferences};
    use crate::store::MemoryStore;
    use futures::executor::block_on;

    #[test]
    fn test_find_known_and_unknown() {
        assert_eq!(find("focus").map(|p| p.label), Some("Focus"));
        assert_eq!(find("party"), None);
    }

    #[test]
    fn test_preset_applies_gradient_and_toggles_in_one_write() {
        let store = MemoryStore::new();
        let preset = find("focus").unwrap();

        block_on(update_for(preset).apply(&store)).unwrap();

        let prefs = block_on(Preferences::load(&store)).unwrap();
        assert_eq!(prefs.background_type, BackgroundType::Gradient);
        assert_eq!(prefs.background_gradient.as_deref(), Some(preset.gradient));
        assert!(!prefs.show_particles);
        assert!(!prefs.show_weather);
    }

    #[test]
    fn test_preset_ids_are_unique() {
        for preset in &PRESETS {
            assert_eq!(PRESETS.iter().filter(|p| p.id == preset.id).count(), 1);
        }
    }
}
