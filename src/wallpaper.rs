/// Wallpaper collections and image URL selection
use serde::{Deserialize, Serialize};

pub const ATTRIBUTION: &str = "Photo via Lorem Picsum";

/// Fixed registry of wallpaper collections the popup can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperCategory {
    #[default]
    Nature,
    Mountains,
    Ocean,
    City,
    Space,
    Minimal,
}

impl WallpaperCategory {
    pub const ALL: [WallpaperCategory; 6] = [
        WallpaperCategory::Nature,
        WallpaperCategory::Mountains,
        WallpaperCategory::Ocean,
        WallpaperCategory::City,
        WallpaperCategory::Space,
        WallpaperCategory::Minimal,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            WallpaperCategory::Nature => "nature",
            WallpaperCategory::Mountains => "mountains",
            WallpaperCategory::Ocean => "ocean",
            WallpaperCategory::City => "city",
            WallpaperCategory::Space => "space",
            WallpaperCategory::Minimal => "minimal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WallpaperCategory::Nature => "Nature",
            WallpaperCategory::Mountains => "Mountains",
            WallpaperCategory::Ocean => "Ocean",
            WallpaperCategory::City => "City",
            WallpaperCategory::Space => "Space",
            WallpaperCategory::Minimal => "Minimal",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<WallpaperCategory> {
        Self::ALL.into_iter().find(|c| c.keyword() == keyword)
    }
}

/// A selected wallpaper image, cached for an hour once fetched. The
/// record remembers which collection it came from, so a cached shot is
/// only served back for the category that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallpaperShot {
    pub url: String,
    pub attribution: String,
    #[serde(default)]
    pub category: WallpaperCategory,
}

/// The provider serves a stable image per opaque seed, so the same
/// category/seed pair always resolves to the same picture.
pub fn wallpaper_url(category: WallpaperCategory, seed: u32) -> String {
    format!(
        "https://picsum.photos/seed/{}-{}/1920/1080",
        category.keyword(),
        seed
    )
}

pub fn pick(category: WallpaperCategory, seed: u32) -> WallpaperShot {
    WallpaperShot {
        url: wallpaper_url(category, seed),
        attribution: ATTRIBUTION.to_string(),
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallpaper_url_is_deterministic_per_seed() {
        let a = wallpaper_url(WallpaperCategory::Ocean, 42);
        let b = wallpaper_url(WallpaperCategory::Ocean, 42);
        let c = wallpaper_url(WallpaperCategory::Ocean, 43);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, "https://picsum.photos/seed/ocean-42/1920/1080");
    }

    #[test]
    fn test_pick_carries_attribution_and_category() {
        let shot = pick(WallpaperCategory::Nature, 7);

        assert_eq!(shot.attribution, ATTRIBUTION);
        assert!(shot.url.contains("nature-7"));
        assert_eq!(shot.category, WallpaperCategory::Nature);
    }

    #[test]
    fn test_shot_without_stored_category_decodes_to_default() {
        // Records written before the category was stamped lack the field.
        let shot: WallpaperShot = serde_json::from_str(
            r#"{"url": "https://picsum.photos/seed/ocean-1/1920/1080", "attribution": "Photo via Lorem Picsum"}"#,
        )
        .unwrap();

        assert_eq!(shot.category, WallpaperCategory::Nature);
    }

    #[test]
    fn test_category_round_trips_through_keyword() {
        for category in WallpaperCategory::ALL {
            assert_eq!(WallpaperCategory::from_keyword(category.keyword()), Some(category));
        }
        assert_eq!(WallpaperCategory::from_keyword("volcano"), None);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&WallpaperCategory::Mountains).unwrap();
        assert_eq!(json, "\"mountains\"");
    }
}
