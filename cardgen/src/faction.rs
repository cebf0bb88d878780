use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{ImageReader, Rgba, RgbaImage};

use crate::error::RenderError;
use crate::fonts::FontSet;

/// Canonical faction buckets. Free-text faction cells map onto one of
/// these; anything unrecognized lands in Survivor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactionKey {
    Espenlock,
    Stag,
    Cow,
    Survivor,
    Special,
}

impl FactionKey {
    pub const ALL: [FactionKey; 5] = [
        FactionKey::Espenlock,
        FactionKey::Stag,
        FactionKey::Cow,
        FactionKey::Survivor,
        FactionKey::Special,
    ];

    pub fn from_text(text: &str) -> FactionKey {
        let lower = text.to_lowercase();
        if lower.contains("espen") {
            FactionKey::Espenlock
        } else if lower.contains("stag") {
            FactionKey::Stag
        } else if lower.contains("cow") || lower.contains("warlock") {
            FactionKey::Cow
        } else if lower.contains("special") {
            FactionKey::Special
        } else {
            FactionKey::Survivor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactionKey::Espenlock => "Espenlock",
            FactionKey::Stag => "Stag",
            FactionKey::Cow => "Cow",
            FactionKey::Survivor => "Survivor",
            FactionKey::Special => "Special",
        }
    }
}

/// Colors for the faction badge on the type line.
#[derive(Debug, Clone, Copy)]
pub struct BadgeColors {
    pub top: (u8, u8, u8),
    pub bottom: (u8, u8, u8),
    pub text: Rgba<u8>,
    pub stroke: Rgba<u8>,
}

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Everything faction-specific the renderer needs for one card.
pub struct FactionStyle {
    pub gradient_stops: Vec<(u8, u8, u8)>,
    pub badge: BadgeColors,
    pub noise_alpha: u8,
    pub orb: Option<RgbaImage>,
    pub no_cost: bool,
}

fn load_orb(assets_root: &Path, file: &str) -> Result<RgbaImage, RenderError> {
    let path = assets_root.join("icons").join("resources").join(file);
    if !path.is_file() {
        return Err(RenderError::MissingAsset(path.display().to_string()));
    }
    let img = ImageReader::open(&path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| RenderError::CorruptAsset(format!("{}: {}", path.display(), e)))?;
    Ok(img.to_rgba8())
}

impl FactionStyle {
    pub fn for_key(key: FactionKey, assets_root: &Path) -> FactionStyle {
        let (gradient_stops, badge, noise_alpha, orb_file, no_cost) = match key {
            FactionKey::Espenlock => (
                vec![(100, 150, 220), (30, 60, 120)],
                BadgeColors {
                    top: (70, 120, 200),
                    bottom: (35, 70, 140),
                    text: WHITE,
                    stroke: BLACK,
                },
                34,
                Some("orb_energy.png"),
                false,
            ),
            FactionKey::Stag => (
                vec![(200, 60, 40), (90, 20, 20)],
                BadgeColors {
                    top: (200, 60, 40),
                    bottom: (90, 20, 20),
                    text: BLACK,
                    stroke: WHITE,
                },
                34,
                Some("orb_munitions.png"),
                false,
            ),
            FactionKey::Cow => (
                vec![(120, 50, 170), (45, 20, 80)],
                BadgeColors {
                    top: (150, 60, 200),
                    bottom: (80, 30, 120),
                    text: WHITE,
                    stroke: BLACK,
                },
                34,
                Some("orb_faith.png"),
                false,
            ),
            FactionKey::Survivor => (
                vec![(200, 90, 20), (100, 40, 5)],
                BadgeColors {
                    top: (220, 120, 40),
                    bottom: (160, 70, 10),
                    text: BLACK,
                    stroke: WHITE,
                },
                34,
                Some("orb_supplies.png"),
                false,
            ),
            FactionKey::Special => (
                vec![(235, 230, 220), (210, 205, 195)],
                BadgeColors {
                    top: (240, 235, 225),
                    bottom: (200, 195, 185),
                    text: BLACK,
                    stroke: WHITE,
                },
                48,
                None,
                true,
            ),
        };

        let orb = orb_file.and_then(|file| match load_orb(assets_root, file) {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("cost orb for {} unavailable: {}", key.as_str(), e);
                None
            }
        });

        FactionStyle {
            gradient_stops,
            badge,
            noise_alpha,
            orb,
            no_cost,
        }
    }
}

/// Per-batch shared state: one style per faction plus the loaded fonts.
/// Built once before the render loop so the per-card path never touches
/// the filesystem for style data.
pub struct StyleRegistry {
    styles: HashMap<FactionKey, FactionStyle>,
    pub fonts: FontSet,
    pub assets_root: PathBuf,
}

impl StyleRegistry {
    pub fn with_fonts(fonts: FontSet, assets_root: &Path) -> StyleRegistry {
        let styles = FactionKey::ALL
            .iter()
            .map(|&key| (key, FactionStyle::for_key(key, assets_root)))
            .collect();
        StyleRegistry {
            styles,
            fonts,
            assets_root: assets_root.to_path_buf(),
        }
    }

    pub fn load(assets_root: &Path) -> Result<StyleRegistry, RenderError> {
        let fonts = FontSet::load(&assets_root.join("fonts"))?;
        Ok(StyleRegistry::with_fonts(fonts, assets_root))
    }

    pub fn style(&self, key: FactionKey) -> &FactionStyle {
        &self.styles[&key]
    }
}
