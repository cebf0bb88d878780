use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbaImage};

use crate::record::CardRecord;
use crate::regions::Region;
use crate::texture::overlay_at;

pub const ART_W: u32 = 645;
pub const ART_H: u32 = 339;

fn slug(text: &str, sep: char) -> String {
    let mut out = String::new();
    let mut pending = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending && !out.is_empty() {
                out.push(sep);
            }
            pending = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending = true;
        }
    }
    out
}

fn try_open(path: &Path) -> Option<DynamicImage> {
    if !path.is_file() {
        return None;
    }
    let reader = match ImageReader::open(path) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("cannot open artwork {}: {}", path.display(), e);
            return None;
        }
    };
    let reader = match reader.with_guessed_format() {
        Ok(r) => r,
        Err(e) => {
            log::warn!("cannot probe artwork {}: {}", path.display(), e);
            return None;
        }
    };
    match reader.decode() {
        Ok(img) => Some(img),
        Err(e) => {
            log::warn!("corrupt artwork {}: {}", path.display(), e);
            None
        }
    }
}

/// Search the asset tree for this card's artwork.
///
/// Priority: the per-collection folder keyed by card ID, then an
/// explicit artwork reference from the row, then flat files named by
/// card ID and finally by card name.
pub fn locate_artwork(record: &CardRecord, assets_root: &Path) -> Option<DynamicImage> {
    let art_dir = assets_root.join("art");

    let set = record.set_edition();
    if !set.is_empty() {
        let id = record.card_id();
        let id_slug = if id.is_empty() {
            record.index().to_string()
        } else {
            id.to_lowercase().replace('-', "_")
        };
        let path = art_dir
            .join(slug(&set, '_'))
            .join(format!("{}.png", id_slug));
        if let Some(img) = try_open(&path) {
            return Some(img);
        }
    }

    let hint = record.artwork_hint();
    if !hint.is_empty() {
        if let Some(img) = try_open(&PathBuf::from(&hint)) {
            return Some(img);
        }
    }

    let id = record.card_id();
    if !id.is_empty() {
        for ext in ["png", "jpg", "jpeg"] {
            if let Some(img) = try_open(&art_dir.join(format!("{}.{}", id, ext))) {
                return Some(img);
            }
        }
    }

    let name = record.name();
    if !name.is_empty() {
        let name_slug = slug(&name, '-');
        for ext in ["png", "jpg", "jpeg"] {
            if let Some(img) = try_open(&art_dir.join(format!("{}.{}", name_slug, ext))) {
                return Some(img);
            }
        }
    }

    None
}

/// Scale to cover the target box, cropping the overflow symmetrically,
/// then resample to the exact target size.
pub fn cover_fit(img: &DynamicImage, tw: u32, th: u32) -> RgbaImage {
    let sw = img.width().max(1);
    let sh = img.height().max(1);
    let src_ratio = sw as f64 / sh as f64;
    let target_ratio = tw as f64 / th as f64;

    let cropped = if src_ratio > target_ratio {
        let new_w = ((sh as f64 * target_ratio).round() as u32).clamp(1, sw);
        img.crop_imm((sw - new_w) / 2, 0, new_w, sh)
    } else if src_ratio < target_ratio {
        let new_h = ((sw as f64 / target_ratio).round() as u32).clamp(1, sh);
        img.crop_imm(0, (sh - new_h) / 2, sw, new_h)
    } else {
        img.clone()
    };
    cropped.resize_exact(tw, th, FilterType::Lanczos3).to_rgba8()
}

/// Fit the artwork into the window, inset past the bevel frame.
pub fn paste_art(canvas: &mut RgbaImage, art_region: Region, img: &DynamicImage) {
    let fitted = cover_fit(img, ART_W, ART_H);
    overlay_at(canvas, &fitted, art_region.x0 + 11, art_region.y0 + 11);
}
