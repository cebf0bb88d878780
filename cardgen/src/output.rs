use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::RenderError;
use crate::record::CardRecord;
use crate::texture::overlay_at;

pub const POW2_W: u32 = 1024;
pub const POW2_H: u32 = 1024;

fn slug(text: &str, cap: usize) -> String {
    let mut out = String::new();
    let mut pending = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending && !out.is_empty() {
                out.push('_');
            }
            pending = false;
            out.push(c);
        } else {
            pending = true;
        }
    }
    out.truncate(cap);
    out
}

/// Folder name for a set. Case is preserved; everything that is not a
/// letter or digit collapses to a single underscore.
pub fn set_folder(set: &str) -> String {
    let folder = slug(set, 60);
    if folder.is_empty() {
        "UnknownSet".to_string()
    } else {
        folder
    }
}

/// File stem for one card, preferring the card ID over the name.
pub fn file_base(card_id: &str, name: &str) -> String {
    let source = if !card_id.is_empty() {
        card_id
    } else if !name.is_empty() {
        name
    } else {
        "card"
    };
    let base = slug(source, 80).to_lowercase();
    if base.is_empty() {
        "card".to_string()
    } else {
        base
    }
}

/// Full output path for a record: `<outdir>/<set folder>/<stem>_co.png`.
pub fn card_path(outdir: &Path, record: &CardRecord) -> PathBuf {
    outdir
        .join(set_folder(&record.set_edition()))
        .join(format!("{}_co.png", file_base(&record.card_id(), &record.name())))
}

/// Delete every set folder the batch is about to write into, so stale
/// renders from removed rows never survive a regeneration.
pub fn clear_set_folders(outdir: &Path, records: &[CardRecord]) -> Result<(), RenderError> {
    let folders: BTreeSet<String> = records
        .iter()
        .map(|r| set_folder(&r.set_edition()))
        .collect();
    for folder in folders {
        let path = outdir.join(&folder);
        if path.is_dir() {
            log::info!("Clearing set folder {}", path.display());
            std::fs::remove_dir_all(&path)?;
        }
    }
    Ok(())
}

/// Save the card padded onto a transparent 1024x1024 canvas, anchored
/// to the bottom-left corner.
pub fn save_card(card: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    let mut padded = RgbaImage::new(POW2_W, POW2_H);
    overlay_at(&mut padded, card, 0, POW2_H as i32 - card.height() as i32);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    padded.save(path)?;
    Ok(())
}
