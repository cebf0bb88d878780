use std::path::Path;

use ab_glyph::{FontRef, FontVec};

use crate::error::RenderError;

const BOLD_FILE: &str = "DejaVuSerif-Bold.ttf";
const ITALIC_FILE: &str = "DejaVuSerif-Italic.ttf";
const REGULAR_FILE: &str = "DejaVuSerif.ttf";

/// The two faces the renderer draws with. Ability text and every label
/// use bold; flavor text uses italic.
#[derive(Debug)]
pub struct FontSet {
    pub bold: FontVec,
    pub italic: FontVec,
}

fn read_face(dir: &Path, file: &str) -> Option<Vec<u8>> {
    let path = dir.join(file);
    let bytes = std::fs::read(&path).ok()?;
    if FontRef::try_from_slice(&bytes).is_err() {
        log::warn!("font file {} does not parse, skipping", path.display());
        return None;
    }
    Some(bytes)
}

impl FontSet {
    /// Load the serif faces from `dir`, substituting whichever face is
    /// available when a variant is missing. Fails only when no face in
    /// the directory parses at all.
    pub fn load(dir: &Path) -> Result<FontSet, RenderError> {
        let bold_bytes = read_face(dir, BOLD_FILE);
        let italic_bytes = read_face(dir, ITALIC_FILE);
        let regular_bytes = read_face(dir, REGULAR_FILE);

        let fallback = regular_bytes
            .clone()
            .or_else(|| bold_bytes.clone())
            .or_else(|| italic_bytes.clone())
            .ok_or_else(|| RenderError::NoUsableFont(dir.display().to_string()))?;

        let bold = bold_bytes.unwrap_or_else(|| {
            log::warn!("bold serif missing under {}, substituting", dir.display());
            fallback.clone()
        });
        let italic = italic_bytes.unwrap_or_else(|| {
            log::warn!("italic serif missing under {}, substituting", dir.display());
            fallback.clone()
        });

        let bold = FontVec::try_from_vec(bold)
            .map_err(|_| RenderError::NoUsableFont(dir.display().to_string()))?;
        let italic = FontVec::try_from_vec(italic)
            .map_err(|_| RenderError::NoUsableFont(dir.display().to_string()))?;
        Ok(FontSet { bold, italic })
    }
}
