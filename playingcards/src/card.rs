use std::path::Path;

use ab_glyph::{FontRef, FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::meta::SuitMeta;
use crate::pips;

pub const W: u32 = 1024;
pub const H: u32 = 1024;
pub const CARD_W: u32 = 730;
pub const CARD_H: u32 = 1024;

const INDEX_MARGIN_X: i32 = 64;
const INDEX_MARGIN_Y: i32 = 90;
const INDEX_MARGIN_Y_TOP: i32 = 180;
const NUMBER_SIZE: f32 = 80.0;
const SUIT_SIZE: f32 = 110.0;
const PIP_SIZE: f32 = 100.0;
const ACE_SIZE: f32 = 620.0;
const FACE_BORDER_RADIUS: u32 = 32;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fonts for the deck: a display face for the corner numbers and a
/// serif face for the suit glyphs.
pub struct DeckFonts {
    pub index: FontVec,
    pub serif: FontVec,
}

fn read_face(dir: &Path, file: &str) -> Option<Vec<u8>> {
    let bytes = std::fs::read(dir.join(file)).ok()?;
    FontRef::try_from_slice(&bytes).ok()?;
    Some(bytes)
}

impl DeckFonts {
    pub fn load(dir: &Path) -> Result<DeckFonts, String> {
        let serif_bytes = read_face(dir, "DejaVuSerif-Bold.ttf")
            .or_else(|| read_face(dir, "DejaVuSerif.ttf"))
            .ok_or_else(|| format!("no serif font under {}", dir.display()))?;
        let index_bytes = read_face(dir, "CarterOne-Regular.ttf").unwrap_or_else(|| {
            log::warn!(
                "CarterOne-Regular.ttf missing under {}, using the serif for indices",
                dir.display()
            );
            serif_bytes.clone()
        });
        let serif = FontVec::try_from_vec(serif_bytes).map_err(|e| format!("serif font: {}", e))?;
        let index = FontVec::try_from_vec(index_bytes).map_err(|e| format!("index font: {}", e))?;
        Ok(DeckFonts { index, serif })
    }
}

fn corner_inside(px: u32, py: u32, cx: f64, cy: f64, r: f64) -> bool {
    let dx = px as f64 + 0.5 - cx;
    let dy = py as f64 + 0.5 - cy;
    dx * dx + dy * dy <= r * r
}

fn inside_rounded(px: u32, py: u32, w: u32, h: u32, radius: u32) -> bool {
    let r = (radius.min(w / 2).min(h / 2)) as f64;
    let x = px as f64 + 0.5;
    let y = py as f64 + 0.5;
    let wf = w as f64;
    let hf = h as f64;
    if x < r && y < r {
        corner_inside(px, py, r, r, r)
    } else if x > wf - r && y < r {
        corner_inside(px, py, wf - r, r, r)
    } else if x < r && y > hf - r {
        corner_inside(px, py, r, hf - r, r)
    } else if x > wf - r && y > hf - r {
        corner_inside(px, py, wf - r, hf - r, r)
    } else {
        true
    }
}

fn fill_rounded_rect(img: &mut RgbaImage, x0: i32, y0: i32, w: u32, h: u32, radius: u32, color: Rgba<u8>) {
    let (iw, ih) = img.dimensions();
    for ly in 0..h {
        for lx in 0..w {
            if !inside_rounded(lx, ly, w, h, radius) {
                continue;
            }
            let x = x0 + lx as i32;
            let y = y0 + ly as i32;
            if x < 0 || y < 0 || x >= iw as i32 || y >= ih as i32 {
                continue;
            }
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn stroke_rounded_rect(
    img: &mut RgbaImage,
    x0: i32,
    y0: i32,
    w: u32,
    h: u32,
    radius: u32,
    width: u32,
    color: Rgba<u8>,
) {
    let iw = w.saturating_sub(2 * width);
    let ih = h.saturating_sub(2 * width);
    let ir = radius.saturating_sub(width);
    let (cw, ch) = img.dimensions();
    for ly in 0..h {
        for lx in 0..w {
            if !inside_rounded(lx, ly, w, h, radius) {
                continue;
            }
            let in_inner = iw > 0
                && ih > 0
                && lx >= width
                && ly >= width
                && lx - width < iw
                && ly - width < ih
                && inside_rounded(lx - width, ly - width, iw, ih, ir);
            if in_inner {
                continue;
            }
            let x = x0 + lx as i32;
            let y = y0 + ly as i32;
            if x < 0 || y < 0 || x >= cw as i32 || y >= ch as i32 {
                continue;
            }
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn overlay_at(dst: &mut RgbaImage, src: &RgbaImage, ox: i32, oy: i32) {
    let (dw, dh) = dst.dimensions();
    for (sx, sy, &px) in src.enumerate_pixels() {
        let dx = ox + sx as i32;
        let dy = oy + sy as i32;
        if dx < 0 || dy < 0 || dx >= dw as i32 || dy >= dh as i32 {
            continue;
        }
        let sa = px[3] as u32;
        if sa == 0 {
            continue;
        }
        let out = dst.get_pixel_mut(dx as u32, dy as u32);
        if sa == 255 {
            *out = px;
        } else {
            for c in 0..3 {
                out[c] = ((px[c] as u32 * sa + out[c] as u32 * (255 - sa)) / 255) as u8;
            }
            out[3] = out[3].max(px[3]);
        }
    }
}

fn draw_text_centered(
    canvas: &mut RgbaImage,
    color: Rgba<u8>,
    cx: i32,
    cy: i32,
    scale: PxScale,
    font: &FontVec,
    text: &str,
) {
    let (tw, th) = text_size(scale, font, text);
    draw_text_mut(
        canvas,
        color,
        cx - tw as i32 / 2,
        cy - th as i32 / 2,
        scale,
        font,
        text,
    );
}

fn draw_card_base(card: &mut RgbaImage) {
    fill_rounded_rect(card, 0, 0, CARD_W, CARD_H, 40, WHITE);
    stroke_rounded_rect(card, 0, 0, CARD_W, CARD_H, 40, 8, BLACK);
    stroke_rounded_rect(
        card,
        14,
        14,
        CARD_W - 28,
        CARD_H - 28,
        32,
        3,
        Rgba([68, 68, 68, 255]),
    );
}

fn draw_index(card: &mut RgbaImage, rank: &str, symbol: &str, ink: Rgba<u8>, fonts: &DeckFonts) {
    draw_text_centered(
        card,
        ink,
        INDEX_MARGIN_X,
        INDEX_MARGIN_Y,
        PxScale::from(NUMBER_SIZE),
        &fonts.index,
        rank,
    );
    draw_text_centered(
        card,
        ink,
        INDEX_MARGIN_X,
        INDEX_MARGIN_Y_TOP,
        PxScale::from(SUIT_SIZE),
        &fonts.serif,
        symbol,
    );

    // Duplicate the top-left index into the bottom-right corner,
    // upside down.
    let corner = imageops::crop_imm(card, 4, 56, 121, 170).to_image();
    let flipped = imageops::rotate180(&corner);
    overlay_at(card, &flipped, 606, 799);
}

fn draw_joker_lettering(card: &mut RgbaImage, ink: Rgba<u8>, fonts: &DeckFonts) {
    let mut strip = RgbaImage::new(96, 416);
    let scale = PxScale::from(NUMBER_SIZE);
    for (i, letter) in "JOKER".chars().enumerate() {
        let text = letter.to_string();
        let (tw, _) = text_size(scale, &fonts.index, &text);
        draw_text_mut(
            &mut strip,
            ink,
            (96 - tw as i32) / 2,
            i as i32 * 82,
            scale,
            &fonts.index,
            &text,
        );
    }
    overlay_at(card, &strip, 16, 70);
    let flipped = imageops::rotate180(&strip);
    overlay_at(card, &flipped, 618, 550);
}

fn paste_face_art(card: &mut RgbaImage, rank: &str, meta: &SuitMeta, assets: &Path) {
    let file = match meta.art_slug {
        Some(slug) => slug.to_string(),
        None => format!("{}_{}.png", meta.name, rank.to_lowercase()),
    };
    let path = assets.join("art").join("playingcards").join(file);
    let (bx, by, bw, bh) = (109, 100, 512, 824);
    match image::open(&path) {
        Ok(img) => {
            let art = img.resize_exact(bw, bh, FilterType::Lanczos3).to_rgba8();
            overlay_at(card, &art, bx, by);
        }
        Err(e) => log::warn!("face art {} unavailable: {}", path.display(), e),
    }
    stroke_rounded_rect(
        card,
        bx,
        by,
        bw,
        bh,
        FACE_BORDER_RADIUS,
        6,
        Rgba([136, 136, 136, 255]),
    );
}

/// Render one card face in card coordinates.
pub fn make_card(rank: &str, meta: &SuitMeta, fonts: &DeckFonts, assets: &Path) -> RgbaImage {
    let mut card = RgbaImage::new(CARD_W, CARD_H);
    let ink = Rgba([meta.color.0, meta.color.1, meta.color.2, 255]);

    // 1. White base with the double border.
    draw_card_base(&mut card);

    // 2. Corner indices, or the vertical JOKER lettering.
    if meta.is_joker() {
        draw_joker_lettering(&mut card, ink, fonts);
    } else {
        draw_index(&mut card, rank, meta.symbol, ink, fonts);
    }

    // 3. Court cards and jokers carry framed artwork.
    if meta.is_joker() || matches!(rank, "J" | "Q" | "K") {
        paste_face_art(&mut card, rank, meta, assets);
        return card;
    }

    // 4. Suit pips.
    if matches!(pips::rank_layout(rank), Some(pips::RankLayout::Ace)) {
        draw_text_centered(
            &mut card,
            ink,
            CARD_W as i32 / 2,
            CARD_H as i32 / 2,
            PxScale::from(ACE_SIZE),
            &fonts.serif,
            meta.symbol,
        );
    } else {
        for (x, y) in pips::pip_positions(rank) {
            draw_text_centered(
                &mut card,
                ink,
                x as i32,
                y as i32,
                PxScale::from(PIP_SIZE),
                &fonts.serif,
                meta.symbol,
            );
        }
    }

    card
}

/// Pad the card onto the square export canvas, anchored to the
/// bottom-left corner.
pub fn pad_canvas(card: &RgbaImage) -> RgbaImage {
    let mut canvas = RgbaImage::new(W, H);
    overlay_at(&mut canvas, card, 0, H as i32 - card.height() as i32);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::CARD_META;

    fn fonts() -> Option<DeckFonts> {
        let dir = Path::new("/usr/share/fonts/truetype/dejavu");
        if !dir.join("DejaVuSerif.ttf").is_file() {
            return None;
        }
        Some(DeckFonts::load(dir).unwrap())
    }

    fn hearts() -> &'static SuitMeta {
        CARD_META.iter().find(|m| m.name == "hearts").unwrap()
    }

    #[test]
    fn number_card_has_rounded_white_base() {
        let Some(fonts) = fonts() else { return };
        let tmp = tempfile::tempdir().unwrap();
        let card = make_card("5", hearts(), &fonts, tmp.path());
        assert_eq!(card.dimensions(), (CARD_W, CARD_H));
        assert_eq!(card.get_pixel(0, 0)[3], 0);
        assert_eq!(*card.get_pixel(CARD_W / 2, 60), WHITE);
    }

    #[test]
    fn center_pip_of_a_five_is_red() {
        let Some(fonts) = fonts() else { return };
        let tmp = tempfile::tempdir().unwrap();
        let card = make_card("5", hearts(), &fonts, tmp.path());
        let px = card.get_pixel(CARD_W / 2, CARD_H / 2);
        assert!(px[0] > 120 && px[0] > px[2], "expected red pip, got {:?}", px);
    }

    #[test]
    fn ace_paints_a_large_suit_glyph() {
        let Some(fonts) = fonts() else { return };
        let tmp = tempfile::tempdir().unwrap();
        let card = make_card("A", hearts(), &fonts, tmp.path());
        let red = card
            .pixels()
            .filter(|p| p[0] > 150 && p[1] < 100 && p[3] == 255)
            .count();
        assert!(red > 10_000, "ace glyph should be big, got {} red px", red);
    }

    #[test]
    fn missing_face_art_still_renders_the_frame() {
        let Some(fonts) = fonts() else { return };
        let tmp = tempfile::tempdir().unwrap();
        let card = make_card("Q", hearts(), &fonts, tmp.path());
        assert_eq!(*card.get_pixel(109 + 3, 100 + 412), Rgba([136, 136, 136, 255]));
    }

    #[test]
    fn padding_anchors_the_card_bottom_left() {
        let Some(fonts) = fonts() else { return };
        let tmp = tempfile::tempdir().unwrap();
        let card = make_card("4", hearts(), &fonts, tmp.path());
        let padded = pad_canvas(&card);
        assert_eq!(padded.dimensions(), (W, H));
        assert_eq!(padded.get_pixel(900, H / 2)[3], 0, "right band stays empty");
        assert_eq!(*padded.get_pixel(CARD_W / 2, H / 2), WHITE);
    }
}
