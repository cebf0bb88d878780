use ab_glyph::PxScale;
use image::imageops::FilterType;
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::Rng;

use crate::artwork;
use crate::faction::{FactionKey, StyleRegistry};
use crate::record::{CardRecord, StatLine};
use crate::regions::{compute_regions, Region, Regions};
use crate::text;
use crate::texture;

pub const CARD_W: u32 = 750;
pub const CARD_H: u32 = 1024;

const FRAME_MARGIN: i32 = 4;
const FRAME_RADIUS: u32 = 30;
const BG_STOPS: [(u8, u8, u8); 2] = [(40, 45, 55), (15, 15, 20)];
const BG_NOISE_ALPHA: u8 = 28;

const NAME_SIZE: f32 = 34.0;
const NAME_MAX_CHARS: usize = 40;
const TYPE_SIZE: f32 = 28.0;
const TYPE_MAX_CHARS: usize = 60;
const BADGE_LABEL_SIZE: f32 = 26.0;
const STATS_SIZE: f32 = 24.0;
const FOOTER_SIZE: f32 = 22.0;

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn draw_frame(canvas: &mut RgbaImage, style_stops: &[(u8, u8, u8)], noise_alpha: u8, rng: &mut impl Rng) {
    let frame = Region::new(
        FRAME_MARGIN,
        FRAME_MARGIN,
        CARD_W as i32 - FRAME_MARGIN,
        CARD_H as i32 - FRAME_MARGIN,
    );
    let w = frame.width();
    let h = frame.height();
    let mut layer = texture::vertical_gradient(w, h, style_stops);
    let grain = texture::noise_texture(w, h, noise_alpha, rng);
    texture::overlay_at(&mut layer, &grain, 0, 0);
    let mask = texture::rounded_rect_mask(w, h, FRAME_RADIUS);
    texture::paste_masked(canvas, &layer, &mask, frame.x0, frame.y0);

    texture::stroke_rounded_rect(canvas, frame, FRAME_RADIUS, 2, Rgba([0, 0, 0, 220]));
    texture::stroke_rounded_rect(
        canvas,
        frame.inset(2),
        FRAME_RADIUS - 2,
        2,
        Rgba([255, 255, 255, 80]),
    );
}

fn draw_header(
    canvas: &mut RgbaImage,
    region: Region,
    record: &CardRecord,
    registry: &StyleRegistry,
    key: FactionKey,
) {
    let fonts = &registry.fonts;
    let style = registry.style(key);

    let name = truncate(&record.name(), NAME_MAX_CHARS);
    if !name.is_empty() {
        let scale = PxScale::from(NAME_SIZE);
        let (tw, th) = text_size(scale, &fonts.bold, &name);
        let tx = region.x0 + (region.width().saturating_sub(tw) / 2) as i32;
        let ty = region.y0 + (region.height().saturating_sub(th) / 2) as i32;
        text::draw_text_outlined(
            canvas,
            text::INK,
            text::INK_STROKE,
            1,
            tx,
            ty,
            scale,
            &fonts.bold,
            &name,
        );
    }

    if style.no_cost {
        return;
    }
    let cost = record.cost();
    if cost.is_empty() {
        return;
    }
    let numeral = crate::record::parse_cost_number(&cost)
        .map(|n| n.to_string())
        .unwrap_or(cost);

    let target = region.height() * 4 / 5;
    let scale = PxScale::from(target as f32 * 0.55);
    let (tw, th) = text_size(scale, &fonts.bold, &numeral);
    let ty = region.y0 + (region.height().saturating_sub(th) / 2) as i32;

    let tx = match &style.orb {
        Some(orb) => {
            let fitted = imageops::resize(orb, target, target, FilterType::Lanczos3);
            let ox = region.x1 - target as i32 - 10;
            let oy = region.y0 + (region.height().saturating_sub(target) / 2) as i32;
            texture::overlay_at(canvas, &fitted, ox, oy);
            ox - tw as i32 - 10
        }
        None => region.x1 - 20 - tw as i32,
    };
    let stroke_w = (target as i32 / 18).max(2);
    text::draw_text_outlined(
        canvas,
        text::INK,
        Rgba([255, 255, 255, 220]),
        stroke_w,
        tx,
        ty,
        scale,
        &fonts.bold,
        &numeral,
    );
}

fn draw_type_line(
    canvas: &mut RgbaImage,
    region: Region,
    record: &CardRecord,
    registry: &StyleRegistry,
    key: FactionKey,
) {
    let fonts = &registry.fonts;

    let parts: Vec<String> = [record.card_type(), record.subtype()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    let line = truncate(&parts.join(" - "), TYPE_MAX_CHARS);
    if !line.is_empty() {
        let scale = PxScale::from(TYPE_SIZE);
        let (_, th) = text_size(scale, &fonts.bold, &line);
        let ty = (region.y0 + region.y1 - th as i32 - 10) / 2;
        text::draw_text_outlined(
            canvas,
            text::INK,
            text::INK_STROKE,
            1,
            region.x0 + 20,
            ty,
            scale,
            &fonts.bold,
            &line,
        );
    }

    // Faction badge hugs the right end of the plaque, overshooting the
    // plaque edge by a few pixels.
    let style = registry.style(key);
    let badge_w = region.width() * 35 / 100;
    let badge = Region::new(
        region.x1 - badge_w as i32,
        region.y0 - 3,
        region.x1,
        region.y1 + 3,
    );
    let bw = badge.width();
    let bh = badge.height();
    let radius = (bh / 6).max(4);
    let fill = texture::diagonal_gradient(bw, bh, style.badge.top, style.badge.bottom);
    let mask = texture::rounded_rect_mask(bw, bh, radius);
    texture::paste_masked(canvas, &fill, &mask, badge.x0, badge.y0);
    texture::stroke_rounded_rect(canvas, badge, radius, 3, Rgba([0, 0, 0, 230]));
    texture::stroke_rounded_rect(
        canvas,
        badge.inset(2),
        radius.saturating_sub(2).max(1),
        2,
        Rgba([255, 255, 255, 90]),
    );

    let label = key.as_str();
    let scale = PxScale::from(BADGE_LABEL_SIZE);
    let (tw, th) = text_size(scale, &fonts.bold, label);
    let tx = badge.x0 + (bw.saturating_sub(tw) / 2) as i32;
    let ty = badge.y0 + (bh.saturating_sub(th + 6) / 2) as i32;
    text::draw_text_outlined(
        canvas,
        style.badge.text,
        style.badge.stroke,
        2,
        tx,
        ty,
        scale,
        &fonts.bold,
        label,
    );
}

fn draw_stats(canvas: &mut RgbaImage, region: Region, record: &CardRecord, registry: &StyleRegistry) {
    let fonts = &registry.fonts;
    let scale = PxScale::from(STATS_SIZE);

    let (labels, spacing): (Vec<String>, i32) = match record.stat_line() {
        StatLine::Triple { hp, atk, def } => (
            vec![
                format!("HP: {}", hp),
                format!("ATK: {}", atk),
                format!("DEF: {}", def),
            ],
            10,
        ),
        StatLine::Pair { power, toughness } => (
            vec![format!("POW: {}", power), format!("DEF: {}", toughness)],
            20,
        ),
    };

    let widths: Vec<i32> = labels
        .iter()
        .map(|l| text_size(scale, &fonts.bold, l).0 as i32)
        .collect();
    let total: i32 = widths.iter().sum::<i32>() + spacing * (labels.len() as i32 - 1);
    let mut x = (region.x0 + region.x1 - total) / 2;
    let y = (region.y0 + region.y1) / 2 - 12;
    for (label, w) in labels.iter().zip(widths) {
        draw_text_mut(canvas, text::INK, x, y, scale, &fonts.bold, label);
        x += w + spacing;
    }
}

fn draw_footer(
    canvas: &mut RgbaImage,
    region: Region,
    record: &CardRecord,
    registry: &StyleRegistry,
    index: usize,
    total: usize,
) {
    let fonts = &registry.fonts;
    let scale = PxScale::from(FOOTER_SIZE);

    let set = record.set_edition();
    if !set.is_empty() {
        let (_, th) = text_size(scale, &fonts.bold, &set);
        let ty = region.y0 + (region.height().saturating_sub(th) / 2) as i32;
        text::draw_text_outlined(
            canvas,
            text::INK,
            text::INK_STROKE,
            1,
            region.x0 + 20,
            ty,
            scale,
            &fonts.bold,
            &set,
        );
    }

    let ordinal = format!("{}/{}", index + 1, total);
    let card_id = record.card_id();
    let (ord_w, ord_h) = text_size(scale, &fonts.bold, &ordinal);
    let (id_w, id_h) = if card_id.is_empty() {
        (0, 0)
    } else {
        text_size(scale, &fonts.bold, &card_id)
    };
    let block_h = ord_h + id_h;
    let mut ty = region.y0 + (region.height().saturating_sub(block_h) / 2) as i32;
    text::draw_text_outlined(
        canvas,
        text::INK,
        text::INK_STROKE,
        1,
        region.x1 - 20 - ord_w as i32,
        ty,
        scale,
        &fonts.bold,
        &ordinal,
    );
    if !card_id.is_empty() {
        ty += ord_h as i32;
        text::draw_text_outlined(
            canvas,
            text::INK,
            text::INK_STROKE,
            1,
            region.x1 - 20 - id_w as i32,
            ty,
            scale,
            &fonts.bold,
            &card_id,
        );
    }
}

/// Render one complete card face.
pub fn build_card(
    record: &CardRecord,
    key: FactionKey,
    registry: &StyleRegistry,
    index: usize,
    total: usize,
    rng: &mut impl Rng,
) -> RgbaImage {
    let style = registry.style(key);

    // 1. Dark backdrop behind the rounded frame corners.
    let mut canvas = texture::vertical_gradient(CARD_W, CARD_H, &BG_STOPS);
    let grain = texture::noise_texture(CARD_W, CARD_H, BG_NOISE_ALPHA, rng);
    texture::overlay_at(&mut canvas, &grain, 0, 0);

    // 2. Faction-colored frame.
    draw_frame(&mut canvas, &style.gradient_stops, style.noise_alpha, rng);

    // 3. Content layout.
    let regions: Regions = compute_regions(CARD_W, CARD_H);

    // 4. Parchment plaques.
    texture::raised_plaque(&mut canvas, regions.name, 12, 10, rng);
    texture::raised_plaque(&mut canvas, regions.type_line, 10, 10, rng);
    texture::raised_plaque(&mut canvas, regions.rules, 16, 10, rng);
    texture::raised_plaque(&mut canvas, regions.stats, 14, 10, rng);
    texture::raised_plaque(&mut canvas, regions.footer, 10, 10, rng);

    // 5. Artwork window. A card with no artwork keeps the bare frame
    // fill behind the bevel.
    if let Some(img) = artwork::locate_artwork(record, &registry.assets_root) {
        artwork::paste_art(&mut canvas, regions.art, &img);
    } else {
        log::warn!("no artwork found for \"{}\"", record.name());
    }
    texture::art_bevel(&mut canvas, regions.art);

    // 6. Name and resource cost.
    draw_header(&mut canvas, regions.name, record, registry, key);

    // 7. Type line and faction badge.
    draw_type_line(&mut canvas, regions.type_line, record, registry, key);

    // 8. Combat stats.
    draw_stats(&mut canvas, regions.stats, record, registry);

    // 9. Footer: set name, print ordinal, card ID.
    draw_footer(&mut canvas, regions.footer, record, registry, index, total);

    // 10. Rules and flavor text.
    text::draw_rules_flavor(
        &mut canvas,
        regions.rules,
        &record.abilities(),
        &record.flavor(),
        &registry.fonts,
    );

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Map, Value};
    use std::path::Path;

    const SYSTEM_FONTS: &str = "/usr/share/fonts/truetype/dejavu";

    fn registry(assets: &Path) -> Option<StyleRegistry> {
        let dir = Path::new(SYSTEM_FONTS);
        if !dir.join("DejaVuSerif.ttf").is_file() {
            return None;
        }
        let fonts = FontSet::load(dir).unwrap();
        Some(StyleRegistry::with_fonts(fonts, assets))
    }

    fn record(pairs: &[(&str, Value)]) -> CardRecord {
        let row: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        CardRecord::new(row, 0)
    }

    #[test]
    fn renders_a_full_survivor_card() {
        let tmp = tempfile::tempdir().unwrap();
        let Some(registry) = registry(tmp.path()) else {
            return;
        };
        let rec = record(&[
            ("Name", json!("Ash Walker")),
            ("Faction", json!("Survivor")),
            ("Type", json!("Creature")),
            ("Subtype", json!("Unit")),
            ("Resource Cost", json!("3")),
            ("Stats", json!("HP: 12 / ATK: 4 / DEF: 3")),
            ("Abilities", json!("Strike twice.\nCannot be blocked by mutants.")),
            ("Flavor Text", json!("The ash remembers.")),
            ("Set/Edition", json!("Bitterroot Saga")),
            ("Card ID", json!("SRP-BR-001-C-U")),
        ]);
        let mut rng = StdRng::seed_from_u64(11);
        let card = build_card(&rec, FactionKey::Survivor, &registry, 0, 3, &mut rng);
        assert_eq!(card.dimensions(), (CARD_W, CARD_H));

        // Top of the frame shows the survivor orange gradient.
        let frame_px = card.get_pixel(CARD_W / 2, 12);
        assert!(frame_px[0] > 150, "frame should be warm, got {:?}", frame_px);
        assert!(frame_px[0] > frame_px[1] && frame_px[1] > frame_px[2]);

        // Rules box interior is parchment.
        let regions = compute_regions(CARD_W, CARD_H);
        let rules_px = card.get_pixel(
            (regions.rules.x0 + 40) as u32,
            (regions.rules.y1 - 40) as u32,
        );
        assert!(rules_px[0] > 150, "rules box should be parchment, got {:?}", rules_px);
    }

    #[test]
    fn overlong_text_never_panics() {
        let tmp = tempfile::tempdir().unwrap();
        let Some(registry) = registry(tmp.path()) else {
            return;
        };
        let ability = "Whenever this creature attacks, draw a card. ".repeat(40);
        let rec = record(&[
            ("Name", json!("N".repeat(120))),
            ("Faction", json!("Espenlock")),
            ("Type", json!("Spell")),
            ("Abilities", json!(ability)),
            ("Flavor Text", json!("F ".repeat(200))),
        ]);
        let mut rng = StdRng::seed_from_u64(5);
        let card = build_card(&rec, FactionKey::Espenlock, &registry, 4, 5, &mut rng);
        assert_eq!(card.dimensions(), (CARD_W, CARD_H));
    }
}
