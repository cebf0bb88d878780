use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut, text_size};

use crate::fonts::FontSet;
use crate::regions::Region;

pub const LINE_GAP: u32 = 4;
pub const PARA_GAP: u32 = 8;
pub const DIVIDER_GAP: u32 = 12;
pub const PAD_TOP: u32 = 18;
pub const PAD_BOTTOM: u32 = 20;
pub const TEXT_SIDE_PAD: u32 = 20;

pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const INK_STROKE: Rgba<u8> = Rgba([220, 220, 220, 255]);
pub const FLAVOR_INK: Rgba<u8> = Rgba([60, 60, 60, 255]);

/// Greedy word wrap against an arbitrary width measure. A word wider
/// than the limit gets a line to itself rather than being split.
pub fn wrap_to_width(text: &str, max_w: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if current.is_empty() || measure(&candidate) <= max_w {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub struct FitParams {
    pub start: (u32, u32),
    pub min: (u32, u32),
    pub available: u32,
}

/// Shrink the (ability, flavor) sizes until the measured height fits.
/// Ability gives way first; when both sizes bottom out the content
/// clips and the sizes are returned as-is.
pub fn fit_two_blocks(
    params: FitParams,
    mut measure_total: impl FnMut(u32, u32) -> u32,
) -> (u32, u32) {
    let (mut a, mut f) = params.start;
    loop {
        if measure_total(a, f) <= params.available {
            return (a, f);
        }
        if a > params.min.0 {
            a -= 1;
        } else if f > params.min.1 {
            f -= 1;
        } else {
            return (a, f);
        }
    }
}

fn paragraphs(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn line_height(scale: PxScale, font: &FontVec) -> u32 {
    text_size(scale, font, "Hg").1
}

/// Total height the rules box content would occupy at the given sizes.
pub fn measure_rules_height(
    ability: &str,
    flavor: &str,
    max_w: u32,
    fonts: &FontSet,
    a_size: u32,
    f_size: u32,
) -> u32 {
    let a_scale = PxScale::from(a_size as f32);
    let f_scale = PxScale::from(f_size as f32);
    let a_lh = line_height(a_scale, &fonts.bold);
    let f_lh = line_height(f_scale, &fonts.italic);

    let has_ability = !ability.trim().is_empty();
    let has_flavor = !flavor.trim().is_empty();
    let mut total = PAD_TOP + PAD_BOTTOM;

    if has_ability {
        for para in paragraphs(ability) {
            let lines = wrap_to_width(&para, max_w, |s| text_size(a_scale, &fonts.bold, s).0);
            total += lines.len() as u32 * (a_lh + LINE_GAP);
            total += PARA_GAP;
        }
    }
    if has_ability && has_flavor {
        total += DIVIDER_GAP;
    }
    if has_flavor {
        let lines = wrap_to_width(flavor.trim(), max_w, |s| {
            text_size(f_scale, &fonts.italic, s).0
        });
        total += lines.len() as u32 * (f_lh + LINE_GAP);
    }
    total
}

/// Draw `text` with a square outline stroke under the fill pass.
pub fn draw_text_outlined(
    canvas: &mut RgbaImage,
    fill: Rgba<u8>,
    stroke: Rgba<u8>,
    stroke_w: i32,
    x: i32,
    y: i32,
    scale: PxScale,
    font: &FontVec,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    for dy in -stroke_w..=stroke_w {
        for dx in -stroke_w..=stroke_w {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text_mut(canvas, stroke, x + dx, y + dy, scale, font, text);
        }
    }
    draw_text_mut(canvas, fill, x, y, scale, font, text);
}

/// Fill the rules box: ability paragraphs left-aligned in bold, a
/// divider rule, then flavor text centered in italic.
pub fn draw_rules_flavor(
    canvas: &mut RgbaImage,
    region: Region,
    ability: &str,
    flavor: &str,
    fonts: &FontSet,
) {
    let max_w = region.width().saturating_sub(2 * TEXT_SIDE_PAD);
    let params = FitParams {
        start: (25, 24),
        min: (18, 18),
        available: region.height(),
    };
    let (a_size, f_size) = fit_two_blocks(params, |a, f| {
        measure_rules_height(ability, flavor, max_w, fonts, a, f)
    });

    let a_scale = PxScale::from(a_size as f32);
    let f_scale = PxScale::from(f_size as f32);
    let a_lh = line_height(a_scale, &fonts.bold);
    let f_lh = line_height(f_scale, &fonts.italic);

    let has_ability = !ability.trim().is_empty();
    let has_flavor = !flavor.trim().is_empty();
    let mut y = region.y0 + PAD_TOP as i32;

    if has_ability {
        for para in paragraphs(ability) {
            for line in wrap_to_width(&para, max_w, |s| text_size(a_scale, &fonts.bold, s).0) {
                draw_text_outlined(
                    canvas,
                    INK,
                    INK_STROKE,
                    1,
                    region.x0 + TEXT_SIDE_PAD as i32,
                    y,
                    a_scale,
                    &fonts.bold,
                    &line,
                );
                y += (a_lh + LINE_GAP) as i32;
            }
            y += PARA_GAP as i32;
        }
    }

    if has_ability && has_flavor {
        y += DIVIDER_GAP as i32;
        let lx0 = (region.x0 + 30) as f32;
        let lx1 = (region.x1 - 30) as f32;
        for row in 0..2 {
            let ly = (y + row) as f32;
            draw_line_segment_mut(canvas, (lx0, ly), (lx1, ly), Rgba([0, 0, 0, 200]));
        }
        y += DIVIDER_GAP as i32;
    }

    if has_flavor {
        for line in wrap_to_width(flavor.trim(), max_w, |s| {
            text_size(f_scale, &fonts.italic, s).0
        }) {
            let tw = text_size(f_scale, &fonts.italic, &line).0;
            let tx = region.x0 + TEXT_SIDE_PAD as i32 + (max_w.saturating_sub(tw) / 2) as i32;
            draw_text_mut(canvas, FLAVOR_INK, tx, y, f_scale, &fonts.italic, &line);
            y += (f_lh + LINE_GAP) as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_chars(s: &str) -> u32 {
        s.len() as u32 * 10
    }

    #[test]
    fn wrap_breaks_at_the_width_limit() {
        let lines = wrap_to_width("aa bb cc", 50, by_chars);
        assert_eq!(lines, vec!["aa bb", "cc"]);
    }

    #[test]
    fn wrap_collapses_runs_of_whitespace() {
        let lines = wrap_to_width("aa   bb\t cc", 200, by_chars);
        assert_eq!(lines, vec!["aa bb cc"]);
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let lines = wrap_to_width("a extraordinarily b", 60, by_chars);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn empty_text_wraps_to_nothing() {
        assert!(wrap_to_width("   ", 100, by_chars).is_empty());
    }

    #[test]
    fn fit_returns_start_sizes_when_content_fits() {
        let params = FitParams {
            start: (25, 24),
            min: (18, 18),
            available: 500,
        };
        let sizes = fit_two_blocks(params, |a, f| (a + f) * 10);
        assert_eq!(sizes, (25, 24));
    }

    #[test]
    fn fit_shrinks_ability_before_flavor() {
        let params = FitParams {
            start: (25, 24),
            min: (18, 18),
            available: 400,
        };
        let sizes = fit_two_blocks(params, |a, f| (a + f) * 10);
        assert_eq!(sizes, (18, 22));
    }

    #[test]
    fn fit_stops_at_the_floor_even_when_clipping() {
        let params = FitParams {
            start: (25, 24),
            min: (18, 18),
            available: 10,
        };
        let sizes = fit_two_blocks(params, |a, f| (a + f) * 10);
        assert_eq!(sizes, (18, 18));
    }

    #[test]
    fn more_room_never_yields_smaller_sizes() {
        let measure = |a: u32, f: u32| (a + f) * 10;
        let mut previous = (0, 0);
        for available in [100, 380, 420, 460, 500] {
            let sizes = fit_two_blocks(
                FitParams {
                    start: (25, 24),
                    min: (18, 18),
                    available,
                },
                measure,
            );
            assert!(sizes.0 >= previous.0 && sizes.1 >= previous.1);
            previous = sizes;
        }
    }

    #[test]
    fn empty_blocks_measure_the_padding_only() {
        let dir = std::path::Path::new("/usr/share/fonts/truetype/dejavu");
        if !dir.join("DejaVuSerif.ttf").is_file() {
            return;
        }
        let fonts = FontSet::load(dir).unwrap();
        let h = measure_rules_height("", "", 600, &fonts, 25, 24);
        assert_eq!(h, PAD_TOP + PAD_BOTTOM);
    }

    #[test]
    fn flavor_only_skips_the_divider() {
        let dir = std::path::Path::new("/usr/share/fonts/truetype/dejavu");
        if !dir.join("DejaVuSerif.ttf").is_file() {
            return;
        }
        let fonts = FontSet::load(dir).unwrap();
        let flavor_only = measure_rules_height("", "A short epitaph.", 600, &fonts, 25, 24);
        let both = measure_rules_height("Strike twice.", "A short epitaph.", 600, &fonts, 25, 24);
        assert!(both > flavor_only + DIVIDER_GAP);
    }
}
