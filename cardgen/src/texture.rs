use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};
use rand::Rng;

use crate::regions::Region;

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Top-to-bottom gradient through an ordered list of color stops.
pub fn vertical_gradient(w: u32, h: u32, stops: &[(u8, u8, u8)]) -> RgbaImage {
    assert!(stops.len() >= 2, "gradient needs at least two stops");
    let segments = (stops.len() - 1) as f64;
    let mut img = RgbaImage::new(w, h);
    for y in 0..h {
        let t = if h > 1 {
            y as f64 / (h - 1) as f64
        } else {
            0.0
        };
        let pos = t * segments;
        let seg = (pos.floor() as usize).min(stops.len() - 2);
        let local = pos - seg as f64;
        let (a, b) = (stops[seg], stops[seg + 1]);
        let px = Rgba([
            lerp(a.0, b.0, local),
            lerp(a.1, b.1, local),
            lerp(a.2, b.2, local),
            255,
        ]);
        for x in 0..w {
            img.put_pixel(x, y, px);
        }
    }
    img
}

/// Top-left to bottom-right gradient between two colors.
pub fn diagonal_gradient(w: u32, h: u32, top: (u8, u8, u8), bottom: (u8, u8, u8)) -> RgbaImage {
    let mut img = RgbaImage::new(w, h);
    let span = (w + h).saturating_sub(2).max(1) as f64;
    for y in 0..h {
        for x in 0..w {
            let t = (x + y) as f64 / span;
            img.put_pixel(
                x,
                y,
                Rgba([
                    lerp(top.0, bottom.0, t),
                    lerp(top.1, bottom.1, t),
                    lerp(top.2, bottom.2, t),
                    255,
                ]),
            );
        }
    }
    img
}

/// Translucent monochrome grain layer for compositing over flat fills.
pub fn noise_texture(w: u32, h: u32, alpha: u8, rng: &mut impl Rng) -> RgbaImage {
    let mut img = RgbaImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let gray: u8 = rng.random_range(98..158);
            img.put_pixel(x, y, Rgba([gray, gray, gray, alpha]));
        }
    }
    img
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

/// Binary coverage mask for a rounded rectangle of the given size.
pub fn rounded_rect_mask(w: u32, h: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = if inside_rounded(x, y, w, h, radius) {
                255
            } else {
                0
            };
            mask.put_pixel(x, y, Luma([v]));
        }
    }
    mask
}

fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }
    let da = dst[3] as u32;
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let sc = src[c] as u32;
        let dc = dst[c] as u32;
        dst[c] = ((sc * sa + dc * da * (255 - sa) / 255) / out_a) as u8;
    }
    dst[3] = out_a as u8;
}

/// Source-over composite of `src` onto `dst` at the given offset.
/// Portions falling outside `dst` are clipped.
pub fn overlay_at(dst: &mut RgbaImage, src: &RgbaImage, ox: i32, oy: i32) {
    let (dw, dh) = dst.dimensions();
    for (sx, sy, &px) in src.enumerate_pixels() {
        let dx = ox + sx as i32;
        let dy = oy + sy as i32;
        if dx < 0 || dy < 0 || dx >= dw as i32 || dy >= dh as i32 {
            continue;
        }
        blend_pixel(dst.get_pixel_mut(dx as u32, dy as u32), px);
    }
}

/// Paste `src` onto `dst` through a gray coverage mask. Fully covered
/// pixels replace the destination outright.
pub fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, mask: &GrayImage, ox: i32, oy: i32) {
    let (dw, dh) = dst.dimensions();
    for (sx, sy, &px) in src.enumerate_pixels() {
        let dx = ox + sx as i32;
        let dy = oy + sy as i32;
        if dx < 0 || dy < 0 || dx >= dw as i32 || dy >= dh as i32 {
            continue;
        }
        let m = mask.get_pixel(sx, sy)[0] as u32;
        if m == 0 {
            continue;
        }
        let out = dst.get_pixel_mut(dx as u32, dy as u32);
        if m == 255 {
            *out = px;
        } else {
            for c in 0..4 {
                out[c] = ((px[c] as u32 * m + out[c] as u32 * (255 - m)) / 255) as u8;
            }
        }
    }
}

/// Square-cornered border band of the given stroke width.
pub fn stroke_rect(img: &mut RgbaImage, region: Region, width: i32, color: Rgba<u8>) {
    let (iw, ih) = img.dimensions();
    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            if x < 0 || y < 0 || x >= iw as i32 || y >= ih as i32 {
                continue;
            }
            let on_band = x < region.x0 + width
                || x >= region.x1 - width
                || y < region.y0 + width
                || y >= region.y1 - width;
            if on_band {
                blend_pixel(img.get_pixel_mut(x as u32, y as u32), color);
            }
        }
    }
}

/// Rounded border band: pixels inside the outer rounded rect but
/// outside the inner one shrunk by the stroke width.
pub fn stroke_rounded_rect(
    img: &mut RgbaImage,
    region: Region,
    radius: u32,
    width: u32,
    color: Rgba<u8>,
) {
    let w = region.width();
    let h = region.height();
    if w == 0 || h == 0 {
        return;
    }
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
            let x = region.x0 + lx as i32;
            let y = region.y0 + ly as i32;
            if x < 0 || y < 0 || x >= cw as i32 || y >= ch as i32 {
                continue;
            }
            blend_pixel(img.get_pixel_mut(x as u32, y as u32), color);
        }
    }
}

/// Aged paper fill used for every plaque face.
pub fn parchment(w: u32, h: u32, rng: &mut impl Rng) -> RgbaImage {
    let mut img = vertical_gradient(w, h, &[(242, 233, 208), (224, 212, 184)]);
    let grain = noise_texture(w, h, 22, rng);
    overlay_at(&mut img, &grain, 0, 0);
    img
}

/// Parchment plaque with a drop shadow and a carved triple outline.
pub fn raised_plaque(
    canvas: &mut RgbaImage,
    region: Region,
    radius: u32,
    elevation: i32,
    rng: &mut impl Rng,
) {
    let w = region.width();
    let h = region.height();
    if w == 0 || h == 0 {
        return;
    }
    let mask = rounded_rect_mask(w, h, radius);

    // 1. Shadow: offset dark silhouette, blurred, composited under the plaque.
    let (cw, ch) = canvas.dimensions();
    let mut shadow_layer = RgbaImage::new(cw, ch);
    let silhouette = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 160]));
    paste_masked(
        &mut shadow_layer,
        &silhouette,
        &mask,
        region.x0 + elevation / 2,
        region.y0 + elevation,
    );
    let blurred = imageops::blur(&shadow_layer, (elevation / 2 + 4) as f32);
    overlay_at(canvas, &blurred, 0, 0);

    // 2. Face.
    let face = parchment(w, h, rng);
    paste_masked(canvas, &face, &mask, region.x0, region.y0);

    // 3. Carved edge: dark rim, light inner bevel, faint recess line.
    stroke_rounded_rect(canvas, region, radius, 2, Rgba([0, 0, 0, 220]));
    stroke_rounded_rect(
        canvas,
        region.inset(3),
        radius.saturating_sub(3).max(1),
        2,
        Rgba([255, 255, 255, 140]),
    );
    stroke_rounded_rect(
        canvas,
        region.inset(5),
        radius.saturating_sub(5).max(1),
        2,
        Rgba([0, 0, 0, 90]),
    );
}

/// Square triple frame around the artwork window.
pub fn art_bevel(canvas: &mut RgbaImage, region: Region) {
    stroke_rect(canvas, region, 6, Rgba([0, 0, 0, 230]));
    stroke_rect(canvas, region.inset(6), 2, Rgba([255, 255, 255, 100]));
    stroke_rect(canvas, region.inset(10), 2, Rgba([0, 0, 0, 90]));
}
