//! Software drawing on interleaved RGB buffers (`[height, width, 3]`).
//!
//! Every primitive clips to the buffer, so callers may pass coordinates that
//! fall partly or entirely outside the image.

use handvol_base::{Tensor, Vec2};

pub type Rgb = [u8; 3];

/// Width of one glyph cell in font units, including the gap.
const GLYPH_ADVANCE: i32 = 4;
const GLYPH_HEIGHT: i32 = 5;

/// Draw a one-pixel line.
pub fn draw_line(
    buf: &mut [u8],
    width: usize,
    height: usize,
    from: Vec2<i32>,
    to: Vec2<i32>,
    color: Rgb,
) {
    let max = Vec2::new(width as i32 - 1, height as i32 - 1);
    if let Some((from, to)) = clip_line(from, to, Vec2::zero(), max) {
        for_each_line_point(from, to, |p| set_pixel(buf, width, height, p, color));
    }
}

/// Draw a line `thickness` pixels wide with round caps.
pub fn draw_thick_line(
    buf: &mut [u8],
    width: usize,
    height: usize,
    from: Vec2<i32>,
    to: Vec2<i32>,
    thickness: i32,
    color: Rgb,
) {
    if thickness <= 1 {
        draw_line(buf, width, height, from, to, color);
        return;
    }

    let radius = thickness / 2;
    let min = Vec2::new(-radius, -radius);
    let max = Vec2::new(width as i32 - 1 + radius, height as i32 - 1 + radius);
    if let Some((from, to)) = clip_line(from, to, min, max) {
        for_each_line_point(from, to, |p| {
            draw_filled_circle(buf, width, height, p, radius, color)
        });
    }
}

pub fn draw_filled_circle(
    buf: &mut [u8],
    width: usize,
    height: usize,
    center: Vec2<i32>,
    radius: i32,
    color: Rgb,
) {
    let r2 = radius * radius;
    let y0 = center.y.saturating_sub(radius).max(0);
    let y1 = center.y.saturating_add(radius).min(height as i32 - 1);
    let x0 = center.x.saturating_sub(radius).max(0);
    let x1 = center.x.saturating_add(radius).min(width as i32 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (dx, dy) = (x - center.x, y - center.y);
            if dx * dx + dy * dy <= r2 {
                set_pixel(buf, width, height, Vec2::new(x, y), color);
            }
        }
    }
}

/// Fill the rectangle spanned by two corners, both inclusive.
pub fn fill_rect(
    buf: &mut [u8],
    width: usize,
    height: usize,
    a: Vec2<i32>,
    b: Vec2<i32>,
    color: Rgb,
) {
    let x0 = a.x.min(b.x).max(0);
    let x1 = a.x.max(b.x).min(width as i32 - 1);
    let y0 = a.y.min(b.y).max(0);
    let y1 = a.y.max(b.y).min(height as i32 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            set_pixel(buf, width, height, Vec2::new(x, y), color);
        }
    }
}

/// Outline the rectangle spanned by two corners with edges `thickness` wide.
pub fn draw_rect(
    buf: &mut [u8],
    width: usize,
    height: usize,
    a: Vec2<i32>,
    b: Vec2<i32>,
    thickness: i32,
    color: Rgb,
) {
    let corners = [a, Vec2::new(b.x, a.y), b, Vec2::new(a.x, b.y)];
    for i in 0..corners.len() {
        let next = corners[(i + 1) % corners.len()];
        draw_thick_line(buf, width, height, corners[i], next, thickness, color);
    }
}

/// Draw `text` with the built-in 3x5 font, each font unit `scale` pixels
/// square. `origin` is the bottom-left corner of the first glyph.
pub fn draw_text(
    buf: &mut [u8],
    width: usize,
    height: usize,
    origin: Vec2<i32>,
    text: &str,
    scale: i32,
    color: Rgb,
) {
    let scale = scale.max(1);
    let top = origin.y - GLYPH_HEIGHT * scale;
    let mut x = origin.x;

    for ch in text.chars() {
        for (row, bits) in char_glyph(ch).iter().enumerate() {
            for col in 0..3 {
                if bits & (1 << (2 - col)) == 0 {
                    continue;
                }
                let px = x + col * scale;
                let py = top + row as i32 * scale;
                fill_rect(
                    buf,
                    width,
                    height,
                    Vec2::new(px, py),
                    Vec2::new(px + scale - 1, py + scale - 1),
                    color,
                );
            }
        }
        x += GLYPH_ADVANCE * scale;
    }
}

/// Pixel size of `text` as drawn by [`draw_text`].
pub fn text_size(text: &str, scale: i32) -> Vec2<i32> {
    let scale = scale.max(1);
    let glyphs = text.chars().count() as i32;
    if glyphs == 0 {
        return Vec2::zero();
    }
    // No gap after the last glyph.
    Vec2::new((glyphs * GLYPH_ADVANCE - 1) * scale, GLYPH_HEIGHT * scale)
}

/// Copy an RGB image into `buf` with its top-left corner at `origin`.
pub fn blit(buf: &mut [u8], width: usize, height: usize, origin: Vec2<i32>, image: &Tensor<u8>) {
    let (src_w, src_h) = (image.width(), image.height());
    if image.channels() != 3 {
        return;
    }

    for sy in 0..src_h {
        let y = origin.y + sy as i32;
        if y < 0 || y >= height as i32 {
            continue;
        }
        let x0 = origin.x.max(0);
        let x1 = (origin.x + src_w as i32).min(width as i32);
        if x0 >= x1 {
            return;
        }
        let sx0 = (x0 - origin.x) as usize;
        let count = (x1 - x0) as usize;
        let src = (sy * src_w + sx0) * 3;
        let dst = (y as usize * width + x0 as usize) * 3;
        buf[dst..dst + count * 3].copy_from_slice(&image.data[src..src + count * 3]);
    }
}

/// Nearest-neighbour resize of an `[h, w, 3]` image. Returns the input
/// untouched when it already has the requested size.
pub fn resize_nearest(image: Tensor<u8>, width: usize, height: usize) -> Tensor<u8> {
    let (src_w, src_h) = (image.width(), image.height());
    if (src_w, src_h) == (width, height) || src_w == 0 || src_h == 0 || image.channels() != 3 {
        return image;
    }

    let mut data = vec![0u8; width * height * 3];
    for y in 0..height {
        let sy = y * src_h / height;
        for x in 0..width {
            let sx = x * src_w / width;
            let src = (sy * src_w + sx) * 3;
            let dst = (y * width + x) * 3;
            data[dst..dst + 3].copy_from_slice(&image.data[src..src + 3]);
        }
    }

    Tensor {
        shape: vec![height, width, 3],
        data,
    }
}

/// Convert HWC RGB buffer to packed `0x00RRGGBB` pixels for minifb.
pub fn rgb_to_argb(buf: &[u8], width: usize, height: usize) -> Vec<u32> {
    buf.chunks_exact(3)
        .take(width * height)
        .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
        .collect()
}

fn set_pixel(buf: &mut [u8], width: usize, height: usize, p: Vec2<i32>, color: Rgb) {
    if p.x < 0 || p.y < 0 || p.x as usize >= width || p.y as usize >= height {
        return;
    }
    let idx = (p.y as usize * width + p.x as usize) * 3;
    if let Some(px) = buf.get_mut(idx..idx + 3) {
        px.copy_from_slice(&color);
    }
}

fn for_each_line_point(mut p: Vec2<i32>, to: Vec2<i32>, mut plot: impl FnMut(Vec2<i32>)) {
    let dx = (to.x - p.x).abs();
    let dy = -(to.y - p.y).abs();
    let sx = if p.x < to.x { 1 } else { -1 };
    let sy = if p.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(p);
        if p == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
}

// Cohen-Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn outcode(p: Vec2<i32>, min: Vec2<i32>, max: Vec2<i32>) -> u8 {
    let mut code = INSIDE;
    if p.x < min.x {
        code |= LEFT;
    } else if p.x > max.x {
        code |= RIGHT;
    }
    if p.y < min.y {
        code |= TOP;
    } else if p.y > max.y {
        code |= BOTTOM;
    }
    code
}

/// Clip a segment to the inclusive box `min..=max`. `None` when nothing of it
/// is visible.
fn clip_line(
    mut a: Vec2<i32>,
    mut b: Vec2<i32>,
    min: Vec2<i32>,
    max: Vec2<i32>,
) -> Option<(Vec2<i32>, Vec2<i32>)> {
    if max.x < min.x || max.y < min.y {
        return None;
    }

    loop {
        let code_a = outcode(a, min, max);
        let code_b = outcode(b, min, max);
        if code_a | code_b == 0 {
            return Some((a, b));
        }
        if code_a & code_b != 0 {
            return None;
        }

        let code = if code_a != 0 { code_a } else { code_b };
        // i128 keeps the products safe across the whole i32 range.
        let (ax, ay, bx, by) = (a.x as i128, a.y as i128, b.x as i128, b.y as i128);
        let (dx, dy) = (bx - ax, by - ay);
        let clipped = if code & TOP != 0 {
            let y = min.y as i128;
            Vec2::new((ax + dx * (y - ay) / dy) as i32, min.y)
        } else if code & BOTTOM != 0 {
            let y = max.y as i128;
            Vec2::new((ax + dx * (y - ay) / dy) as i32, max.y)
        } else if code & LEFT != 0 {
            let x = min.x as i128;
            Vec2::new(min.x, (ay + dy * (x - ax) / dx) as i32)
        } else {
            let x = max.x as i128;
            Vec2::new(max.x, (ay + dy * (x - ax) / dx) as i32)
        };

        if code == code_a {
            a = clipped;
        } else {
            b = clipped;
        }
    }
}

/// 3x5 glyphs, one row per entry, most significant of the low three bits on
/// the left.
fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b111, 0b001, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ' ' => [0b000; 5],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}
