//! HUD overlays drawn onto the outgoing frame.
//!
//! Pure-CPU drawing on `image` buffers with a 5x7 bitmap glyph font. Every
//! primitive clamps to the frame, so overlays tolerate any resolution and
//! drawing can never fail a frame.

use image::{Rgb, RgbImage};

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Placeholder canvas size used when no decoded frame is available.
const PLACEHOLDER_WIDTH: u32 = 640;
const PLACEHOLDER_HEIGHT: u32 = 480;

/// Everything the HUD needs for one frame.
pub(crate) struct Hud<'a> {
    pub(crate) percent: f32,
    pub(crate) bar: f32,
    pub(crate) count: f32,
    pub(crate) feedback: &'a str,
    pub(crate) form_ok: bool,
    pub(crate) elbow: f32,
    pub(crate) shoulder: f32,
    pub(crate) hip: f32,
}

/// Linear interpolation of `value` from `domain` onto `range`, clamped at
/// the edges. The range may be inverted (used for the gauge fill).
pub(crate) fn interp(value: f32, domain: (f32, f32), range: (f32, f32)) -> f32 {
    if value <= domain.0 {
        return range.0;
    }
    if value >= domain.1 {
        return range.1;
    }
    let t = (value - domain.0) / (domain.1 - domain.0);
    range.0 + t * (range.1 - range.0)
}

/// Draw all HUD overlays in order: gauge, rep counter, feedback banner,
/// angle readout.
pub(crate) fn draw_overlays(frame: &mut RgbImage, hud: &Hud<'_>) {
    let width = frame.width() as i32;
    let height = frame.height() as i32;

    // Progress gauge, only once the form gate is open.
    if hud.form_ok {
        let gauge_x = width - 40;
        draw_rect(frame, gauge_x, 50, gauge_x + 20, 380, GREEN, 3);
        fill_rect(frame, gauge_x, hud.bar.round() as i32, gauge_x + 20, 380, GREEN);
        let percent_text = format!("{}%", hud.percent as i32);
        draw_label(frame, gauge_x - 15, 430, &percent_text, BLUE, 2);
    }

    // Rep counter panel, bottom left.
    fill_rect(frame, 10, height - 100, 150, height - 10, GREEN);
    let count_text = format!("Reps: {}", hud.count as i32);
    draw_label(frame, 20, height - 64, &count_text, WHITE, 2);

    // Feedback banner, centered on a white plate.
    let feedback_color = if hud.form_ok { GREEN } else { RED };
    let text_width = hud.feedback.chars().count() as i32 * 6 * 2;
    let text_x = (width - text_width) / 2;
    fill_rect(frame, text_x - 10, 10, text_x + text_width + 10, 60, WHITE);
    draw_label(frame, text_x, 24, hud.feedback, feedback_color, 2);

    // Compact angle readout above the counter panel.
    let readout_y = height - 120;
    draw_label(frame, 10, readout_y, &format!("E:{}", hud.elbow as i32), WHITE, 1);
    draw_label(frame, 10, readout_y + 25, &format!("S:{}", hud.shoulder as i32), WHITE, 1);
    draw_label(frame, 10, readout_y + 50, &format!("H:{}", hud.hip as i32), WHITE, 1);
}

/// Fixed-size blank canvas with a centered caption, used when the inbound
/// frame is unusable.
pub(crate) fn placeholder_frame(caption: &str) -> RgbImage {
    let mut frame = RgbImage::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    let text_width = caption.chars().count() as i32 * 6 * 3;
    let x = (PLACEHOLDER_WIDTH as i32 - text_width) / 2;
    let y = PLACEHOLDER_HEIGHT as i32 / 2 - 10;
    draw_label(&mut frame, x, y, caption, WHITE, 3);
    frame
}

/// Large red caption for the degraded-output path.
pub(crate) fn draw_caption(frame: &mut RgbImage, text: &str) {
    draw_label(frame, 50, 50, text, RED, 3);
}

fn fill_rect(image: &mut RgbImage, left: i32, top: i32, right: i32, bottom: i32, color: Rgb<u8>) {
    let width = image.width() as i32;
    let height = image.height() as i32;
    if width == 0 || height == 0 {
        return;
    }
    let left = left.clamp(0, width - 1);
    let right = right.clamp(0, width - 1);
    let top = top.clamp(0, height - 1);
    let bottom = bottom.clamp(0, height - 1);

    for y in top..=bottom {
        for x in left..=right {
            *image.get_pixel_mut(x as u32, y as u32) = color;
        }
    }
}

fn draw_rect(
    image: &mut RgbImage,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    color: Rgb<u8>,
    thickness: i32,
) {
    for inset in 0..thickness.max(1) {
        outline_rect(image, left + inset, top + inset, right - inset, bottom - inset, color);
    }
}

fn outline_rect(image: &mut RgbImage, left: i32, top: i32, right: i32, bottom: i32, color: Rgb<u8>) {
    let width = image.width() as i32;
    let height = image.height() as i32;
    if width == 0 || height == 0 || left > right || top > bottom {
        return;
    }
    let clamped_left = left.clamp(0, width - 1);
    let clamped_right = right.clamp(0, width - 1);
    let clamped_top = top.clamp(0, height - 1);
    let clamped_bottom = bottom.clamp(0, height - 1);

    for x in clamped_left..=clamped_right {
        if top >= 0 && top < height {
            *image.get_pixel_mut(x as u32, top as u32) = color;
        }
        if bottom >= 0 && bottom < height {
            *image.get_pixel_mut(x as u32, bottom as u32) = color;
        }
    }
    for y in clamped_top..=clamped_bottom {
        if left >= 0 && left < width {
            *image.get_pixel_mut(left as u32, y as u32) = color;
        }
        if right >= 0 && right < width {
            *image.get_pixel_mut(right as u32, y as u32) = color;
        }
    }
}

/// Render `text` with the bitmap font, scaled up by an integer factor.
/// Unknown glyphs advance the cursor without drawing.
fn draw_label(image: &mut RgbImage, mut x: i32, y: i32, text: &str, color: Rgb<u8>, scale: i32) {
    let width = image.width() as i32;
    let height = image.height() as i32;
    let scale = scale.max(1);
    let advance = 6 * scale;

    for ch in text.chars().flat_map(|c| c.to_uppercase()) {
        if let Some(glyph) = glyph_bits(ch) {
            for (row, pattern) in glyph.iter().enumerate() {
                for col in 0..5 {
                    if (pattern >> (4 - col)) & 1 != 1 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let px = x + col * scale + dx;
                            let py = y + row as i32 * scale + dy;
                            if px >= 0 && px < width && py >= 0 && py < height {
                                *image.get_pixel_mut(px as u32, py as u32) = color;
                            }
                        }
                    }
                }
            }
        }
        x += advance;
    }
}

fn glyph_bits(ch: char) -> Option<[u8; 7]> {
    match ch {
        'A' => Some([
            0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
        ]),
        'B' => Some([
            0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110,
        ]),
        'C' => Some([
            0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110,
        ]),
        'D' => Some([
            0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110,
        ]),
        'E' => Some([
            0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111,
        ]),
        'F' => Some([
            0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000,
        ]),
        'G' => Some([
            0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111,
        ]),
        'H' => Some([
            0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
        ]),
        'I' => Some([
            0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ]),
        'J' => Some([
            0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100,
        ]),
        'K' => Some([
            0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001,
        ]),
        'L' => Some([
            0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111,
        ]),
        'M' => Some([
            0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001,
        ]),
        'N' => Some([
            0b10001, 0b11001, 0b10101, 0b10101, 0b10011, 0b10001, 0b10001,
        ]),
        'O' => Some([
            0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
        ]),
        'P' => Some([
            0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000,
        ]),
        'Q' => Some([
            0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101,
        ]),
        'R' => Some([
            0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001,
        ]),
        'S' => Some([
            0b01111, 0b10000, 0b01110, 0b00001, 0b00001, 0b10001, 0b01110,
        ]),
        'T' => Some([
            0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100,
        ]),
        'U' => Some([
            0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
        ]),
        'V' => Some([
            0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100,
        ]),
        'W' => Some([
            0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010,
        ]),
        'X' => Some([
            0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001,
        ]),
        'Y' => Some([
            0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100,
        ]),
        'Z' => Some([
            0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111,
        ]),
        '0' => Some([
            0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
        ]),
        '1' => Some([
            0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ]),
        '2' => Some([
            0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
        ]),
        '3' => Some([
            0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110,
        ]),
        '4' => Some([
            0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
        ]),
        '5' => Some([
            0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
        ]),
        '6' => Some([
            0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
        ]),
        '7' => Some([
            0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
        ]),
        '8' => Some([
            0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
        ]),
        '9' => Some([
            0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100,
        ]),
        '%' => Some([
            0b10001, 0b10010, 0b00100, 0b01000, 0b10010, 0b10001, 0b00000,
        ]),
        '-' => Some([0, 0, 0, 0b11111, 0, 0, 0]),
        ':' => Some([0, 0b00110, 0b00110, 0, 0b00110, 0b00110, 0]),
        '.' => Some([0, 0, 0, 0, 0, 0b00110, 0b00110]),
        ' ' => Some([0, 0, 0, 0, 0, 0, 0]),
        _ => None,
    }
}
