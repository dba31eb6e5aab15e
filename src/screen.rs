use hex_color::HexColor;

use crate::{
    app::{Message, View},
    input::Field,
    timer::{progress::split_hms, Status},
};

/// Width (in pixels) of the virtual screen.
pub const DISPLAY_WIDTH: usize = 96;
/// Height (in pixels) of the virtual screen.
pub const DISPLAY_HEIGHT: usize = 56;
/// Size (in pixels) of the entire virtual screen.
pub const DISPLAY_SIZE: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;
/// Largest progress indicator that still fits on the screen.
pub const MAX_SEGMENTS: usize = (DISPLAY_WIDTH + DOT_GAP) / (DOT_SIZE + DOT_GAP);

// Palette
pub const BG: HexColor = HexColor::rgb(0x1e, 0x1e, 0x2e);
pub const SURFACE: HexColor = HexColor::rgb(0x31, 0x32, 0x44);
pub const ACCENT: HexColor = HexColor::rgb(0xcb, 0xa6, 0xf7);
pub const ACCENT2: HexColor = HexColor::rgb(0xa6, 0xe3, 0xa1);
pub const ACCENT3: HexColor = HexColor::rgb(0xf3, 0x8b, 0xa8);
pub const TEXT: HexColor = HexColor::rgb(0xcd, 0xd6, 0xf4);
pub const SUBTEXT: HexColor = HexColor::rgb(0x6c, 0x70, 0x86);
pub const DOT_ON: HexColor = ACCENT2;
pub const DOT_OFF: HexColor = SURFACE;

const GLYPH_WIDTH: usize = 4;
const GLYPH_HEIGHT: usize = 5;
const GLYPH_SPACING: usize = 1;

/// Raw data for the 4x5 digit atlas, followed by the colon.
#[rustfmt::skip]
const FONT_ATLAS: [u8; 5 * 11] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0x00, 0x60, 0x00, 0x60, 0x00, // :
];

// Layout
const FIELDS_Y: usize = 4;
const DISPLAY_Y: usize = 16;
const DISPLAY_SCALE: usize = 2;
const DOTS_Y: usize = 34;
const DOT_SIZE: usize = 4;
const DOT_GAP: usize = 2;
const ICON_Y: usize = 42;
const ICON_HEIGHT: usize = 7;
const STRIP_HEIGHT: usize = 2;

/// Low resolution frame the countdown is drawn into before being scaled up by
/// the pixel buffer.
pub struct Screen {
    vram: Vec<HexColor>,
}

impl Screen {
    /// Create a screen filled with the background color.
    pub fn new() -> Self {
        Self {
            vram: vec![BG; DISPLAY_SIZE],
        }
    }

    /// Compose a full frame from the application view.
    pub fn render(&mut self, view: &View) {
        self.clear(BG);
        self.draw_fields(view);
        self.draw_display(view);
        self.draw_dots(view);
        self.draw_icon(view.timer.status);
        self.fill_rect(
            0,
            DISPLAY_HEIGHT - STRIP_HEIGHT,
            DISPLAY_WIDTH,
            STRIP_HEIGHT,
            message_color(view.message),
        );
    }

    /// Copy the frame into a framebuffer.
    ///
    /// # Arguments
    ///
    /// * `target` - The RGBA frame of a [`pixels::Pixels`] of size
    ///   [`DISPLAY_WIDTH`] x [`DISPLAY_HEIGHT`].
    pub fn draw(&self, target: &mut [u8]) {
        for (pix, color) in target.chunks_exact_mut(4).zip(self.vram.iter()) {
            pix.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Hours, minutes and seconds entry boxes, the focused one highlighted.
    fn draw_fields(&mut self, view: &View) {
        let slot = 2 * (GLYPH_WIDTH + GLYPH_SPACING);
        let colon = GLYPH_WIDTH + GLYPH_SPACING;
        let width = 3 * (slot + 2) + 2 * colon;
        let mut x = (DISPLAY_WIDTH - width) / 2;

        for (i, field) in Field::ALL.into_iter().enumerate() {
            let focused = view.fields.focus() == field;
            self.fill_rect(x, FIELDS_Y - 2, slot + 1, GLYPH_HEIGHT + 4, SURFACE);
            if focused {
                self.fill_rect(x, FIELDS_Y + GLYPH_HEIGHT + 1, slot + 1, 1, ACCENT);
            }

            // Right align whatever has been typed so far.
            let text = view.fields.text(field);
            let shown = &text[text.len().saturating_sub(2)..];
            let offset = (2 - shown.len()) * (GLYPH_WIDTH + GLYPH_SPACING);
            let color = if focused { ACCENT } else { TEXT };
            self.draw_text(shown, x + 1 + offset, FIELDS_Y, 1, color);
            x += slot + 2;

            if i < 2 {
                self.draw_text(":", x, FIELDS_Y, 1, SUBTEXT);
                x += colon;
            }
        }
    }

    /// The big `HH:MM:SS` readout.
    fn draw_display(&mut self, view: &View) {
        let color = if view.timer.status == Status::Finished {
            ACCENT2
        } else if view.urgent() {
            ACCENT3
        } else {
            TEXT
        };

        let (h, m, s) = split_hms(view.timer.remaining);
        let text = format!("{:02}:{:02}:{:02}", h, m, s);
        let x = (DISPLAY_WIDTH - text_width(&text, DISPLAY_SCALE)) / 2;
        self.draw_text(&text, x, DISPLAY_Y, DISPLAY_SCALE, color);
    }

    /// The segmented progress indicator.
    fn draw_dots(&mut self, view: &View) {
        let count = view.segments.min(MAX_SEGMENTS);
        let lit = view.active_segments();
        let width = count * (DOT_SIZE + DOT_GAP) - DOT_GAP;
        let start = (DISPLAY_WIDTH - width) / 2;

        for i in 0..count {
            let color = if i < lit { DOT_ON } else { DOT_OFF };
            self.fill_rect(start + i * (DOT_SIZE + DOT_GAP), DOTS_Y, DOT_SIZE, DOT_SIZE, color);
        }
    }

    /// Play symbol while the toggle would start or resume, pause bars while running.
    fn draw_icon(&mut self, status: Status) {
        let x = DISPLAY_WIDTH / 2 - 2;
        if status == Status::Running {
            self.fill_rect(x - 1, ICON_Y, 2, ICON_HEIGHT, ACCENT2);
            self.fill_rect(x + 3, ICON_Y, 2, ICON_HEIGHT, ACCENT2);
        } else {
            let half = ICON_HEIGHT / 2;
            for row in 0..ICON_HEIGHT {
                let width = half + 1 - row.abs_diff(half);
                self.fill_rect(x, ICON_Y + row, width, 1, ACCENT);
            }
        }
    }

    fn clear(&mut self, color: HexColor) {
        self.vram.fill(color);
    }

    /// Fill a rectangle, clipped to the screen.
    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: HexColor) {
        for row in y..(y + h).min(DISPLAY_HEIGHT) {
            for col in x..(x + w).min(DISPLAY_WIDTH) {
                self.vram[row * DISPLAY_WIDTH + col] = color;
            }
        }
    }

    /// Draw a string of digits and colons. Other characters leave a gap.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: HexColor) {
        let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;
        for (i, c) in text.chars().enumerate() {
            if let Some(glyph) = glyph(c) {
                self.draw_glyph(glyph, x + i * advance, y, scale, color);
            }
        }
    }

    fn draw_glyph(&mut self, glyph: &[u8], x: usize, y: usize, scale: usize, color: HexColor) {
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x80 >> col) != 0 {
                    self.fill_rect(x + col * scale, y + row * scale, scale, scale, color);
                }
            }
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> HexColor {
        self.vram[y * DISPLAY_WIDTH + x]
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Atlas rows for a character, if the font has it.
fn glyph(c: char) -> Option<&'static [u8]> {
    let index = match c {
        '0'..='9' => c as usize - '0' as usize,
        ':' => 10,
        _ => return None,
    };
    Some(&FONT_ATLAS[index * GLYPH_HEIGHT..(index + 1) * GLYPH_HEIGHT])
}

fn text_width(text: &str, scale: usize) -> usize {
    let count = text.chars().count();
    if count == 0 {
        return 0;
    }
    (count * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING) * scale
}

fn message_color(message: Message) -> HexColor {
    match message {
        Message::Prompt => SUBTEXT,
        Message::Running | Message::Completed => ACCENT2,
        Message::Paused => ACCENT,
        Message::Hurry(_) => ACCENT3,
    }
}
