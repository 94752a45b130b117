//! Fixed-size RGB frame buffer presented on a terminal.
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half-block glyph (`▀`): foreground = upper pixel, background = lower
//! pixel. Text is kept in a separate cell layer that is printed over the
//! pixels when the frame is presented.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Colors, Print},
    QueueableCommand,
};

use crate::sprite::{Rgb, Sprite};

const HALF_BLOCK: char = '▀';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TextCell {
    ch: char,
    color: Rgb,
}

pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    text: Vec<Option<TextCell>>,
}

impl Surface {
    /// A surface of `width` x `height` pixels (`height` rounds up to even).
    pub fn new(width: usize, height: usize) -> Self {
        let height = height + height % 2;
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
            text: vec![None; width * (height / 2)],
        }
    }

    /// Surface covering a terminal of `cols` x `rows` cells.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of text rows (terminal rows).
    pub fn rows(&self) -> usize {
        self.height / 2
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Clear pixels to `color` and drop all text.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
        self.text.fill(None);
    }

    /// Copy the opaque pixels of `sprite` with its top-left at `origin`.
    /// Parts outside the surface are clipped.
    pub fn blit(&mut self, sprite: &Sprite, origin: (i64, i64)) {
        for sy in 0..sprite.height() {
            for sx in 0..sprite.width() {
                if let Some(color) = sprite.get(sx, sy) {
                    self.put(origin.0 + sx as i64, origin.1 + sy as i64, color);
                }
            }
        }
    }

    /// One-pixel rectangle outline.
    pub fn outline(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        for i in x..x + w {
            self.put(i, y, color);
            self.put(i, y + h - 1, color);
        }
        for j in y..y + h {
            self.put(x, j, color);
            self.put(x + w - 1, j, color);
        }
    }

    /// Blend every pixel towards `color` (translucent overlay).
    pub fn shade(&mut self, color: Rgb, alpha: f32) {
        for px in &mut self.pixels {
            *px = px.blend(color, alpha);
        }
    }

    /// Write `text` starting at cell (`col`, `row`). Clipped at the edges.
    pub fn text(&mut self, col: usize, row: usize, text: &str, color: Rgb) {
        if row >= self.rows() {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i;
            if c >= self.width {
                break;
            }
            self.text[row * self.width + c] = Some(TextCell { ch, color });
        }
    }

    /// Write `text` horizontally centred on `row`.
    pub fn text_centered(&mut self, row: usize, text: &str, color: Rgb) {
        let len = text.chars().count();
        let col = (self.width / 2).saturating_sub(len / 2);
        self.text(col, row, text, color);
    }

    /// The text layer of one row, with blanks where no text was written.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows() {
            return String::new();
        }
        self.text[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|cell| cell.map(|c| c.ch).unwrap_or(' '))
            .collect()
    }

    /// Queue the whole frame at the terminal origin and flush.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows() {
            out.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..self.width {
                let top = self.pixels[2 * row * self.width + col];
                let bottom = self.pixels[(2 * row + 1) * self.width + col];
                let (glyph, fg, bg) = match self.text[row * self.width + col] {
                    Some(cell) => (cell.ch, cell.color, top.blend(bottom, 0.5)),
                    None => (HALF_BLOCK, top, bottom),
                };
                if current != Some((fg, bg)) {
                    out.queue(style::SetColors(Colors::new(color(fg), color(bg))))?;
                    current = Some((fg, bg));
                }
                out.queue(Print(glyph))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}
