//! Pixel sprites, collision masks and the text-art sprite format.
//!
//! A sprite source is plain text: one character per pixel, `.` or a space for
//! transparent pixels and a palette letter for coloured ones. Lines starting
//! with `#` are comments. A multi-frame source separates frames with a line
//! containing only `---`.

use std::path::Path;

use crate::error::{GameError, GameResult};

/// 24-bit colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(240, 240, 240);

    /// Linear blend towards `other`; `alpha` 0.0 keeps `self`, 1.0 gives `other`.
    pub fn blend(self, other: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * a).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Map a sprite source character to a pixel. `None` = not in the palette.
fn palette(ch: char) -> Option<Option<Rgb>> {
    let px = match ch {
        '.' | ' ' => None,
        'W' => Some(Rgb::WHITE),
        'w' => Some(Rgb(180, 180, 190)),
        'G' => Some(Rgb(120, 120, 130)),
        'D' => Some(Rgb(70, 70, 80)),
        'B' => Some(Rgb(125, 85, 55)),
        'b' => Some(Rgb(80, 52, 34)),
        'O' => Some(Rgb(240, 140, 40)),
        'Y' => Some(Rgb(250, 220, 80)),
        'R' => Some(Rgb(220, 50, 40)),
        'C' => Some(Rgb(80, 220, 240)),
        'L' => Some(Rgb(140, 180, 255)),
        'M' => Some(Rgb(230, 60, 230)),
        'P' => Some(Rgb(255, 90, 120)),
        _ => return None,
    };
    Some(px)
}

/// A rectangular grid of optional pixels (`None` = transparent).
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
}

impl Sprite {
    /// Build a sprite from rows of pixels. Short rows are padded transparent.
    pub fn from_rows(rows: Vec<Vec<Option<Rgb>>>) -> GameResult<Self> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(GameError::EmptySprite);
        }
        let height = rows.len();
        let mut pixels = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, None);
            pixels.extend(row);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A fully opaque single-colour block.
    pub fn solid(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixels: vec![Some(color); width.max(1) * height.max(1)],
        }
    }

    /// Parse a single-frame text-art source.
    pub fn parse(text: &str) -> GameResult<Self> {
        parse_lines(text.lines().enumerate())
    }

    /// Parse a multi-frame source (frames separated by `---` lines).
    pub fn parse_frames(text: &str) -> GameResult<Vec<Self>> {
        let mut frames = Vec::new();
        let mut chunk: Vec<(usize, &str)> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim_end() == "---" {
                frames.push(parse_lines(chunk.drain(..))?);
            } else {
                chunk.push((i, line));
            }
        }
        frames.push(parse_lines(chunk.into_iter())?);
        Ok(frames)
    }

    /// Load a single-frame sprite from disk.
    pub fn load(path: &Path) -> GameResult<Self> {
        let text = read_asset(path)?;
        Self::parse(&text).map_err(|e| GameError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load an animation (multi-frame sprite) from disk.
    pub fn load_frames(path: &Path) -> GameResult<Vec<Self>> {
        let text = read_asset(path)?;
        Self::parse_frames(&text).map_err(|e| GameError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    /// Opacity mask of this sprite.
    pub fn mask(&self) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            bits: self.pixels.iter().map(Option::is_some).collect(),
        }
    }

    /// Copy rotated counter-clockwise by `angle_deg` around the centre.
    ///
    /// The result is expanded to the rotated bounding box and sampled with
    /// nearest-neighbour lookup, so no new colours are introduced.
    pub fn rotated(&self, angle_deg: f32) -> Sprite {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let new_w = ((w * cos.abs() + h * sin.abs()) - 1e-3).ceil().max(1.0) as usize;
        let new_h = ((w * sin.abs() + h * cos.abs()) - 1e-3).ceil().max(1.0) as usize;

        let mut pixels = vec![None; new_w * new_h];
        for y in 0..new_h {
            for x in 0..new_w {
                let dx = x as f32 + 0.5 - new_w as f32 / 2.0;
                let dy = y as f32 + 0.5 - new_h as f32 / 2.0;
                let sx = dx * cos - dy * sin + w / 2.0;
                let sy = dx * sin + dy * cos + h / 2.0;
                if sx >= 0.0 && sy >= 0.0 {
                    pixels[y * new_w + x] = self.get(sx as usize, sy as usize);
                }
            }
        }
        Sprite {
            width: new_w,
            height: new_h,
            pixels,
        }
    }
}

fn read_asset(path: &Path) -> GameResult<String> {
    std::fs::read_to_string(path).map_err(|e| GameError::AssetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_lines<'a>(lines: impl Iterator<Item = (usize, &'a str)>) -> GameResult<Sprite> {
    let mut rows = Vec::new();
    for (line_no, line) in lines {
        if line.starts_with('#') {
            continue;
        }
        let mut row = Vec::new();
        for (col, ch) in line.trim_end_matches('\r').chars().enumerate() {
            let px = palette(ch).ok_or(GameError::InvalidSprite {
                line: line_no + 1,
                column: col + 1,
                found: ch,
            })?;
            row.push(px);
        }
        rows.push(row);
    }
    // Blank lines around a frame are layout, not pixels.
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    while rows.first().is_some_and(|r| r.is_empty()) {
        rows.remove(0);
    }
    Sprite::from_rows(rows)
}

/// Binary per-pixel opacity grid used for pixel-accurate collision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: i64, y: i64) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.bits[y as usize * self.width + x as usize]
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// True if any opaque pixel of `other`, placed with its top-left corner at
    /// `offset` relative to this mask's top-left, lands on an opaque pixel here.
    pub fn overlaps(&self, other: &Mask, offset: (i64, i64)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i64).min(self.width as i64);
        let y1 = (oy + other.height as i64).min(self.height as i64);
        (y0..y1).any(|y| (x0..x1).any(|x| self.get(x, y) && other.get(x - ox, y - oy)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pads_short_rows() {
        let s = Sprite::parse("W\nWWW\n.W").unwrap();
        assert_eq!((s.width(), s.height()), (3, 3));
        assert_eq!(s.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(s.get(2, 0), None);
        assert_eq!(s.get(0, 2), None);
        assert!(s.get(1, 2).is_some());
    }

    #[test]
    fn parse_reports_bad_pixel_position() {
        let err = Sprite::parse("WW\nW?W").unwrap_err();
        match err {
            GameError::InvalidSprite {
                line,
                column,
                found,
            } => assert_eq!((line, column, found), (2, 2, '?')),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parse_frames_splits_on_separator() {
        let frames = Sprite::parse_frames("# boom\nY\n---\nYY\nYY\n---\n\nR\n").unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].width(), 2);
        assert_eq!(frames[2].height(), 1);
    }

    #[test]
    fn empty_source_rejected() {
        assert!(matches!(Sprite::parse("\n\n"), Err(GameError::EmptySprite)));
    }

    #[test]
    fn zero_rotation_is_identity() {
        let s = Sprite::parse("WR.\n.GB").unwrap();
        assert_eq!(s.rotated(0.0), s);
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let s = Sprite::solid(4, 2, Rgb::WHITE);
        let r = s.rotated(90.0);
        assert_eq!((r.width(), r.height()), (2, 4));
        assert_eq!(r.mask().count(), 8);
    }

    #[test]
    fn diagonal_rotation_grows_bounds() {
        let s = Sprite::solid(6, 6, Rgb::WHITE);
        let r = s.rotated(45.0);
        assert!(r.width() > 6 && r.height() > 6);
        // Corners of the expanded box stay transparent.
        assert_eq!(r.get(0, 0), None);
    }

    #[test]
    fn mask_overlap_respects_transparency() {
        let ring = Sprite::parse("WWW\nW.W\nWWW").unwrap().mask();
        let dot = Sprite::parse("W").unwrap().mask();
        assert!(!ring.overlaps(&dot, (1, 1)));
        assert!(ring.overlaps(&dot, (0, 1)));
        assert!(!ring.overlaps(&dot, (3, 0)));
        assert!(!ring.overlaps(&dot, (-1, 0)));
    }

    #[test]
    fn blend_endpoints() {
        let c = Rgb(100, 50, 0);
        assert_eq!(c.blend(Rgb::BLACK, 0.0), c);
        assert_eq!(c.blend(Rgb::BLACK, 1.0), Rgb::BLACK);
        assert_eq!(c.blend(Rgb(200, 150, 100), 0.5), Rgb(150, 100, 50));
    }
}
