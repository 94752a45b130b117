//! Rendering layer: world state in, pixels and text out.
//!
//! [`draw`] paints one frame onto a [`Surface`] without touching the world;
//! [`render`] additionally presents it on the terminal. No game logic lives
//! here.

use std::io::Write;

use crate::entities::GameState;
use crate::sprite::Rgb;
use crate::surface::Surface;
use crate::world::GameWorld;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Rgb = Rgb(36, 28, 44);
const C_SCORE: Rgb = Rgb(240, 240, 240);
const C_SCORE_BOX: Rgb = Rgb(240, 240, 240);
const C_HINT: Rgb = Rgb(110, 110, 120);
const C_DIM: Rgb = Rgb::BLACK;
const C_WIN_TINT: Rgb = Rgb(30, 110, 190);
const C_DIED: Rgb = Rgb(230, 60, 50);
const C_WON: Rgb = Rgb(90, 230, 120);
const C_FINAL_SCORE: Rgb = Rgb(250, 220, 80);
const C_PROMPT: Rgb = Rgb::WHITE;

const DIM_ALPHA: f32 = 0.6;
const TINT_ALPHA: f32 = 0.45;

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame to the terminal.
pub fn render<W: Write>(
    out: &mut W,
    surface: &mut Surface,
    world: &GameWorld,
    now: u64,
) -> std::io::Result<()> {
    draw(surface, world, now);
    surface.present(out)
}

/// Paint one complete frame onto `surface`.
pub fn draw(surface: &mut Surface, world: &GameWorld, now: u64) {
    surface.fill(C_BACKGROUND);

    for entity in world.registry().iter() {
        if let Some(sprite) = entity.sprite() {
            surface.blit(sprite, entity.rect().pixel_origin());
        }
    }

    let score = world.score(now);
    match world.state() {
        GameState::Playing => {
            draw_score_box(surface, score);
            draw_controls_hint(surface);
        }
        GameState::GameOver => {
            surface.shade(C_DIM, DIM_ALPHA);
            draw_end_screen(surface, "YOU  DIED", C_DIED, score, "R - Retry   Q - Quit");
        }
        GameState::Win => {
            surface.shade(C_WIN_TINT, TINT_ALPHA);
            draw_end_screen(surface, "YOU  WIN", C_WON, score, "R - Play Again   Q - Quit");
        }
    }
}

// ── Score readout ─────────────────────────────────────────────────────────────

fn draw_score_box(surface: &mut Surface, score: u32) {
    let label = format!("Score: {}", score);
    let len = label.chars().count();
    let row = surface.rows().saturating_sub(3);
    let col = (surface.width() / 2).saturating_sub(len / 2);
    surface.text(col, row, &label, C_SCORE);

    // Box in pixel space around the text cells.
    let x = col as i64 - 2;
    let y = row as i64 * 2 - 2;
    surface.outline(x, y, len as i64 + 4, 6, C_SCORE_BOX);
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint(surface: &mut Surface) {
    let row = surface.rows().saturating_sub(1);
    surface.text(1, row, "←↑↓→ / WASD : Move   SPACE : Shoot   ESC : Exit", C_HINT);
}

// ── End screens ───────────────────────────────────────────────────────────────

fn draw_end_screen(surface: &mut Surface, title: &str, title_color: Rgb, score: u32, prompt: &str) {
    let inner = 20usize.max(title.chars().count() + 4);
    let pad = inner - title.chars().count();
    let top = format!("╔{}╗", "═".repeat(inner));
    let middle = format!(
        "║{}{}{}║",
        " ".repeat(pad / 2),
        title,
        " ".repeat(pad - pad / 2)
    );
    let bottom = format!("╚{}╝", "═".repeat(inner));
    let score_line = format!("Final Score: {}", score);

    let lines: [(&str, Rgb); 5] = [
        (&top, title_color),
        (&middle, title_color),
        (&bottom, title_color),
        (&score_line, C_FINAL_SCORE),
        (prompt, C_PROMPT),
    ];

    let start_row = (surface.rows() / 2).saturating_sub(lines.len() / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        surface.text_centered(start_row + i, msg, *color);
    }
}
