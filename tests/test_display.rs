use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_shooter::assets::Assets;
use space_shooter::config::GameConfig;
use space_shooter::display;
use space_shooter::entities::GameState;
use space_shooter::input::InputState;
use space_shooter::sprite::Rgb;
use space_shooter::surface::Surface;
use space_shooter::world::GameWorld;

const BACKGROUND: Rgb = Rgb(36, 28, 44);

fn make_world() -> GameWorld {
    let assets = Assets::builtin().unwrap();
    GameWorld::new(
        GameConfig::default(),
        assets,
        120,
        60,
        0,
        &mut StdRng::seed_from_u64(42),
    )
    .unwrap()
}

fn all_text(surface: &Surface) -> Vec<String> {
    (0..surface.rows()).map(|r| surface.row_text(r)).collect()
}

fn crash(world: &mut GameWorld, now: u64) {
    let center = world.registry().player().unwrap().rect.center();
    world.spawn_meteor_at(center, Vec2::Y, 1.0, 0.0, now);
    world.tick(now, 0.0, &InputState::default());
    assert_eq!(world.state(), GameState::GameOver);
}

/// Terminal output with CSI sequences removed.
fn strip_escapes(raw: &str) -> String {
    let mut plain = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            plain.push(ch);
        }
    }
    plain
}

/// A background pixel in the upper half of the frame, away from the ship.
fn background_pixel(surface: &Surface) -> (usize, usize) {
    (0..20)
        .flat_map(|y| (0..surface.width()).map(move |x| (x, y)))
        .find(|&(x, y)| surface.pixel(x, y) == Some(BACKGROUND))
        .unwrap()
}

#[test]
fn playing_frame_shows_score_box_and_hint() {
    let world = make_world();
    let mut surface = Surface::new(120, 60);
    display::draw(&mut surface, &world, 1234);

    let score_row = surface.row_text(surface.rows() - 3);
    assert!(score_row.contains("Score: 12"), "{score_row:?}");
    let hint = surface.row_text(surface.rows() - 1);
    assert!(hint.contains("SPACE : Shoot"));
    assert!(!all_text(&surface).iter().any(|r| r.contains("Final Score")));
}

#[test]
fn sprites_are_drawn_at_their_rects() {
    let world = make_world();
    let mut surface = Surface::new(120, 60);
    display::draw(&mut surface, &world, 0);

    let player = world.registry().player().unwrap();
    let (ox, oy) = player.rect.pixel_origin();
    let nose = world.assets().player.get(3, 0);
    assert!(nose.is_some());
    assert_eq!(surface.pixel(ox as usize + 3, oy as usize), nose);
}

#[test]
fn game_over_dims_screen_and_shows_final_score() {
    let mut world = make_world();
    let mut surface = Surface::new(120, 60);
    display::draw(&mut surface, &world, 0);
    let (x, y) = background_pixel(&surface);

    crash(&mut world, 4321);
    display::draw(&mut surface, &world, 9999);

    let lines = all_text(&surface);
    assert!(lines.iter().any(|r| r.contains("YOU  DIED")));
    assert!(lines.iter().any(|r| r.contains("Final Score: 43")));
    assert!(lines.iter().any(|r| r.contains("R - Retry")));
    assert!(!lines.iter().any(|r| r.contains("SPACE : Shoot")));
    assert_eq!(surface.pixel(x, y), Some(BACKGROUND.blend(Rgb::BLACK, 0.6)));
}

#[test]
fn win_frame_is_tinted_and_congratulates() {
    let mut world = make_world();
    let mut surface = Surface::new(120, 60);
    display::draw(&mut surface, &world, 0);
    let (x, y) = background_pixel(&surface);

    world.tick(30_000, 0.0, &InputState::default());
    display::draw(&mut surface, &world, 31_000);

    let lines = all_text(&surface);
    assert!(lines.iter().any(|r| r.contains("YOU  WIN")));
    assert!(lines.iter().any(|r| r.contains("Final Score: 300")));
    assert!(lines.iter().any(|r| r.contains("Play Again")));
    assert!(surface.row_text(surface.rows() - 3).trim().is_empty());

    let tinted = surface.pixel(x, y).unwrap();
    assert_ne!(tinted, BACKGROUND);
    assert!(tinted.2 > BACKGROUND.2);
}

#[test]
fn render_writes_the_frame() {
    let world = make_world();
    let mut surface = Surface::new(120, 60);
    let mut out = Vec::new();
    display::render(&mut out, &mut surface, &world, 500).unwrap();
    let printed = strip_escapes(&String::from_utf8(out).unwrap());
    assert!(printed.contains("Score: 5"));
    assert!(printed.contains('▀'));
}
