//! Snapshot to vertices
//!
//! Pure read of an engine snapshot; the engine is never touched from here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shapes::{self, SpriteSheet};
use super::vertex::{Vertex, colors};
use crate::sim::{Aabb, Snapshot};

/// Width the scenery layout was designed for
const DESIGN_WIDTH: f32 = 600.0;
/// Grass blade spacing at design width
const BLADE_SPACING: f32 = 10.0;
/// Pre-rolled blade heights, reused cyclically
const BLADE_TABLE: usize = 256;

/// Per-frame render inputs that are not engine state
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOptions {
    /// Loaded sprite sheet; None draws the placeholder
    pub sprite: Option<SpriteSheet>,
    /// Freeze cloud parallax and grass sway
    pub reduced_motion: bool,
}

/// Static decoration rolled once per session
#[derive(Debug, Clone)]
pub struct Scenery {
    blade_heights: Vec<f32>,
}

impl Scenery {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let blade_heights = (0..BLADE_TABLE).map(|_| rng.random_range(4.0..10.0)).collect();
        Self { blade_heights }
    }

    fn blade_height(&self, index: usize) -> f32 {
        self.blade_heights[index % self.blade_heights.len()]
    }
}

/// Build the full frame in canvas pixels
pub fn build(snap: &Snapshot, options: &SceneOptions, scenery: &Scenery) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(2048);
    let field = snap.field_size;
    let scale = field.x / DESIGN_WIDTH;
    let horizon = snap.horizon_y;

    // Sky and ground
    shapes::vertical_gradient(
        &mut out,
        &Aabb::from_xywh(0.0, 0.0, field.x, horizon),
        colors::SKY_TOP,
        colors::SKY_HORIZON,
    );
    shapes::vertical_gradient(
        &mut out,
        &Aabb::from_xywh(0.0, horizon, field.x, field.y - horizon),
        colors::GRASS_TOP,
        colors::GRASS_BOTTOM,
    );

    // Clouds drift with the obstacle for a cheap parallax
    let drift = if options.reduced_motion {
        0.0
    } else {
        snap.obstacle.pos.x.rem_euclid(field.x.max(1.0))
    };
    cloud(&mut out, Vec2::new(100.0, 60.0), [25.0, 20.0, 25.0], drift * 0.1, scale);
    cloud(&mut out, Vec2::new(400.0, 40.0), [20.0, 25.0, 20.0], drift * 0.05, scale);

    // Grass blades
    let spacing = BLADE_SPACING * scale.max(0.1);
    let blade_width = (2.0 * scale).max(1.0);
    let mut x = 0.0;
    let mut index = 0;
    while x < field.x {
        let height = scenery.blade_height(index) * scale;
        let bend = if options.reduced_motion {
            0.0
        } else {
            ((x + snap.obstacle.pos.x * 0.5) * 0.05).sin() * 2.0 * scale
        };
        shapes::line(
            &mut out,
            Vec2::new(x, horizon),
            Vec2::new(x + bend, horizon - height),
            blade_width,
            colors::GRASS_BLADE,
        );
        x += spacing;
        index += 1;
    }

    // Obstacle: black block labelled 404
    let obstacle = snap.obstacle.bounds();
    shapes::rect(&mut out, &obstacle, colors::OBSTACLE);
    let cell = obstacle.size.x * 0.8 / shapes::pixel_text_width("404") as f32;
    let label_size = Vec2::new(shapes::pixel_text_width("404") as f32, 5.0) * cell;
    shapes::pixel_text(
        &mut out,
        "404",
        obstacle.center() - label_size * 0.5,
        cell,
        colors::OBSTACLE_TEXT,
    );

    // Player faces right: the sheet faces left, so mirror it
    let player = snap.player.bounds();
    match options.sprite {
        Some(sheet) => {
            let row = if snap.player.is_jumping { 0 } else { 2 };
            shapes::sprite(&mut out, &player, sheet.frame(0, row).flipped_x());
        }
        None => shapes::rect(&mut out, &player, colors::PLAYER_PLACEHOLDER),
    }

    if snap.debug_mode {
        shapes::outline(&mut out, &snap.player_hitbox, 1.0, colors::HITBOX_PLAYER);
        shapes::outline(&mut out, &obstacle, 1.0, colors::HITBOX_OBSTACLE);
    }

    if snap.is_over() {
        shapes::rect(
            &mut out,
            &Aabb::from_xywh(0.0, 0.0, field.x, field.y),
            colors::GAME_OVER_SHADE,
        );
    }

    out
}

/// Three overlapping puffs at design coordinates
fn cloud(out: &mut Vec<Vertex>, anchor: Vec2, radii: [f32; 3], offset: f32, scale: f32) {
    for (i, radius) in radii.iter().enumerate() {
        let center = Vec2::new(anchor.x + 30.0 * i as f32, anchor.y) * scale + Vec2::X * offset;
        shapes::disc(out, center, radius * scale, 20, colors::CLOUD);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Engine, EngineConfig};

    fn engine() -> Engine {
        Engine::new(EngineConfig::desktop())
    }

    fn has_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color == color && v.texture_weight == 0.0)
    }

    #[test]
    fn test_placeholder_without_sprite() {
        let snap = engine().snapshot();
        let out = build(&snap, &SceneOptions::default(), &Scenery::new(1));
        assert!(has_color(&out, colors::PLAYER_PLACEHOLDER));
        assert!(out.iter().all(|v| v.texture_weight == 0.0));
    }

    #[test]
    fn test_sprite_is_mirrored_and_uses_running_row() {
        let snap = engine().snapshot();
        let options = SceneOptions {
            sprite: Some(SpriteSheet::runner(192, 192)),
            ..Default::default()
        };
        let out = build(&snap, &options, &Scenery::new(1));
        let textured: Vec<&Vertex> = out.iter().filter(|v| v.texture_weight == 1.0).collect();
        assert_eq!(textured.len(), 6);
        assert!(!has_color(&out, colors::PLAYER_PLACEHOLDER));

        // Left edge samples the right side of the frame
        let left = textured
            .iter()
            .find(|v| v.position[0] == snap.player.pos.x)
            .unwrap();
        assert_eq!(left.uv[0], 0.25);
        assert!(left.uv[1] >= 0.5);
    }

    #[test]
    fn test_debug_outlines_only_in_debug_mode() {
        let mut engine = engine();
        let scenery = Scenery::new(7);
        let plain = build(&engine.snapshot(), &SceneOptions::default(), &scenery);
        assert!(!has_color(&plain, colors::HITBOX_PLAYER));

        engine.set_debug_mode(true);
        let debug = build(&engine.snapshot(), &SceneOptions::default(), &scenery);
        assert!(has_color(&debug, colors::HITBOX_PLAYER));
        assert!(has_color(&debug, colors::HITBOX_OBSTACLE));
    }

    #[test]
    fn test_game_over_shade_drawn_last() {
        let mut engine = engine();
        while engine.snapshot().is_running() {
            engine.update(1.0);
        }
        let out = build(&engine.snapshot(), &SceneOptions::default(), &Scenery::new(3));
        assert!(out[out.len() - 6..]
            .iter()
            .all(|v| v.color == colors::GAME_OVER_SHADE));
    }

    #[test]
    fn test_reduced_motion_is_stable_while_obstacle_moves() {
        let mut engine = engine();
        let scenery = Scenery::new(5);
        let options = SceneOptions {
            reduced_motion: true,
            ..Default::default()
        };
        let first = build(&engine.snapshot(), &options, &scenery);
        engine.update(1.0);
        let second = build(&engine.snapshot(), &options, &scenery);

        // Only the obstacle quad and its label move
        let moved = first
            .iter()
            .zip(&second)
            .filter(|(a, b)| a.position != b.position)
            .count();
        assert!(moved > 0);
        assert!(second.iter().zip(&first).all(|(b, a)| {
            a.position == b.position || a.color == colors::OBSTACLE || a.color == colors::OBSTACLE_TEXT
        }));
    }

    #[test]
    fn test_scenery_is_deterministic() {
        let a = Scenery::new(42);
        let b = Scenery::new(42);
        assert_eq!(a.blade_heights, b.blade_heights);
        assert!(a.blade_heights.iter().all(|h| (4.0..10.0).contains(h)));
    }
}
