//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in canvas pixels (y down).

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::Aabb;

/// Two triangles covering `rect`, with per-corner colors (tl, tr, bl, br)
fn quad_with_colors(out: &mut Vec<Vertex>, rect: &Aabb, corners: [[f32; 4]; 4]) {
    let (l, r, t, b) = (rect.left(), rect.right(), rect.top(), rect.bottom());
    let [tl, tr, bl, br] = corners;
    out.extend_from_slice(&[
        Vertex::new(l, t, tl),
        Vertex::new(r, t, tr),
        Vertex::new(l, b, bl),
        Vertex::new(r, t, tr),
        Vertex::new(r, b, br),
        Vertex::new(l, b, bl),
    ]);
}

/// Solid rectangle
pub fn rect(out: &mut Vec<Vertex>, rect: &Aabb, color: [f32; 4]) {
    quad_with_colors(out, rect, [color; 4]);
}

/// Rectangle fading from `top` to `bottom`
pub fn vertical_gradient(out: &mut Vec<Vertex>, rect: &Aabb, top: [f32; 4], bottom: [f32; 4]) {
    quad_with_colors(out, rect, [top, top, bottom, bottom]);
}

/// Rectangle border drawn inside `rect`
pub fn outline(out: &mut Vec<Vertex>, r: &Aabb, thickness: f32, color: [f32; 4]) {
    let t = thickness.min(r.size.x * 0.5).min(r.size.y * 0.5);
    let inner_h = r.size.y - 2.0 * t;
    // top, bottom, left, right
    rect(out, &Aabb::from_xywh(r.left(), r.top(), r.size.x, t), color);
    rect(out, &Aabb::from_xywh(r.left(), r.bottom() - t, r.size.x, t), color);
    rect(out, &Aabb::from_xywh(r.left(), r.top() + t, t, inner_h), color);
    rect(out, &Aabb::from_xywh(r.right() - t, r.top() + t, t, inner_h), color);
}

/// Filled circle as a triangle fan
pub fn disc(out: &mut Vec<Vertex>, center: Vec2, radius: f32, segments: u32, color: [f32; 4]) {
    let segments = segments.max(3);
    for i in 0..segments {
        let a0 = TAU * i as f32 / segments as f32;
        let a1 = TAU * (i + 1) as f32 / segments as f32;
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * a0.cos(),
            center.y + radius * a0.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * a1.cos(),
            center.y + radius * a1.sin(),
            color,
        ));
    }
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    let (a, b, c, d) = (from + perp, from - perp, to + perp, to - perp);
    out.extend_from_slice(&[
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]);
}

/// Texture region in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    /// Same region mirrored left-to-right
    pub fn flipped_x(self) -> Self {
        Self {
            u0: self.u1,
            u1: self.u0,
            ..self
        }
    }
}

/// Sprite sheet made of equally sized frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub frame_size: Vec2,
    pub sheet_size: Vec2,
}

impl SpriteSheet {
    /// The runner sheet: 48x48 frames
    pub fn runner(sheet_width: u32, sheet_height: u32) -> Self {
        Self {
            frame_size: Vec2::splat(48.0),
            sheet_size: Vec2::new(sheet_width as f32, sheet_height as f32),
        }
    }

    pub fn frame(&self, column: u32, row: u32) -> UvRect {
        let origin = Vec2::new(column as f32, row as f32) * self.frame_size / self.sheet_size;
        let extent = self.frame_size / self.sheet_size;
        UvRect {
            u0: origin.x,
            v0: origin.y,
            u1: origin.x + extent.x,
            v1: origin.y + extent.y,
        }
    }
}

/// Textured rectangle
pub fn sprite(out: &mut Vec<Vertex>, r: &Aabb, uv: UvRect) {
    let (l, rt, t, b) = (r.left(), r.right(), r.top(), r.bottom());
    out.extend_from_slice(&[
        Vertex::textured(l, t, uv.u0, uv.v0),
        Vertex::textured(rt, t, uv.u1, uv.v0),
        Vertex::textured(l, b, uv.u0, uv.v1),
        Vertex::textured(rt, t, uv.u1, uv.v0),
        Vertex::textured(rt, b, uv.u1, uv.v1),
        Vertex::textured(l, b, uv.u0, uv.v1),
    ]);
}

/// 3x5 bitmap glyphs, one row per u8 (low 3 bits, MSB on the left)
fn glyph(c: char) -> Option<[u8; 5]> {
    Some(match c {
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
        _ => return None,
    })
}

/// Width in cells of `text` rendered with `pixel_text`
pub fn pixel_text_width(text: &str) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 { 0 } else { n * 4 - 1 }
}

/// Blocky digits; each lit cell is a `cell`-sized square
pub fn pixel_text(out: &mut Vec<Vertex>, text: &str, origin: Vec2, cell: f32, color: [f32; 4]) {
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let glyph_x = origin.x + (i as f32) * 4.0 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    let cell_rect = Aabb::from_xywh(
                        glyph_x + col as f32 * cell,
                        origin.y + row as f32 * cell,
                        cell,
                        cell,
                    );
                    rect(out, &cell_rect, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let mut out = Vec::new();
        rect(&mut out, &Aabb::from_xywh(10.0, 20.0, 30.0, 40.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_outline_stays_inside() {
        let r = Aabb::from_xywh(0.0, 0.0, 20.0, 10.0);
        let mut out = Vec::new();
        outline(&mut out, &r, 1.0, [1.0; 4]);
        assert_eq!(out.len(), 24);
        assert!(out.iter().all(|v| {
            (0.0..=20.0).contains(&v.position[0]) && (0.0..=10.0).contains(&v.position[1])
        }));
    }

    #[test]
    fn test_sprite_frame_uv() {
        let sheet = SpriteSheet::runner(192, 192);
        let uv = sheet.frame(0, 2);
        assert_eq!(uv, UvRect { u0: 0.0, v0: 0.5, u1: 0.25, v1: 0.75 });

        let flipped = uv.flipped_x();
        assert_eq!((flipped.u0, flipped.u1), (0.25, 0.0));
    }

    #[test]
    fn test_pixel_text_404() {
        let mut out = Vec::new();
        pixel_text(&mut out, "404", Vec2::ZERO, 2.0, [1.0; 4]);
        // '4' lights 9 cells, '0' lights 12
        assert_eq!(out.len(), (9 + 12 + 9) * 6);
        assert_eq!(pixel_text_width("404"), 11);
        assert!(out.iter().all(|v| v.position[0] <= 22.0 && v.position[1] <= 10.0));
    }

    #[test]
    fn test_degenerate_line_is_skipped() {
        let mut out = Vec::new();
        line(&mut out, Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]);
        assert!(out.is_empty());
    }
}
