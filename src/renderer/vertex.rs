//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in canvas pixels with color and optional sprite sampling
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    /// 0 = flat color, 1 = sprite texel tinted by `color`
    pub texture_weight: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
            uv: [0.0, 0.0],
            texture_weight: 0.0,
        }
    }

    pub const fn textured(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            color: [1.0, 1.0, 1.0, 1.0],
            uv: [u, v],
            texture_weight: 1.0,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4,
        2 => Float32x2,
        3 => Float32,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.53, 0.81, 0.92, 1.0]; // #87CEEB
    pub const SKY_HORIZON: [f32; 4] = [0.88, 0.97, 1.0, 1.0]; // #E0F7FF
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const GRASS_TOP: [f32; 4] = [0.49, 0.99, 0.0, 1.0]; // #7CFC00
    pub const GRASS_BOTTOM: [f32; 4] = [0.13, 0.55, 0.13, 1.0]; // #228B22
    pub const GRASS_BLADE: [f32; 4] = [0.2, 0.8, 0.2, 1.0]; // #32CD32
    pub const OBSTACLE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const OBSTACLE_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER_PLACEHOLDER: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const HITBOX_PLAYER: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const HITBOX_OBSTACLE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const GAME_OVER_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
