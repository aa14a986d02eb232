//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// 8-bit RGB channels to float RGBA
pub const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    use super::{rgb, with_alpha};

    pub const BACKGROUND: [f32; 4] = rgb(0x1a, 0x1a, 0x1a);
    pub const TILE: [f32; 4] = rgb(0x22, 0x22, 0x22);
    pub const TILE_EDGE: [f32; 4] = rgb(0x11, 0x11, 0x11);

    pub const OBSTACLE: [f32; 4] = rgb(0x55, 0x55, 0x55);
    pub const OBSTACLE_EDGE: [f32; 4] = rgb(0x33, 0x33, 0x33);

    pub const FOOD: [f32; 4] = rgb(0xff, 0xd7, 0x00);
    pub const FOOD_RIM: [f32; 4] = rgb(0xda, 0xa5, 0x20);
    pub const FOOD_CENTER: [f32; 4] = rgb(0xb8, 0x86, 0x0b);

    pub const RUBY: [f32; 4] = rgb(0xe0, 0x31, 0x31);
    pub const RUBY_EDGE: [f32; 4] = rgb(0xa6, 0x1e, 0x4d);
    pub const RUBY_SHINE: [f32; 4] = rgb(0xff, 0x6b, 0x6b);

    pub const SNAKE_BODY: [f32; 4] = rgb(0x4e, 0xcc, 0xa3);
    pub const SNAKE_HEAD: [f32; 4] = rgb(0x6e, 0xff, 0xc8);
    pub const SNAKE_FLASH: [f32; 4] = rgb(0xff, 0xff, 0x00);

    pub const LOW_TIME_PULSE: [f32; 4] = with_alpha(rgb(0xff, 0x00, 0x00), 0.3);
    pub const PAUSE_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const GAME_OVER_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
}
