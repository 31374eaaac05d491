//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (canvas pixels until mapped) and color
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

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.93, 0.96, 1.0, 1.0];
    pub const BUBBLE_RIM: [f32; 4] = [1.0, 1.0, 1.0, 0.85];
    pub const BUBBLE_DRAGGED_RIM: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const LABEL: [f32; 4] = [0.1, 0.1, 0.2, 1.0];
    pub const LABEL_LIGHT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const RIPPLE: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const NODE_BASE: [f32; 4] = [0.95, 0.55, 0.2, 1.0];
    pub const NODE_SUM: [f32; 4] = [0.35, 0.7, 0.35, 1.0];
    pub const NODE_PART: [f32; 4] = [0.55, 0.45, 0.85, 1.0];
    pub const NODE_SELECTED_RIM: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const NODE_TARGET_RIM: [f32; 4] = [0.95, 0.2, 0.35, 1.0];
    pub const CONNECTION: [f32; 4] = [0.45, 0.45, 0.55, 1.0];
    pub const DRAG_LINE: [f32; 4] = [0.2, 0.5, 0.95, 0.8];

    /// Bubble fill, cycling through a bright palette by value
    pub const BUBBLE_PALETTE: [[f32; 4]; 6] = [
        [0.98, 0.45, 0.45, 0.85],
        [0.98, 0.7, 0.3, 0.85],
        [0.95, 0.88, 0.35, 0.85],
        [0.45, 0.82, 0.5, 0.85],
        [0.4, 0.7, 0.98, 0.85],
        [0.72, 0.5, 0.95, 0.85],
    ];

    pub fn bubble_fill(value: u32) -> [f32; 4] {
        BUBBLE_PALETTE[value as usize % BUBBLE_PALETTE.len()]
    }

    /// Same color with alpha scaled
    pub fn fade(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
    }
}
