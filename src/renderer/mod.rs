//! WebGPU rendering module
//!
//! Shapes are tessellated on the CPU from a read-only view of the active
//! game and drawn as one flat-colored triangle list.

pub mod pipeline;
pub mod ripple;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use ripple::{Ripple, RippleField};
pub use vertex::Vertex;
