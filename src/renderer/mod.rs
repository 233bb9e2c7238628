//! WebGPU rendering module
//!
//! The scene is rebuilt every frame as a flat triangle list in canvas pixels;
//! the pipeline converts to clip space and draws it in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SceneOptions, Scenery};
pub use shapes::SpriteSheet;
pub use vertex::Vertex;
