/// Geosphere Core Library - a software-rasterized, rippling icosphere
///
/// This library provides the host-independent part of the renderer: mesh
/// generation and caching, vertex animation, rotation, orthographic
/// projection, scanline rasterization and the per-tick frame driver.

pub mod animate;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod projection;
pub mod raster;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use animate::{animate, Ripple};
pub use config::SphereConfig;
pub use error::{ConfigError, GeometryError, RenderError};
pub use frame::{FrameDriver, Pipeline};
pub use geometry::{lod_for_scale, Face, MeshCache, Point3D, SphereMesh};
pub use projection::{OrthoCamera, Vec2};
pub use raster::{lerp_color, Canvas, Palette, Rgba};
pub use transform::{SpinState, Transform};
pub use view::{FrameInput, ViewState, ViewUpdate, WindowMove};
