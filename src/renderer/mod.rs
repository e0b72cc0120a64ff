pub mod camera;
pub mod gpu;
pub mod plot2d;
pub mod scene;
pub mod vertex;

pub use camera::{Camera, CameraMode};
pub use gpu::{GpuState, SceneUniform, Viewport};
pub use vertex::ColorVertex;
