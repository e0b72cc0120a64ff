pub mod cylinder;
pub mod dodecahedron;
pub mod mesh;
pub mod normals;
pub mod polar;
pub mod shading;

pub use cylinder::{CylinderParams, build_cylinder, build_stacked_cylinder};
pub use mesh::{Face, LitVertex, Mesh, flat_shaded_vertices};
pub use normals::{calculate_normals, face_normal};
pub use polar::PolarCurve;
