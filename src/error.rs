use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or checking lab geometry.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("cylinder needs at least 3 segments, got {0}")]
    TooFewSegments(u32),

    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfBounds {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh has {faces} faces but {normals} normals")]
    NormalCountMismatch { faces: usize, normals: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter found")]
    NoAdapter,

    #[error("failed to acquire graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}
