//! Computational geometry labs: a polar rose plotter, dodecahedron
//! projections and an interactive tessellated barrel, drawn with wgpu.

pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod renderer;
pub mod ui;
