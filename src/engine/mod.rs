pub mod mesh;
pub mod renderer;
