pub mod camera;
pub mod core;
pub mod direct;
pub mod light;
pub mod loader;
pub mod material;
pub mod primitive;
pub mod renderer;
pub mod sampler;
