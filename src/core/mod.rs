pub mod color;
pub mod film;
pub mod intersection;
pub mod loader;
pub mod ray;
pub mod rng;
pub mod scene;
pub mod scene_resources;
pub mod surface;
