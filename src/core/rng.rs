use rand::SeedableRng;

pub struct Rng {
    rng: rand::rngs::SmallRng,
}

impl Rng {
    pub fn new() -> Self {
        Self {
            rng: rand::rngs::SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: rand::rngs::SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, from entropy otherwise.
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    pub fn uniform_1d(&mut self) -> f32 {
        rand::Rng::gen(&mut self.rng)
    }

    pub fn uniform_2d(&mut self) -> (f32, f32) {
        (self.uniform_1d(), self.uniform_1d())
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a 2D sample to a direction on the unit sphere, uniform in solid angle.
pub fn uniform_on_sphere(u: (f32, f32)) -> glam::Vec3A {
    let phi = u.0 * 2.0 * std::f32::consts::PI;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let cos_theta = 1.0 - 2.0 * u.1;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    glam::Vec3A::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}
