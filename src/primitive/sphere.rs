use crate::core::{intersection::Intersection, loader::InputParams, ray::Ray, rng};

use super::PrimitiveT;

pub struct Sphere {
    center: glam::Vec3A,
    radius: f32,
}

impl Sphere {
    pub fn new(center: glam::Vec3A, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let center = params.get_float3_or("center", [0.0, 0.0, 0.0])?;
        let radius = params.get_float("radius")?;
        if radius <= 0.0 {
            anyhow::bail!(format!("{} - 'radius' should be positive", params.name()));
        }

        Ok(Sphere::new(center.into(), radius))
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;
        let delta = b * b - a * c;
        if delta >= 0.0 {
            let delta = delta.sqrt();
            let min = (-b - delta) / a;
            let max = (-b + delta) / a;
            Some((min, max))
        } else {
            None
        }
    }
}

impl PrimitiveT for Sphere {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        if let Some((min, max)) = self.intersect_ray(ray) {
            let t = if min > ray.t_min { min } else { max };
            ray.t_min < t && t < t_max
        } else {
            false
        }
    }

    fn intersect<'a>(&'a self, ray: &Ray, inter: &mut Intersection<'a>) -> bool {
        if let Some((min, max)) = self.intersect_ray(ray) {
            let t = if min > ray.t_min { min } else { max };
            if ray.t_min < t && t < inter.t {
                inter.t = t;
                inter.position = ray.point_at(t);
                inter.normal = (inter.position - self.center) / self.radius;
                return true;
            }
        }
        false
    }

    fn sample(&self, u: (f32, f32)) -> (glam::Vec3A, glam::Vec3A) {
        let normal = rng::uniform_on_sphere(u);
        (self.center + normal * self.radius, normal)
    }

    fn surface_area(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_front_and_back() {
        let sphere = Sphere::new(glam::Vec3A::ZERO, 1.0);

        let ray = Ray::new(glam::Vec3A::new(0.0, 0.0, -3.0), glam::Vec3A::Z);
        let mut inter = Intersection::default();
        assert!(sphere.intersect(&ray, &mut inter));
        assert!((inter.t - 2.0).abs() < 1e-5);
        assert!((inter.normal - glam::Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-5);

        let inside = Ray::new(glam::Vec3A::ZERO, glam::Vec3A::X);
        let mut inter = Intersection::default();
        assert!(sphere.intersect(&inside, &mut inter));
        assert!((inter.t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn occlusion_respects_t_max() {
        let sphere = Sphere::new(glam::Vec3A::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(glam::Vec3A::ZERO, glam::Vec3A::Z);
        assert!(sphere.intersect_test(&ray, 10.0));
        assert!(!sphere.intersect_test(&ray, 3.0));
    }

    #[test]
    fn samples_lie_on_surface() {
        let sphere = Sphere::new(glam::Vec3A::new(1.0, 2.0, 3.0), 2.0);
        for &u in &[(0.0, 0.0), (0.3, 0.7), (0.99, 0.5)] {
            let (position, normal) = sphere.sample(u);
            assert!(((position - glam::Vec3A::new(1.0, 2.0, 3.0)).length() - 2.0).abs() < 1e-4);
            assert!((normal.length() - 1.0).abs() < 1e-4);
        }
    }
}
