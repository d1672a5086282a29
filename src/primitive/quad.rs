use crate::core::{intersection::Intersection, loader::InputParams, ray::Ray};

use super::PrimitiveT;

/// Parallelogram spanned by `edge_u` and `edge_v` from `corner`. Its normal is
/// `edge_u x edge_v`.
pub struct Quad {
    corner: glam::Vec3A,
    edge_u: glam::Vec3A,
    edge_v: glam::Vec3A,
    normal: glam::Vec3A,
    /// `n / (n . n)` for the unnormalized normal, used to find plane coordinates.
    w: glam::Vec3A,
    area: f32,
}

impl Quad {
    pub fn new(corner: glam::Vec3A, edge_u: glam::Vec3A, edge_v: glam::Vec3A) -> Self {
        let n = edge_u.cross(edge_v);
        let area = n.length();
        Self {
            corner,
            edge_u,
            edge_v,
            normal: n / area,
            w: n / n.length_squared(),
            area,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let corner: glam::Vec3A = params.get_float3("corner")?.into();
        let edge_u: glam::Vec3A = params.get_float3("edge_u")?.into();
        let edge_v: glam::Vec3A = params.get_float3("edge_v")?.into();
        if edge_u.cross(edge_v).length_squared() == 0.0 {
            anyhow::bail!(format!("{} - edges should not be parallel", params.name()));
        }

        Ok(Quad::new(corner, edge_u, edge_v))
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.corner - ray.origin).dot(self.normal) / denom;
        let planar = ray.point_at(t) - self.corner;
        let alpha = self.w.dot(planar.cross(self.edge_v));
        let beta = self.w.dot(self.edge_u.cross(planar));
        if (0.0..=1.0).contains(&alpha) && (0.0..=1.0).contains(&beta) {
            Some(t)
        } else {
            None
        }
    }
}

impl PrimitiveT for Quad {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        self.intersect_ray(ray)
            .map_or(false, |t| ray.t_min < t && t < t_max)
    }

    fn intersect<'a>(&'a self, ray: &Ray, inter: &mut Intersection<'a>) -> bool {
        if let Some(t) = self.intersect_ray(ray) {
            if ray.t_min < t && t < inter.t {
                inter.t = t;
                inter.position = ray.point_at(t);
                inter.normal = self.normal;
                return true;
            }
        }
        false
    }

    fn sample(&self, u: (f32, f32)) -> (glam::Vec3A, glam::Vec3A) {
        (self.corner + self.edge_u * u.0 + self.edge_v * u.1, self.normal)
    }

    fn surface_area(&self) -> f32 {
        self.area
    }
}
