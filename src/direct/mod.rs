//! Visibility-budgeted direct lighting.
//!
//! Every light is represented by a fixed set of candidates built once per
//! render. At a shading point all candidates are evaluated without shadows,
//! ranked by luminance and resolved against the scene only until the
//! [`StoppingRule`] is satisfied. The remaining candidates are extrapolated
//! from the hit rates gathered in a [`LightStatisticsStore`] shared by all
//! render threads.

mod candidate;
mod estimator;
mod statistics;
mod stopping;

pub use candidate::*;
pub use estimator::*;
pub use statistics::*;
pub use stopping::*;

use crate::core::{color::Color, ray::Ray};

/// Local surface data of the point being shaded, in world space.
#[derive(Copy, Clone, Debug)]
pub struct ShadingPoint {
    pub position: glam::Vec3A,
    pub normal: glam::Vec3A,
    pub wo: glam::Vec3A,
}

/// Shadow segment between a shading point and a sampled light position.
#[derive(Copy, Clone, Debug)]
pub struct VisibilityQuery {
    pub origin: glam::Vec3A,
    pub direction: glam::Vec3A,
    pub distance: f32,
}

impl VisibilityQuery {
    const SHADOW_EPS: f32 = 0.001;

    pub fn new(origin: glam::Vec3A, direction: glam::Vec3A, distance: f32) -> Self {
        Self {
            origin,
            direction,
            distance,
        }
    }

    /// The query's shadow ray and the largest `t` it should be tested to.
    pub fn shadow_ray(&self) -> (Ray, f32) {
        (Ray::new(self.origin, self.direction), self.distance - Self::SHADOW_EPS)
    }
}

pub struct IncidentSample {
    pub wi: glam::Vec3A,
    pub pdf: f32,
    pub radiance: Color,
    pub visibility: VisibilityQuery,
}

impl IncidentSample {
    pub fn none(position: glam::Vec3A) -> Self {
        Self {
            wi: glam::Vec3A::Z,
            pdf: 0.0,
            radiance: Color::BLACK,
            visibility: VisibilityQuery::new(position, glam::Vec3A::Z, 0.0),
        }
    }
}

/// A light as seen by the estimator.
pub trait LightSampler: Send + Sync {
    /// Unshadowed radiance arriving at `point` from the light position that
    /// `u` maps to.
    fn sample_incident(&self, point: &ShadingPoint, u: (f32, f32)) -> IncidentSample;

    /// How many candidates the light asks for.
    fn sample_count(&self) -> u32 {
        1
    }
}

pub trait Occluder: Sync {
    fn is_unoccluded(&self, query: &VisibilityQuery) -> bool;
}

pub trait MaterialEvaluator {
    /// Non-specular scattering from `wi` towards `wo`.
    fn evaluate(&self, wo: glam::Vec3A, wi: glam::Vec3A, normal: glam::Vec3A) -> Color;
}
