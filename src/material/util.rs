pub fn reflect_n(i: glam::Vec3A, n: glam::Vec3A) -> glam::Vec3A {
    2.0 * i.dot(n) * n - i
}

/// Refracts `i` through the boundary with normal `n`; `ior` is the index of
/// the side `n` points away from. `None` on total internal reflection.
pub fn refract_n(i: glam::Vec3A, n: glam::Vec3A, ior: f32) -> Option<glam::Vec3A> {
    let cos_i = i.dot(n);
    let ior_ratio = ior_ratio(cos_i, ior);
    let o_z_sqr = 1.0 - (1.0 - cos_i * cos_i) * ior_ratio * ior_ratio;
    if o_z_sqr < 0.0 {
        return None;
    }
    if cos_i >= 0.0 {
        Some((ior_ratio * cos_i - o_z_sqr.sqrt()) * n - ior_ratio * i)
    } else {
        Some((o_z_sqr.sqrt() + ior_ratio * cos_i) * n - ior_ratio * i)
    }
}

/// `eta_i / eta_t` for light arriving along `-i`.
pub fn ior_ratio(cos_i: f32, ior: f32) -> f32 {
    if cos_i >= 0.0 {
        1.0 / ior
    } else {
        ior
    }
}

/// Unpolarized dielectric Fresnel reflectance.
pub fn fresnel_n(ior: f32, i: glam::Vec3A, n: glam::Vec3A) -> f32 {
    let (i_ior, o_ior) = if i.dot(n) >= 0.0 {
        (1.0, ior)
    } else {
        (ior, 1.0)
    };

    if let Some(refract) = refract_n(i, n, ior) {
        let idotn = i.dot(n).abs();
        let rdotn = refract.dot(n).abs();

        let rs = (i_ior * idotn - o_ior * rdotn) / (i_ior * idotn + o_ior * rdotn);
        let rp = (i_ior * rdotn - o_ior * idotn) / (i_ior * rdotn + o_ior * idotn);

        0.5 * (rs * rs + rp * rp)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_mirrors_about_normal() {
        let i = glam::Vec3A::new(1.0, 1.0, 0.0).normalize();
        let r = reflect_n(i, glam::Vec3A::Y);
        assert!((r - glam::Vec3A::new(-1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn normal_incidence_passes_straight() {
        let t = refract_n(glam::Vec3A::Y, glam::Vec3A::Y, 1.5).unwrap();
        assert!((t + glam::Vec3A::Y).length() < 1e-6);
        // ((1 - 1.5) / (1 + 1.5))^2
        assert!((fresnel_n(1.5, glam::Vec3A::Y, glam::Vec3A::Y) - 0.04).abs() < 1e-5);
    }

    #[test]
    fn total_internal_reflection() {
        let i = glam::Vec3A::new(0.9, -0.1, 0.0).normalize();
        assert!(refract_n(i, glam::Vec3A::Y, 1.5).is_none());
        assert_eq!(fresnel_n(1.5, i, glam::Vec3A::Y), 1.0);
    }
}
