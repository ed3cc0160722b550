use core::f32::consts::PI;

use glam::Vec3;
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{F32Ext, Surface};

/// Cook-Torrance microfacet BRDF (GGX distribution, Smith/Schlick-GGX
/// geometry, Schlick's Fresnel) with a Lambertian diffuse lobe.
#[derive(Clone, Copy)]
pub struct CookTorrance<'a> {
    surface: &'a Surface,
}

impl<'a> CookTorrance<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }

    /// Returns radiance reflected towards `v` given `radiance` arriving from
    /// direction `l`; both directions point away from the surface.
    ///
    /// Cosine term is included; caller is responsible for rejecting lights
    /// below the horizon.
    pub fn eval(self, l: Vec3, v: Vec3, radiance: Vec3) -> Vec3 {
        let surface = self.surface;
        let n = surface.normal;
        let h = (l + v).normalize();

        let n_o_l = n.dot(l);
        let n_o_v = n.dot(v);

        let f = fresnel_schlick(surface.f0(), v.dot(h));
        let d = d_ggx(n.dot(h), surface.roughness);
        let g = g_smith(n_o_v, n_o_l, surface.roughness);

        let k_d = (Vec3::ONE - f) * (1.0 - surface.metallic);
        let diffuse = k_d * surface.albedo / PI;

        let specular = (f * d * g)
            / (4.0 * n_o_v.max(0.0) * n_o_l.max(0.0) + 0.0001);

        (diffuse + specular) * radiance * n_o_l
    }
}

pub fn fresnel_schlick(f0: Vec3, v_o_h: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - v_o_h).saturate().powf(5.0)
}

pub fn d_ggx(n_o_h: f32, roughness: f32) -> f32 {
    let a = roughness.sqr();
    let a2 = a.sqr();
    let n_o_h = n_o_h.max(0.0);
    let denom = n_o_h.sqr() * (a2 - 1.0) + 1.0;

    a2 / (PI * denom.sqr()).max(crate::PENUMBRA_EPSILON.sqr())
}

pub fn g_schlick_ggx(n_o_v: f32, roughness: f32) -> f32 {
    let k = (roughness + 1.0).sqr() / 8.0;

    n_o_v / (n_o_v * (1.0 - k) + k)
}

pub fn g_smith(n_o_v: f32, n_o_l: f32, roughness: f32) -> f32 {
    g_schlick_ggx(n_o_v.max(0.0), roughness)
        * g_schlick_ggx(n_o_l.max(0.0), roughness)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn fresnel_at_normal_incidence() {
        let f0 = vec3(0.04, 0.5, 1.0);

        assert_eq!(f0, fresnel_schlick(f0, 1.0));
        assert_eq!(Vec3::ONE, fresnel_schlick(f0, 0.0));
    }

    #[test]
    fn ggx() {
        // Perfectly aligned half-vector: D = 1 / (pi * a^2)
        assert_relative_eq!(
            d_ggx(1.0, 0.5),
            1.0 / (PI * 0.0625),
            epsilon = 1e-4
        );

        // Roughness of 1.0 makes the distribution uniform: D = 1 / pi
        assert_relative_eq!(d_ggx(0.3, 1.0), 1.0 / PI, epsilon = 1e-5);

        // Mirror-like surfaces must not blow up
        assert!(d_ggx(1.0, 0.0).is_finite());
    }

    #[test]
    fn smith() {
        assert_relative_eq!(g_smith(1.0, 1.0, 0.5), 1.0, epsilon = 1e-5);
        assert_eq!(0.0, g_smith(0.0, 1.0, 0.5));
        assert_eq!(0.0, g_smith(1.0, -0.5, 0.5));
    }

    #[test]
    fn lambertian_limit() {
        // Dielectric, fully rough surface lit head-on: the specular lobe is
        // tiny, so the result approaches albedo / pi * (1 - F0).
        let surface = Surface {
            normal: vec3(0.0, 1.0, 0.0),
            albedo: Vec3::ONE,
            roughness: 1.0,
            ..Default::default()
        };

        let n = surface.normal;
        let actual = CookTorrance::new(&surface).eval(n, n, Vec3::ONE);

        let diffuse = 0.96 / PI;
        let specular = 0.04 * (1.0 / PI) / (4.0 + 0.0001);

        assert_relative_eq!(actual.x, diffuse + specular, epsilon = 1e-5);
    }
}
