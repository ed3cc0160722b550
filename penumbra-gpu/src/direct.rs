use glam::{Vec2, Vec3};

use crate::{CookTorrance, Light, Settings, ShadowTest, Surface};

/// Direct lighting of a surface: ambient term plus the contribution of every
/// light, each optionally shadow-tested.
#[derive(Clone, Copy)]
pub struct DirectLighting<'a> {
    settings: &'a Settings,
    view_point: Vec3,
}

impl<'a> DirectLighting<'a> {
    pub fn new(settings: &'a Settings, view_point: Vec3) -> Self {
        Self {
            settings,
            view_point,
        }
    }

    /// Returns the ambient term, driven by the first light.
    ///
    /// Only the first `light_count` entries of `lights` are considered, since
    /// on the GPU the slice spans the entire (possibly over-allocated) buffer.
    pub fn ambient(
        self,
        surface: &Surface,
        lights: &[Light],
        light_count: u32,
    ) -> Vec3 {
        if light_count == 0 || lights.is_empty() {
            return Vec3::ZERO;
        }

        lights[0].intensity()
            * surface.ao
            * surface.albedo
            * self.settings.ambient_strength()
    }

    /// Returns radiance reflected towards the viewer from a single light.
    ///
    /// `shadow_depth_at` reads light's shadow map; it's not called for lights
    /// without one or when shadows are disabled.
    pub fn light(
        self,
        surface: &Surface,
        light: &Light,
        shadow_depth_at: impl Fn(Vec2) -> f32,
    ) -> Vec3 {
        let incidence = light.incidence(surface.point);
        let n_o_l = surface.normal.dot(incidence.direction);

        if n_o_l <= 0.0 {
            return Vec3::ZERO;
        }

        if self.settings.has_shadows() && light.has_shadow_map() {
            let visibility =
                ShadowTest::new(light, self.settings.shadow_bias())
                    .visibility(
                        surface.point,
                        surface.normal,
                        incidence,
                        shadow_depth_at,
                    );

            if visibility <= 0.0 {
                return Vec3::ZERO;
            }
        }

        let radiance = light.radiance(incidence, self.settings.cone_cutoff());
        let v = (self.view_point - surface.point).normalize_or_zero();

        CookTorrance::new(surface).eval(incidence.direction, v, radiance)
    }

    /// Returns total radiance reflected towards the viewer.
    ///
    /// `shadow_depth_at` reads given shadow map at given texture coordinates.
    pub fn eval(
        self,
        surface: &Surface,
        lights: &[Light],
        light_count: u32,
        shadow_depth_at: impl Fn(u32, Vec2) -> f32,
    ) -> Vec3 {
        let mut color = self.ambient(surface, lights, light_count);
        let light_count = (light_count as usize).min(lights.len());
        let mut light_idx = 0;

        while light_idx < light_count {
            let light = &lights[light_idx];

            color += self.light(surface, light, |uv| {
                shadow_depth_at(light.shadow_map(), uv)
            });

            light_idx += 1;
        }

        color
    }
}
