use glam::{vec3, Vec2, Vec3, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Light, LightIncidence};

/// Shadow-map test of a single light.
#[derive(Clone, Copy)]
pub struct ShadowTest<'a> {
    light: &'a Light,
    bias: f32,
}

impl<'a> ShadowTest<'a> {
    pub fn new(light: &'a Light, bias: f32) -> Self {
        Self { light, bias }
    }

    /// Projects given point into light's shadow map: `xy` are texture
    /// coordinates and `z` is the depth-buffer value.
    pub fn light_space(&self, point: Vec3) -> Vec3 {
        let clip = self.light.projection_view * point.extend(1.0);

        if clip.w <= 0.0 {
            return Vec3::splat(-1.0);
        }

        let ndc = clip.xyz() / clip.w;

        vec3(0.5 * ndc.x + 0.5, 0.5 - 0.5 * ndc.y, ndc.z)
    }

    /// Returns whether the light reaches given point (`1.0`) or not (`0.0`).
    ///
    /// `depth_at` reads the light's shadow map at given texture coordinates.
    ///
    /// Points that project outside of the shadow map carry no occlusion
    /// information, and so they are considered visible.
    pub fn visibility(
        &self,
        point: Vec3,
        normal: Vec3,
        incidence: LightIncidence,
        depth_at: impl Fn(Vec2) -> f32,
    ) -> f32 {
        let pos = self.light_space(point);

        let inside = pos.x >= 0.0
            && pos.x < 1.0
            && pos.y >= 0.0
            && pos.y < 1.0
            && pos.z >= 0.0
            && pos.z < 1.0;

        if !inside {
            return 1.0;
        }

        let depth = depth_at(pos.truncate());

        let bias = ((1.0 - normal.dot(incidence.direction))
            * incidence.distance_squared.sqrt())
        .max(1.0)
            * self.bias;

        if pos.z > depth + bias {
            0.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Mat4};

    use super::*;

    fn light() -> Light {
        let position = vec3(0.0, 5.0, 0.0);

        let projection_view = Mat4::perspective_rh(
            45.0f32.to_radians(),
            1.0,
            0.1,
            100.0,
        ) * Mat4::look_at_rh(
            position,
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, -1.0),
        );

        Light::new(
            Light::TYPE_POINT,
            position,
            vec3(0.0, -1.0, 0.0),
            Vec3::ONE,
            projection_view,
            0,
        )
    }

    #[test]
    fn lit_when_nearest() {
        let light = light();
        let target = ShadowTest::new(&light, 1e-4);
        let point = vec3(0.2, 0.0, 0.1);
        let depth = target.light_space(point).z;

        let actual = target.visibility(
            point,
            vec3(0.0, 1.0, 0.0),
            light.incidence(point),
            |_| depth,
        );

        assert_eq!(1.0, actual);
    }

    #[test]
    fn occluded_by_nearer_surface() {
        let light = light();
        let target = ShadowTest::new(&light, 1e-4);
        let point = vec3(0.2, 0.0, 0.1);
        let blocker = target.light_space(vec3(0.1, 2.5, 0.05)).z;

        let actual = target.visibility(
            point,
            vec3(0.0, 1.0, 0.0),
            light.incidence(point),
            |_| blocker,
        );

        assert_eq!(0.0, actual);
    }

    #[test]
    fn visible_outside_of_shadow_map() {
        let light = light();
        let target = ShadowTest::new(&light, 1e-4);

        // Way outside of light's frustum
        let point = vec3(50.0, 0.0, 0.0);

        let actual = target.visibility(
            point,
            vec3(0.0, 1.0, 0.0),
            light.incidence(point),
            |_| 0.0,
        );

        assert_eq!(1.0, actual);
    }
}
