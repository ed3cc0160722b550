use glam::{vec3, Mat4, Vec3};

use crate::{gpu, Config};

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,

    /// Rotation around the horizontal axis, in radians; positive values look
    /// up
    pub pitch: f32,

    /// Rotation around the vertical axis, in radians; zero looks towards +X
    pub yaw: f32,

    /// Linear RGB
    pub intensity: Vec3,

    pub casts_shadows: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Cone,
    Directional,
}

impl Light {
    pub fn new(kind: LightKind, position: Vec3, intensity: Vec3) -> Self {
        Self {
            kind,
            position,
            pitch: 0.0,
            yaw: 0.0,
            intensity,
            casts_shadows: true,
        }
    }

    pub fn point(position: Vec3, intensity: Vec3) -> Self {
        Self::new(LightKind::Point, position, intensity)
    }

    pub fn cone(position: Vec3, intensity: Vec3) -> Self {
        Self::new(LightKind::Cone, position, intensity)
    }

    /// Creates a directional light; `position` only anchors its shadow map.
    pub fn directional(position: Vec3, intensity: Vec3) -> Self {
        Self::new(LightKind::Directional, position, intensity)
    }

    pub fn with_orientation(mut self, pitch: f32, yaw: f32) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self
    }

    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }

    /// Returns the direction this light is pointing at.
    pub fn direction(&self) -> Vec3 {
        vec3(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn view(&self) -> Mat4 {
        let direction = self.direction();

        // Looking straight up or down leaves the right vector undefined, so
        // any horizontal one will do
        let right = direction.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(direction);

        Mat4::look_at_rh(self.position, self.position + direction, up)
    }

    pub fn projection(&self, config: &Config) -> Mat4 {
        match self.kind {
            LightKind::Point | LightKind::Cone => Mat4::perspective_rh(
                config.light_fov,
                1.0,
                config.light_near,
                config.light_far,
            ),

            LightKind::Directional => {
                let extent = config.directional_extent;

                Mat4::orthographic_rh(
                    -extent,
                    extent,
                    -extent,
                    extent,
                    config.light_near,
                    config.light_far,
                )
            }
        }
    }

    pub fn projection_view(&self, config: &Config) -> Mat4 {
        self.projection(config) * self.view()
    }

    pub(crate) fn serialize(
        &self,
        config: &Config,
        shadow_map: Option<u32>,
    ) -> gpu::Light {
        let ty = match self.kind {
            LightKind::Point => gpu::Light::TYPE_POINT,
            LightKind::Cone => gpu::Light::TYPE_CONE,
            LightKind::Directional => gpu::Light::TYPE_DIRECTIONAL,
        };

        gpu::Light::new(
            ty,
            self.position,
            self.direction(),
            self.intensity,
            self.projection_view(config),
            shadow_map.unwrap_or(gpu::Light::NO_SHADOW_MAP),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use glam::{Vec4Swizzles, Vec3Swizzles};

    use super::*;

    fn assert_vec_eq(expected: Vec3, actual: Vec3) {
        assert_relative_eq!(expected.x, actual.x, epsilon = 1e-5);
        assert_relative_eq!(expected.y, actual.y, epsilon = 1e-5);
        assert_relative_eq!(expected.z, actual.z, epsilon = 1e-5);
    }

    #[test]
    fn direction() {
        let light = |pitch, yaw| {
            Light::point(Vec3::ZERO, Vec3::ONE).with_orientation(pitch, yaw)
        };

        assert_vec_eq(vec3(1.0, 0.0, 0.0), light(0.0, 0.0).direction());
        assert_vec_eq(vec3(0.0, 0.0, 1.0), light(0.0, FRAC_PI_2).direction());
        assert_vec_eq(vec3(0.0, 1.0, 0.0), light(FRAC_PI_2, 0.0).direction());
        assert_vec_eq(vec3(0.0, -1.0, 0.0), light(-FRAC_PI_2, 1.0).direction());
    }

    #[test]
    fn view() {
        let target = Light::cone(vec3(1.0, 5.0, -2.0), Vec3::ONE)
            .with_orientation(-0.7, 2.1);

        let view = target.view();

        // Light's position lands at the origin, the point it's looking at
        // lands on the -Z axis
        assert_vec_eq(Vec3::ZERO, view.transform_point3(target.position));

        assert_vec_eq(
            vec3(0.0, 0.0, -3.0),
            view.transform_point3(target.position + 3.0 * target.direction()),
        );
    }

    #[test]
    fn view_looking_straight_down() {
        let target = Light::point(vec3(0.0, 5.0, 0.0), Vec3::ONE)
            .with_orientation(-FRAC_PI_2, 0.0);

        let view = target.view();

        assert!(view.is_finite());
        assert_vec_eq(vec3(0.0, 0.0, -5.0), view.transform_point3(Vec3::ZERO));
    }

    #[test]
    fn projection_view() {
        let config = Config::default();

        for light in [
            Light::point(vec3(0.0, 4.0, 0.0), Vec3::ONE),
            Light::cone(vec3(0.0, 4.0, 0.0), Vec3::ONE),
            Light::directional(vec3(0.0, 4.0, 0.0), Vec3::ONE),
        ] {
            let light = light.with_orientation(-FRAC_PI_2 + 0.01, 0.0);
            let clip = light.projection_view(&config)
                * vec3(0.3, 0.0, -0.2).extend(1.0);
            let ndc = clip.xyz() / clip.w;

            assert!(ndc.xy().abs().max_element() < 1.0, "{:?}", light.kind);
            assert!(ndc.z > 0.0 && ndc.z < 1.0, "{:?}", light.kind);
        }
    }

    #[test]
    fn serialize() {
        let config = Config::default();
        let target = Light::cone(vec3(1.0, 2.0, 3.0), vec3(10.0, 20.0, 30.0))
            .with_orientation(-0.5, 0.25);

        let actual = target.serialize(&config, Some(3));

        assert!(actual.is_cone());
        assert_eq!(3, actual.shadow_map());
        assert_eq!(target.position, actual.position());
        assert_eq!(target.intensity, actual.intensity());
        assert_vec_eq(target.direction(), actual.direction());
        assert_eq!(target.projection_view(&config), actual.projection_view);

        let actual = target.serialize(&config, None);

        assert!(!actual.has_shadow_map());
    }
}
