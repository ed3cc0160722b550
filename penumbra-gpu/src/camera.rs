use bytemuck::{Pod, Zeroable};
use glam::{vec2, vec3, vec4, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Camera {
    pub projection_view: Mat4,
    pub ndc_to_world: Mat4,

    /// xyz - position
    pub origin: Vec4,

    /// xy - screen size (in pixels)
    pub screen: Vec4,

    /// x - (as u32) noise seed
    pub data: Vec4,
}

impl Camera {
    pub fn new(
        projection_view: Mat4,
        origin: Vec3,
        screen_size: UVec2,
        seed: u32,
    ) -> Self {
        Self {
            projection_view,
            ndc_to_world: projection_view.inverse(),
            origin: origin.extend(0.0),
            screen: screen_size.as_vec2().extend(0.0).extend(0.0),
            data: vec4(f32::from_bits(seed), 0.0, 0.0, 0.0),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin.xyz()
    }

    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    pub fn seed(&self) -> u32 {
        self.data.x.to_bits()
    }

    /// Given a point in world-coordinates, returns it in clip-coordinates.
    pub fn world_to_clip(&self, pos: Vec3) -> Vec4 {
        self.projection_view * pos.extend(1.0)
    }

    /// Given a point in world-coordinates, returns it in screen-coordinates:
    /// `xy` are texture coordinates (`<0.0, 1.0)`, y pointing down) and `z` is
    /// the depth-buffer value.
    ///
    /// Points behind the camera land outside of the screen.
    pub fn world_to_screen(&self, pos: Vec3) -> Vec3 {
        let clip = self.world_to_clip(pos);

        if clip.w <= 0.0 {
            return Vec3::splat(-1.0);
        }

        let ndc = clip.xyz() / clip.w;

        vec3(0.5 * ndc.x + 0.5, 0.5 - 0.5 * ndc.y, ndc.z)
    }

    /// Inverse of [`Self::world_to_screen()`].
    pub fn screen_to_world(&self, pos: Vec3) -> Vec3 {
        let ndc = vec3(pos.x * 2.0 - 1.0, 1.0 - pos.y * 2.0, pos.z);

        self.ndc_to_world.project_point3(ndc)
    }

    /// Returns whether given texture coordinates lay inside the screen.
    pub fn contains_uv(&self, uv: Vec2) -> bool {
        uv.x >= 0.0 && uv.x < 1.0 && uv.y >= 0.0 && uv.y < 1.0
    }

    /// Returns whether given pixel lays inside the screen.
    pub fn contains(&self, pos: UVec2) -> bool {
        let screen_size = self.screen_size();

        pos.x < screen_size.x && pos.y < screen_size.y
    }

    /// Returns texture coordinates of given pixel's center.
    pub fn pixel_to_uv(&self, pos: UVec2) -> Vec2 {
        (pos.as_vec2() + vec2(0.5, 0.5)) / self.screen.xy()
    }

    /// Returns pixel that contains given texture coordinates; assumes the
    /// coordinates lay inside the screen.
    pub fn uv_to_pixel(&self, uv: Vec2) -> UVec2 {
        (uv * self.screen.xy()).as_uvec2().min(self.screen_size() - 1)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::uvec2;

    use super::*;

    fn camera() -> Camera {
        let projection = Mat4::perspective_rh(
            45.0f32.to_radians(),
            16.0 / 9.0,
            0.1,
            100.0,
        );

        let view = Mat4::look_at_rh(
            vec3(-0.6, 5.0, 8.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        );

        Camera::new(
            projection * view,
            vec3(-0.6, 5.0, 8.0),
            uvec2(1920, 1080),
            0,
        )
    }

    #[test]
    fn world_to_screen_to_world() {
        let target = camera();

        let points = [
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.5, -2.0),
            vec3(-2.5, 1.0, 3.0),
            vec3(0.3, -1.0, 1.5),
            vec3(-0.6, 4.0, 6.0),
        ];

        for point in points {
            let screen = target.world_to_screen(point);

            assert!(target.contains_uv(screen.truncate()), "{point}");
            assert!(screen.z >= 0.0 && screen.z <= 1.0, "{point}");

            let actual = target.screen_to_world(screen);

            assert_relative_eq!(actual.x, point.x, epsilon = 1e-3);
            assert_relative_eq!(actual.y, point.y, epsilon = 1e-3);
            assert_relative_eq!(actual.z, point.z, epsilon = 1e-3);
        }
    }

    #[test]
    fn world_to_screen_behind_camera() {
        let target = camera();
        let screen = target.world_to_screen(vec3(-0.6, 8.0, 14.0));

        assert!(!target.contains_uv(screen.truncate()));
    }

    #[test]
    fn pixels() {
        let target = camera();

        assert!(target.contains(uvec2(0, 0)));
        assert!(target.contains(uvec2(1919, 1079)));
        assert!(!target.contains(uvec2(1920, 0)));
        assert!(!target.contains(uvec2(0, 1080)));

        for pos in [uvec2(0, 0), uvec2(17, 911), uvec2(1919, 1079)] {
            assert_eq!(pos, target.uv_to_pixel(target.pixel_to_uv(pos)));
        }
    }

    #[test]
    fn seed() {
        let target = Camera::new(
            Mat4::IDENTITY,
            Vec3::ZERO,
            uvec2(64, 64),
            0xdeadbeef,
        );

        assert_eq!(0xdeadbeef, target.seed());
        assert_eq!(uvec2(64, 64), target.screen_size());
    }
}
