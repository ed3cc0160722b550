use glam::{UVec2, Vec3, Vec3Swizzles};

use crate::{
    Camera, CookTorrance, GBufferEntry, Noise, Settings, Surface,
    PENUMBRA_EPSILON,
};

/// Screen-space directional occlusion: estimates light bounced towards a
/// surface by other surfaces visible on the screen.
///
/// Every visible pixel acts as a tiny area light emitting whatever radiance
/// the G-buffer stage has computed for it.
#[derive(Clone, Copy)]
pub struct ScreenSpaceIndirect<'a> {
    pub camera: &'a Camera,
    pub settings: &'a Settings,
}

impl<'a> ScreenSpaceIndirect<'a> {
    /// Returns indirect radiance reflected by `receiver` towards the camera.
    ///
    /// `gbuffer` reads the G-buffer at given pixel.
    pub fn estimate(
        self,
        screen_pos: UVec2,
        receiver: &Surface,
        gbuffer: impl Fn(UVec2) -> GBufferEntry,
    ) -> Vec3 {
        let sample_count = self.settings.sample_count();

        if sample_count == 0 {
            return Vec3::ZERO;
        }

        let radius_min = self.settings.radius_min();
        let radius_max = self.settings.radius_max();
        let mut sum = Vec3::ZERO;
        let mut sample_idx = 0;

        while sample_idx < sample_count {
            let mut noise =
                Noise::for_sample(self.camera.seed(), screen_pos, sample_idx);

            let dir = noise.sample_cosine_hemisphere(receiver.normal);
            let radius = radius_min + (radius_max - radius_min) * noise.sample();

            sum += self.sample(receiver, dir, radius, &gbuffer);
            sample_idx += 1;
        }

        sum / (sample_count as f32)
    }

    /// Returns light arriving at `receiver` from the surface found `radius`
    /// units away in direction `dir`, or zero if there's no such surface.
    pub fn sample(
        self,
        receiver: &Surface,
        dir: Vec3,
        radius: f32,
        gbuffer: impl Fn(UVec2) -> GBufferEntry,
    ) -> Vec3 {
        if dir.dot(receiver.normal) < self.settings.normal_epsilon() {
            return Vec3::ZERO;
        }

        let sample_point = receiver.point + radius * dir;
        let sample_screen = self.camera.world_to_screen(sample_point);

        if !self.camera.contains_uv(sample_screen.xy()) {
            return Vec3::ZERO;
        }

        let entry = gbuffer(self.camera.uv_to_pixel(sample_screen.xy()));

        if !entry.is_some()
            || entry.depth + self.settings.depth_bias() >= sample_screen.z
        {
            return Vec3::ZERO;
        }

        let emitter = self
            .camera
            .screen_to_world(sample_screen.xy().extend(entry.depth));

        self.secondary(receiver, emitter, entry.normal, entry.radiance)
    }

    /// Returns light reflected by `receiver` towards the camera, given a small
    /// emitting patch at `emitter` facing `emitter_normal`.
    pub fn secondary(
        self,
        receiver: &Surface,
        emitter: Vec3,
        emitter_normal: Vec3,
        emitter_radiance: Vec3,
    ) -> Vec3 {
        let to_emitter = emitter - receiver.point;
        let distance_squared = to_emitter.length_squared();

        if distance_squared < PENUMBRA_EPSILON {
            return Vec3::ZERO;
        }

        let l = to_emitter / distance_squared.sqrt();

        if receiver.normal.dot(l) <= 0.0 {
            return Vec3::ZERO;
        }

        let emitter_cos = emitter_normal.dot(-l);

        if emitter_cos <= 0.0 {
            return Vec3::ZERO;
        }

        let radiance = emitter_radiance / distance_squared
            * emitter_cos
            * self.settings.secondary_area();

        let v = (self.camera.origin() - receiver.point).normalize_or_zero();

        CookTorrance::new(receiver).eval(l, v, radiance)
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec3, Mat4};

    use super::*;

    fn camera() -> Camera {
        let origin = vec3(0.0, 4.0, 4.0);

        let projection = Mat4::perspective_rh(
            45.0f32.to_radians(),
            1.0,
            0.1,
            100.0,
        );

        let view =
            Mat4::look_at_rh(origin, Vec3::ZERO, vec3(0.0, 1.0, 0.0));

        Camera::new(projection * view, origin, uvec2(512, 512), 0)
    }

    fn receiver() -> Surface {
        Surface {
            point: Vec3::ZERO,
            normal: vec3(0.0, 1.0, 0.0),
            albedo: vec3(0.8, 0.8, 0.8),
            metallic: 0.0,
            roughness: 0.7,
            ao: 1.0,
        }
    }

    fn lit_entry(depth: f32, normal: Vec3) -> GBufferEntry {
        GBufferEntry {
            radiance: vec3(1.0, 0.5, 0.25),
            normal,
            depth,
            albedo: Vec3::ONE,
            roughness: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn below_tangent_plane() {
        let camera = camera();
        let settings = Settings::default();
        let target = ScreenSpaceIndirect {
            camera: &camera,
            settings: &settings,
        };

        for dir in [
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, -1.0, 0.0),
            vec3(0.6, -0.8, 0.0),
            vec3(1.0, 0.00001, 0.0).normalize(),
        ] {
            let actual = target.sample(&receiver(), dir, 1.0, |_| {
                lit_entry(0.0, vec3(0.0, 1.0, 0.0))
            });

            assert_eq!(Vec3::ZERO, actual, "{dir}");
        }
    }

    #[test]
    fn occluder_in_front_of_sample() {
        let camera = camera();
        let settings = Settings::default();
        let target = ScreenSpaceIndirect {
            camera: &camera,
            settings: &settings,
        };

        let receiver = receiver();
        let dir = vec3(0.3, 1.0, 0.2).normalize();
        let sample_screen = camera.world_to_screen(receiver.point + dir);

        // A surface lying between the camera and the sample point, facing
        // the receiver
        let depth = sample_screen.z - 0.005;
        let emitter =
            camera.screen_to_world(sample_screen.truncate().extend(depth));
        let emitter_normal = (receiver.point - emitter).normalize();

        let actual = target.sample(&receiver, dir, 1.0, |_| {
            lit_entry(depth, emitter_normal)
        });

        assert!(actual.min_element() > 0.0, "{actual}");
    }

    #[test]
    fn sample_behind_stored_surface() {
        let camera = camera();
        let settings = Settings::default();
        let target = ScreenSpaceIndirect {
            camera: &camera,
            settings: &settings,
        };

        let receiver = receiver();
        let dir = vec3(0.3, 1.0, 0.2).normalize();
        let sample_screen = camera.world_to_screen(receiver.point + dir);

        // Stored surface lays behind the sample point, so nothing occludes it
        let actual = target.sample(&receiver, dir, 1.0, |_| {
            lit_entry(sample_screen.z + 0.001, vec3(0.0, 0.0, 1.0))
        });

        assert_eq!(Vec3::ZERO, actual);
    }

    #[test]
    fn offscreen_sample() {
        let camera = camera();
        let settings = Settings::default();
        let target = ScreenSpaceIndirect {
            camera: &camera,
            settings: &settings,
        };

        let receiver = Surface {
            point: vec3(3.0, 0.0, 0.0),
            ..receiver()
        };

        let actual = target.sample(
            &receiver,
            vec3(0.0, 1.0, 0.0),
            1.0,
            |_| unreachable!(),
        );

        assert_eq!(Vec3::ZERO, actual);
    }

    #[test]
    fn emitter_facing_away() {
        let camera = camera();
        let settings = Settings::default();
        let target = ScreenSpaceIndirect {
            camera: &camera,
            settings: &settings,
        };

        let actual = target.secondary(
            &receiver(),
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            Vec3::ONE,
        );

        assert_eq!(Vec3::ZERO, actual);
    }

    #[test]
    fn estimate_without_surroundings() {
        let camera = camera();
        let settings = Settings::default();
        let target = ScreenSpaceIndirect {
            camera: &camera,
            settings: &settings,
        };

        let actual = target.estimate(uvec2(256, 256), &receiver(), |_| {
            GBufferEntry::unpack([
                Default::default(),
                GBufferEntry::EMPTY_SURFACE,
                Default::default(),
            ])
        });

        assert_eq!(Vec3::ZERO, actual);
    }

    #[test]
    fn estimate_is_non_negative() {
        let camera = camera();
        let settings = Settings::default();
        let target = ScreenSpaceIndirect {
            camera: &camera,
            settings: &settings,
        };

        // Every pixel sees the same glowing surface hovering right in front
        // of the camera
        let actual = target.estimate(uvec2(256, 256), &receiver(), |_| {
            lit_entry(0.5, vec3(0.0, -1.0, 0.0))
        });

        assert!(actual.is_finite());
        assert!(actual.min_element() >= 0.0, "{actual}");
    }
}
