use glam::{UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Camera, Normal, Surface, TexRgba32, U32Ext};

/// Everything the G-buffer stores about a single pixel.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct GBufferEntry {
    /// Direct-lit radiance (linear, before tone mapping)
    pub radiance: Vec3,
    pub normal: Vec3,

    /// Depth-buffer value; `1.0` means there's no surface
    pub depth: f32,

    pub albedo: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub ao: f32,
}

impl GBufferEntry {
    /// Value the surface target is cleared with.
    pub const EMPTY_SURFACE: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

    /// Packs this entry into texels of the color, surface and material
    /// targets, respectively.
    ///
    /// Metallic, roughness and ambient occlusion are quantized into bytes and
    /// stored as an integer, which fits losslessly into `f32`.
    pub fn pack(self) -> [Vec4; 3] {
        let d0 = self.radiance.extend(1.0);
        let d1 = Normal::encode(self.normal).extend(self.depth);

        let d2 = {
            let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;

            let params = u32::from_bytes([
                quantize(self.metallic),
                quantize(self.roughness),
                quantize(self.ao),
                0,
            ]);

            self.albedo.extend(params as f32)
        };

        [d0, d1, d2]
    }

    pub fn unpack([d0, d1, d2]: [Vec4; 3]) -> Self {
        let [metallic, roughness, ao, _] = (d2.w as u32).to_bytes();

        Self {
            radiance: d0.xyz(),
            normal: Normal::decode(d1.xyz()),
            depth: d1.w,
            albedo: d2.xyz(),
            metallic: metallic as f32 / 255.0,
            roughness: roughness as f32 / 255.0,
            ao: ao as f32 / 255.0,
        }
    }

    pub fn is_some(&self) -> bool {
        self.depth < 1.0
    }

    /// Rebuilds the surface this entry describes, given the pixel's texture
    /// coordinates.
    pub fn surface(&self, camera: &Camera, uv: Vec2) -> Surface {
        Surface {
            point: camera.screen_to_world(uv.extend(self.depth)),
            normal: self.normal,
            albedo: self.albedo,
            metallic: self.metallic,
            roughness: self.roughness,
            ao: self.ao,
        }
    }
}

#[derive(Clone, Copy)]
pub struct GBuffer<'a> {
    color: TexRgba32<'a>,
    surface: TexRgba32<'a>,
    material: TexRgba32<'a>,
}

impl<'a> GBuffer<'a> {
    pub fn new(
        color: TexRgba32<'a>,
        surface: TexRgba32<'a>,
        material: TexRgba32<'a>,
    ) -> Self {
        Self {
            color,
            surface,
            material,
        }
    }

    pub fn get(&self, screen_pos: UVec2) -> GBufferEntry {
        GBufferEntry::unpack([
            self.color.read(screen_pos),
            self.surface.read(screen_pos),
            self.material.read(screen_pos),
        ])
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3, Mat4};

    use super::*;

    const EPSILON: f32 = 0.01;

    #[test]
    fn serialization() {
        let target = GBufferEntry {
            radiance: vec3(12.5, 0.25, 3.0),
            normal: vec3(0.26, 0.53, 0.80).normalize(),
            depth: 0.987,
            albedo: vec3(0.1, 0.2, 0.3),
            metallic: 0.33,
            roughness: 0.66,
            ao: 1.0,
        };

        let actual = GBufferEntry::unpack(target.pack());

        assert_eq!(target.radiance, actual.radiance);
        assert_eq!(target.depth, actual.depth);
        assert_eq!(target.albedo, actual.albedo);

        assert_relative_eq!(actual.normal.x, target.normal.x, epsilon = 1e-5);
        assert_relative_eq!(actual.normal.y, target.normal.y, epsilon = 1e-5);
        assert_relative_eq!(actual.normal.z, target.normal.z, epsilon = 1e-5);

        assert_relative_eq!(actual.metallic, 0.33, epsilon = EPSILON);
        assert_relative_eq!(actual.roughness, 0.66, epsilon = EPSILON);
        assert_relative_eq!(actual.ao, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn cleared_surface_is_empty() {
        let target = GBufferEntry::unpack([
            Vec4::ZERO,
            GBufferEntry::EMPTY_SURFACE,
            Vec4::ZERO,
        ]);

        assert!(!target.is_some());
    }

    #[test]
    fn surface() {
        let projection = Mat4::perspective_rh(
            45.0f32.to_radians(),
            1.0,
            0.1,
            100.0,
        );

        let view = Mat4::look_at_rh(
            vec3(0.0, 4.0, 4.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        );

        let camera = Camera::new(
            projection * view,
            vec3(0.0, 4.0, 4.0),
            uvec2(640, 640),
            0,
        );

        let point = vec3(0.5, 0.0, -0.25);
        let screen = camera.world_to_screen(point);

        let entry = GBufferEntry {
            normal: vec3(0.0, 1.0, 0.0),
            depth: screen.z,
            albedo: Vec3::ONE,
            roughness: 0.5,
            ..Default::default()
        };

        assert!(entry.is_some());

        let actual = entry.surface(&camera, screen.truncate());

        assert_relative_eq!(actual.point.x, point.x, epsilon = 1e-3);
        assert_relative_eq!(actual.point.y, point.y, epsilon = 1e-3);
        assert_relative_eq!(actual.point.z, point.z, epsilon = 1e-3);
        assert_eq!(entry.normal, actual.normal);
        assert_eq!(0.5, actual.roughness);
    }
}
