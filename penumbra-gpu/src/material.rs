use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Normal, Vec3Ext};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Material {
    /// xyz - base color (linear)
    /// w - (as u32) flags, see `FLAG_*`
    pub d0: Vec4,

    /// x - roughness
    /// y - metallic
    /// z - ambient occlusion
    pub d1: Vec4,

    /// xy - base color texture's uv scale
    /// zw - normal texture's uv scale
    pub d2: Vec4,
}

impl Material {
    pub const FLAG_BASE_COLOR_TEXTURE: u32 = 1;
    pub const FLAG_NORMAL_TEXTURE: u32 = 2;

    /// Material used for geometry that doesn't specify any.
    pub fn fallback() -> Self {
        Self {
            d0: vec4(0.0, 0.0, 0.0, f32::from_bits(0)),
            d1: vec4(0.5, 0.5, 0.1, 0.0),
            d2: vec4(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub fn base_color(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn flags(&self) -> u32 {
        self.d0.w.to_bits()
    }

    pub fn has_base_color_texture(&self) -> bool {
        self.flags() & Self::FLAG_BASE_COLOR_TEXTURE > 0
    }

    pub fn has_normal_texture(&self) -> bool {
        self.flags() & Self::FLAG_NORMAL_TEXTURE > 0
    }

    pub fn roughness(&self) -> f32 {
        self.d1.x
    }

    pub fn metallic(&self) -> f32 {
        self.d1.y
    }

    pub fn ao(&self) -> f32 {
        self.d1.z
    }

    pub fn base_color_texture_scale(&self) -> Vec2 {
        self.d2.xy()
    }

    pub fn normal_texture_scale(&self) -> Vec2 {
        self.d2.zw()
    }

    /// Returns surface's albedo, sampling the base color texture (through
    /// `sample`) if the material has one.
    pub fn albedo(&self, uv: Vec2, sample: impl Fn(Vec2) -> Vec4) -> Vec3 {
        if self.has_base_color_texture() {
            sample(uv / self.base_color_texture_scale())
                .xyz()
                .to_linear()
        } else {
            self.base_color()
        }
    }

    /// Returns surface's normal, sampling the normal texture (through
    /// `sample`) if the material has one.
    pub fn normal(
        &self,
        uv: Vec2,
        geometry_normal: Vec3,
        sample: impl Fn(Vec2) -> Vec4,
    ) -> Vec3 {
        if self.has_normal_texture() {
            Normal::from_normal_map(
                sample(uv / self.normal_texture_scale()).xyz(),
            )
        } else {
            geometry_normal
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec2, vec3};

    use super::*;

    #[test]
    fn albedo_without_texture() {
        let mut target = Material::fallback();

        target.d0 = vec4(0.2, 0.4, 0.6, 0.0);

        let actual = target.albedo(vec2(0.5, 0.5), |_| unreachable!());

        assert_eq!(vec3(0.2, 0.4, 0.6), actual);
    }

    #[test]
    fn albedo_with_texture() {
        let mut target = Material::fallback();

        target.d0.w = f32::from_bits(Material::FLAG_BASE_COLOR_TEXTURE);
        target.d2 = vec4(2.0, 4.0, 1.0, 1.0);

        let actual = target.albedo(vec2(1.0, 1.0), |uv| {
            assert_eq!(vec2(0.5, 0.25), uv);

            vec4(0.5, 0.5, 0.5, 1.0)
        });

        assert_relative_eq!(actual.x, 0.5f32.powf(2.2), epsilon = 1e-5);
    }

    #[test]
    fn normal_with_texture() {
        let mut target = Material::fallback();

        target.d0.w = f32::from_bits(Material::FLAG_NORMAL_TEXTURE);

        let actual =
            target.normal(vec2(0.0, 0.0), vec3(1.0, 0.0, 0.0), |_| {
                vec4(0.5, 0.5, 1.0, 1.0)
            });

        assert_relative_eq!(actual.y, 1.0, epsilon = 1e-5);
    }
}
