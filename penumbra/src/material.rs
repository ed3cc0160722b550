use glam::{vec4, Vec2, Vec3};

use crate::{gpu, ImageId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Linear RGB; ignored when `base_color_texture` is set
    pub base_color: Vec3,
    pub base_color_texture: Option<ImageId>,

    /// Texture coordinates get divided by this before sampling the base color
    /// texture
    pub base_color_texture_scale: Vec2,

    pub normal_texture: Option<ImageId>,
    pub normal_texture_scale: Vec2,

    pub roughness: f32,
    pub metallic: f32,

    /// Ambient occlusion, scales the ambient term
    pub ao: f32,
}

impl Material {
    pub fn with_base_color(mut self, base_color: Vec3) -> Self {
        self.base_color = base_color;
        self
    }

    pub fn with_base_color_texture(
        mut self,
        base_color_texture: Option<ImageId>,
        scale: Vec2,
    ) -> Self {
        self.base_color_texture = base_color_texture;
        self.base_color_texture_scale = scale;
        self
    }

    pub fn with_normal_texture(
        mut self,
        normal_texture: Option<ImageId>,
        scale: Vec2,
    ) -> Self {
        self.normal_texture = normal_texture;
        self.normal_texture_scale = scale;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn with_ao(mut self, ao: f32) -> Self {
        self.ao = ao;
        self
    }

    pub(crate) fn serialize(&self) -> gpu::Material {
        let mut flags = 0;

        if self.base_color_texture.is_some() {
            flags |= gpu::Material::FLAG_BASE_COLOR_TEXTURE;
        }

        if self.normal_texture.is_some() {
            flags |= gpu::Material::FLAG_NORMAL_TEXTURE;
        }

        gpu::Material {
            d0: self.base_color.extend(f32::from_bits(flags)),
            d1: vec4(self.roughness, self.metallic, self.ao, 0.0),
            d2: vec4(
                self.base_color_texture_scale.x,
                self.base_color_texture_scale.y,
                self.normal_texture_scale.x,
                self.normal_texture_scale.y,
            ),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec3::ONE,
            base_color_texture: None,
            base_color_texture_scale: Vec2::ONE,
            normal_texture: None,
            normal_texture_scale: Vec2::ONE,
            roughness: 0.5,
            metallic: 0.0,
            ao: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec2, vec3};

    use super::*;

    #[test]
    fn serialize() {
        let target = Material::default()
            .with_base_color(vec3(0.1, 0.2, 0.3))
            .with_roughness(0.25)
            .with_metallic(0.75)
            .with_ao(0.5)
            .with_normal_texture(Some(ImageId::new(0)), vec2(2.0, 4.0));

        let actual = target.serialize();

        assert_eq!(vec3(0.1, 0.2, 0.3), actual.base_color());
        assert_eq!(0.25, actual.roughness());
        assert_eq!(0.75, actual.metallic());
        assert_eq!(0.5, actual.ao());
        assert!(!actual.has_base_color_texture());
        assert!(actual.has_normal_texture());
        assert_eq!(Vec2::ONE, actual.base_color_texture_scale());
        assert_eq!(vec2(2.0, 4.0), actual.normal_texture_scale());
    }

    #[test]
    fn serialize_both_textures() {
        let actual = Material::default()
            .with_base_color_texture(Some(ImageId::new(1)), Vec2::ONE)
            .with_normal_texture(Some(ImageId::new(2)), Vec2::ONE)
            .serialize();

        assert!(actual.has_base_color_texture());
        assert!(actual.has_normal_texture());
    }
}
