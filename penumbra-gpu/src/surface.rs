use glam::Vec3;

/// Everything the lighting model needs to know about a point on a surface.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Surface {
    pub point: Vec3,
    pub normal: Vec3,
    pub albedo: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub ao: f32,
}

impl Surface {
    /// Base reflectivity at normal incidence.
    pub fn f0(&self) -> Vec3 {
        Vec3::splat(0.04).lerp(self.albedo, self.metallic)
    }
}
