use glam::Vec3;
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

pub struct Composition;

impl Composition {
    /// Combines direct and indirect light, tone-maps (Reinhard) and applies
    /// gamma.
    pub fn compose(
        direct: Vec3,
        indirect: Vec3,
        indirect_gain: f32,
        gamma: f32,
    ) -> Vec3 {
        let color = (direct + indirect * indirect_gain).max(Vec3::ZERO);

        Self::gamma(Self::reinhard(color), gamma)
    }

    pub fn reinhard(color: Vec3) -> Vec3 {
        color / (color + Vec3::ONE)
    }

    pub fn gamma(color: Vec3, gamma: f32) -> Vec3 {
        color.powf(1.0 / gamma)
    }
}
