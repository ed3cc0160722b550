use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Light {
    /// xyz - position
    /// w - (as u32) light type, see `TYPE_*`
    pub d0: Vec4,

    /// xyz - intensity (linear rgb)
    /// w - (as u32) index of light's shadow map, `NO_SHADOW_MAP` if none
    pub d1: Vec4,

    /// xyz - direction (normalized)
    pub d2: Vec4,

    /// Light-space view-projection, re-derived each frame
    pub projection_view: Mat4,
}

impl Light {
    pub const TYPE_POINT: u32 = 0;
    pub const TYPE_CONE: u32 = 1;
    pub const TYPE_DIRECTIONAL: u32 = 2;

    pub const NO_SHADOW_MAP: u32 = u32::MAX;

    pub fn new(
        ty: u32,
        position: Vec3,
        direction: Vec3,
        intensity: Vec3,
        projection_view: Mat4,
        shadow_map: u32,
    ) -> Self {
        Self {
            d0: position.extend(f32::from_bits(ty)),
            d1: intensity.extend(f32::from_bits(shadow_map)),
            d2: direction.normalize().extend(0.0),
            projection_view,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn ty(&self) -> u32 {
        self.d0.w.to_bits()
    }

    pub fn is_cone(&self) -> bool {
        self.ty() == Self::TYPE_CONE
    }

    pub fn is_directional(&self) -> bool {
        self.ty() == Self::TYPE_DIRECTIONAL
    }

    pub fn intensity(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn direction(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn shadow_map(&self) -> u32 {
        self.d1.w.to_bits()
    }

    pub fn has_shadow_map(&self) -> bool {
        self.shadow_map() != Self::NO_SHADOW_MAP
    }

    /// Returns how this light arrives at given point.
    pub fn incidence(&self, point: Vec3) -> LightIncidence {
        let to_light = self.position() - point;
        let distance_squared = to_light.length_squared();

        let direction = if self.is_directional() {
            -self.direction()
        } else {
            to_light.normalize_or_zero()
        };

        LightIncidence {
            direction,
            distance_squared,
        }
    }

    /// Returns radiance arriving from this light along given incidence, not
    /// accounting for visibility or the receiver's cosine.
    pub fn radiance(
        &self,
        incidence: LightIncidence,
        cone_cutoff: f32,
    ) -> Vec3 {
        if self.is_directional() {
            return self.intensity();
        }

        if self.is_cone()
            && (-self.direction()).dot(incidence.direction) < cone_cutoff
        {
            return Vec3::ZERO;
        }

        self.intensity()
            / incidence.distance_squared.max(crate::PENUMBRA_EPSILON)
    }
}

#[derive(Clone, Copy)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct LightIncidence {
    /// Direction from the receiving point towards the light
    pub direction: Vec3,

    /// Squared distance between the receiving point and the light's position
    pub distance_squared: f32,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn light(ty: u32) -> Light {
        Light::new(
            ty,
            vec3(0.0, 4.0, 0.0),
            vec3(0.0, -1.0, 0.0),
            Vec3::splat(20.0),
            Mat4::IDENTITY,
            Light::NO_SHADOW_MAP,
        )
    }

    #[test]
    fn point() {
        let target = light(Light::TYPE_POINT);
        let incidence = target.incidence(vec3(0.0, 2.0, 0.0));

        assert_eq!(vec3(0.0, 1.0, 0.0), incidence.direction);
        assert_eq!(4.0, incidence.distance_squared);
        assert_eq!(Vec3::splat(5.0), target.radiance(incidence, 0.7));
        assert!(!target.has_shadow_map());
    }

    #[test]
    fn cone() {
        let target = light(Light::TYPE_CONE);

        let inside = target.incidence(vec3(0.5, 0.0, 0.0));
        let outside = target.incidence(vec3(8.0, 0.0, 0.0));

        assert!(target.radiance(inside, 0.7).x > 0.0);
        assert_eq!(Vec3::ZERO, target.radiance(outside, 0.7));
    }

    #[test]
    fn directional() {
        let target = light(Light::TYPE_DIRECTIONAL);
        let incidence = target.incidence(vec3(100.0, -3.0, 7.0));

        assert_relative_eq!(incidence.direction.y, 1.0);
        assert_eq!(Vec3::splat(20.0), target.radiance(incidence, 0.7));
    }
}
