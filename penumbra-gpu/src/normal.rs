use glam::{vec3, Vec3};

pub struct Normal;

impl Normal {
    /// Maps a normal from `<-1.0, 1.0>` into `<0.0, 1.0>`, so that it can be
    /// stored in the G-buffer.
    pub fn encode(n: Vec3) -> Vec3 {
        (n + Vec3::ONE) * 0.5
    }

    /// See: [`Self::encode()`].
    pub fn decode(n: Vec3) -> Vec3 {
        (n * 2.0 - Vec3::ONE).normalize_or_zero()
    }

    /// Decodes a texel read from a normal map.
    ///
    /// Normal maps are authored in a space where the surface faces `+z`,
    /// while our geometry (mostly ground planes) faces `+y`, hence the swizzle.
    pub fn from_normal_map(texel: Vec3) -> Vec3 {
        let n = (texel * 2.0 - Vec3::ONE).normalize_or_zero();

        vec3(n.x, n.z, n.y)
    }
}
