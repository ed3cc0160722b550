use glam::{vec3, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

pub trait Vec3Ext
where
    Self: Sized,
{
    /// Returns two vectors that, together with `self` (assumed to be
    /// normalized), form an orthonormal basis.
    fn any_orthonormal_pair(self) -> (Self, Self);

    /// Converts this color-vector from sRGB-ish gamma into linear space.
    fn to_linear(self) -> Self;
}

impl Vec3Ext for Vec3 {
    fn any_orthonormal_pair(self) -> (Self, Self) {
        let up = if self.z.abs() > 0.999 {
            vec3(1.0, 0.0, 0.0)
        } else {
            vec3(0.0, 0.0, 1.0)
        };

        let tangent = up.cross(self).normalize();
        let bitangent = self.cross(tangent);

        (tangent, bitangent)
    }

    fn to_linear(self) -> Self {
        self.max(Vec3::ZERO).powf(2.2)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn any_orthonormal_pair() {
        for n in [
            vec3(0.0, 0.0, 1.0),
            vec3(0.0, 0.0, -1.0),
            vec3(0.0, 1.0, 0.0),
            vec3(1.0, 2.0, 3.0).normalize(),
        ] {
            let (t, b) = n.any_orthonormal_pair();

            assert_relative_eq!(t.length(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(b.length(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(t.dot(n), 0.0, epsilon = 1e-5);
            assert_relative_eq!(b.dot(n), 0.0, epsilon = 1e-5);
            assert_relative_eq!(t.dot(b), 0.0, epsilon = 1e-5);
        }
    }
}
