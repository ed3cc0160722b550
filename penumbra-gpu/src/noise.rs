use core::f32::consts::PI;

use glam::{vec3, UVec2, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::Vec3Ext;

/// Stateless-per-pixel white noise based on a PCG hash.
///
/// Seeded from the pixel's position, so that no noise texture needs to be
/// stored, and every frame (for the same seed) is reproducible.
#[derive(Copy, Clone)]
pub struct Noise {
    state: u32,
}

impl Noise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed ^ (48619u32.wrapping_mul(id.x))
                ^ (95461u32.wrapping_mul(id.y)),
        }
    }

    /// Creates noise for given sample of given pixel.
    pub fn for_sample(seed: u32, id: UVec2, sample: u32) -> Self {
        let mut this = Self::new(seed ^ 3266489917u32.wrapping_mul(sample), id);

        // Warm-up, so that neighbouring samples decorrelate
        this.sample_int();
        this
    }

    /// Generates a uniform sample in range `<0.0, 1.0>`.
    pub fn sample(&mut self) -> f32 {
        (self.sample_int() as f32) / (u32::MAX as f32)
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a cosine-weighted sample on a hemisphere around given normal.
    pub fn sample_cosine_hemisphere(&mut self, normal: Vec3) -> Vec3 {
        let u1 = self.sample();
        let u2 = self.sample();

        let cos_theta = u1.sqrt();
        let sin_theta = (1.0 - u1).max(0.0).sqrt();
        let phi = 2.0 * PI * u2;

        let (t, b) = normal.any_orthonormal_pair();

        let local =
            vec3(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);

        (t * local.x + b * local.y + normal * local.z).normalize()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::uvec2;

    use super::*;

    #[test]
    fn deterministic() {
        let a = Noise::for_sample(0, uvec2(12, 34), 5).sample();
        let b = Noise::for_sample(0, uvec2(12, 34), 5).sample();
        let c = Noise::for_sample(0, uvec2(12, 34), 6).sample();
        let d = Noise::for_sample(0, uvec2(13, 34), 5).sample();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn sample_range() {
        let mut target = Noise::new(1234, uvec2(1, 2));

        for _ in 0..10_000 {
            let sample = target.sample();

            assert!(sample >= 0.0 && sample <= 1.0);
        }
    }

    #[test]
    fn cosine_hemisphere() {
        let normal = vec3(1.0, 2.0, -0.5).normalize();
        let mut cos_sum = 0.0;
        let n = 20_000;

        for i in 0..n {
            let mut noise = Noise::for_sample(0, uvec2(i % 97, i / 97), i);
            let dir = noise.sample_cosine_hemisphere(normal);

            assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-4);
            assert!(dir.dot(normal) >= -1e-4);

            cos_sum += dir.dot(normal);
        }

        // E[cos] for a cosine-weighted hemisphere is 2/3
        assert_relative_eq!(cos_sum / (n as f32), 2.0 / 3.0, epsilon = 0.02);
    }
}
