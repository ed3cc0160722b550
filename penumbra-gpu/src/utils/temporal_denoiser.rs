use glam::Vec3;
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

/// Exponential moving average of the indirect light across frames.
pub struct TemporalDenoiser;

impl TemporalDenoiser {
    /// Returns how much of the current frame should land in the output.
    ///
    /// Starts at `base` for a still camera and approaches `1.0` as `motion`
    /// grows, so that stale history doesn't smear over moving surfaces.
    /// Without history, the current frame is taken as-is.
    pub fn alpha(
        base: f32,
        motion: f32,
        sensitivity: f32,
        has_history: bool,
    ) -> f32 {
        if !has_history {
            return 1.0;
        }

        let base = base.clamp(0.0, 1.0);
        let motion = motion.max(0.0);
        let response = 1.0 - (-motion * sensitivity.max(0.0)).exp();

        (base + (1.0 - base) * response).clamp(0.0, 1.0)
    }

    pub fn blend(current: Vec3, previous: Vec3, alpha: f32) -> Vec3 {
        current * alpha + previous * (1.0 - alpha)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn first_frame() {
        let alpha = TemporalDenoiser::alpha(0.1, 0.0, 4.0, false);
        let current = vec3(0.3, 12.0, 0.001);

        assert_eq!(1.0, alpha);

        assert_eq!(
            current,
            TemporalDenoiser::blend(current, vec3(99.0, -5.0, 7.0), alpha)
        );
    }

    #[test]
    fn alpha_grows_with_motion() {
        let mut prev = TemporalDenoiser::alpha(0.1, 0.0, 4.0, true);

        assert_relative_eq!(prev, 0.1);

        for motion in [0.01, 0.1, 0.25, 0.5, 1.0, 5.0] {
            let alpha = TemporalDenoiser::alpha(0.1, motion, 4.0, true);

            assert!(alpha > prev, "motion={motion}");
            assert!(alpha <= 1.0, "motion={motion}");

            prev = alpha;
        }

        assert_relative_eq!(prev, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn convergence() {
        let alpha = TemporalDenoiser::alpha(0.2, 0.0, 4.0, true);
        let target = vec3(1.0, 2.0, 3.0);
        let start = vec3(5.0, -2.0, 0.0);
        let mut output = start;

        for k in 1..=20 {
            output = TemporalDenoiser::blend(target, output, alpha);

            let expected = (start - target) * (1.0 - alpha).powi(k);
            let actual = output - target;

            assert_relative_eq!(actual.x, expected.x, epsilon = 1e-4);
            assert_relative_eq!(actual.y, expected.y, epsilon = 1e-4);
            assert_relative_eq!(actual.z, expected.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn motion_step() {
        let before = vec3(10.0, 4.0, 0.5);
        let after = vec3(1.0, 1.0, 1.0);

        let frame = |output: Option<Vec3>, current: Vec3, motion: f32| {
            let alpha = TemporalDenoiser::alpha(
                0.1,
                motion,
                4.0,
                output.is_some(),
            );

            let output = TemporalDenoiser::blend(
                current,
                output.unwrap_or(current),
                alpha,
            );

            (output, alpha)
        };

        // Camera stands still for a while, history settles
        let mut output = None;

        for _ in 0..100 {
            let (frame_output, alpha) = frame(output, before, 0.0);

            assert!(output.is_none() || alpha == 0.1);
            output = Some(frame_output);
        }

        let settled = output.unwrap();

        assert!((settled - before).length() < 1e-3);

        // Camera suddenly moves and the scene seen changes with it
        let (moving, alpha) = frame(Some(settled), after, 2.0);

        assert!(alpha > 0.99);
        assert!((moving - after).length() < 0.01 * (before - after).length());

        // Without the motion, most of the stale history would remain
        let (still, _) = frame(Some(settled), after, 0.0);

        assert!((still - after).length() > 0.5 * (before - after).length());
    }
}
