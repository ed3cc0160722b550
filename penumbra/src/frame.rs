use glam::{Mat4, Vec3};

/// Everything that changes from one frame to another.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    /// Camera's projection multiplied by camera's view
    pub view_projection: Mat4,

    pub camera_position: Vec3,

    /// Time since the beginning of the session, in seconds; reported in
    /// frame traces, shading doesn't depend on it
    pub time: f32,

    /// Blending factor used by the temporal denoiser when the camera stands
    /// still; lower values keep more history
    pub denoise_base_alpha: f32,

    /// How much the camera has moved since the previous frame, in arbitrary
    /// units (e.g. distance travelled plus rotation in radians)
    pub motion_magnitude: f32,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            view_projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            time: 0.0,
            denoise_base_alpha: 0.1,
            motion_magnitude: 0.0,
        }
    }
}

/// Selects which version of double-buffered resources is written this frame;
/// the other one holds the previous frame's results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameParity {
    #[default]
    Even,
    Odd,
}

impl FrameParity {
    pub fn flip(self) -> Self {
        match self {
            FrameParity::Even => FrameParity::Odd,
            FrameParity::Odd => FrameParity::Even,
        }
    }

    pub fn is_odd(self) -> bool {
        self == FrameParity::Odd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip() {
        let target = FrameParity::default();

        assert_eq!(FrameParity::Even, target);
        assert_eq!(FrameParity::Odd, target.flip());
        assert_eq!(FrameParity::Even, target.flip().flip());
        assert!(target.flip().is_odd());
    }
}
