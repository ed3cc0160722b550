use std::env;
use std::path::PathBuf;

use glam::vec4;

use crate::gpu;

/// Renderer's configuration.
///
/// Defaults are tuned for scenes measured in meters, lit by lights of
/// intensity in the range of tens to hundreds.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory containing compiled shaders (see `penumbra-shader-builder`)
    pub shaders_dir: PathBuf,

    /// Format of the texture frames are going to be written into
    pub output_format: wgpu::TextureFormat,

    // -- Shadows --
    pub shadows_enabled: bool,

    /// Width and height of each light's shadow map, in texels
    pub shadow_map_size: u32,

    /// Field of view of point and cone lights' projection, in radians
    pub light_fov: f32,

    pub light_near: f32,
    pub light_far: f32,

    /// Half-extent of directional lights' orthographic projection
    pub directional_extent: f32,

    pub shadow_bias: f32,

    // -- Direct lighting --
    pub ambient_strength: f32,

    /// Cosine of cone lights' half-angle
    pub cone_cutoff: f32,

    // -- Indirect lighting --
    pub indirect_samples: u32,
    pub indirect_radius_min: f32,
    pub indirect_radius_max: f32,
    pub indirect_depth_bias: f32,

    /// Area of the patch each pixel represents when it acts as a light
    pub secondary_area: f32,

    pub normal_epsilon: f32,

    /// Whether the indirect stage's noise should change every frame; when
    /// off, frames are reproducible
    pub animate_noise: bool,

    // -- Denoising --
    /// How quickly the denoiser drops its history as the camera moves
    pub motion_sensitivity: f32,

    // -- Composition --
    /// Multiplier of the denoised indirect light before it's added to the
    /// direct light.
    ///
    /// Defaults to `1.0`, which keeps the estimate energy-conserving; an
    /// indirect-only preview usually wants something around `4.0` to be
    /// readable.
    pub indirect_gain: f32,
    pub gamma: f32,
}

impl Config {
    pub const SHADERS_DIR_ENV: &'static str = "PENUMBRA_SHADERS_DIR";

    pub(crate) fn serialize(&self) -> gpu::Settings {
        gpu::Settings {
            d0: vec4(
                self.shadow_bias,
                self.ambient_strength,
                self.cone_cutoff,
                f32::from_bits(self.shadows_enabled as u32),
            ),
            d1: vec4(
                f32::from_bits(self.indirect_samples),
                self.indirect_radius_min,
                self.indirect_radius_max,
                self.indirect_depth_bias,
            ),
            d2: vec4(
                self.secondary_area,
                self.normal_epsilon,
                self.indirect_gain,
                self.gamma,
            ),
            d3: vec4(
                f32::from_bits(self.shadow_map_size),
                0.0,
                0.0,
                0.0,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let shaders_dir = env::var_os(Self::SHADERS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("target").join("shaders"));

        Self {
            shaders_dir,
            output_format: wgpu::TextureFormat::Rgba8Unorm,
            shadows_enabled: true,
            shadow_map_size: gpu::Settings::DEFAULT_SHADOW_MAP_SIZE,
            light_fov: 45.0f32.to_radians(),
            light_near: 0.1,
            light_far: 100.0,
            directional_extent: 10.0,
            shadow_bias: gpu::Settings::DEFAULT_SHADOW_BIAS,
            ambient_strength: gpu::Settings::DEFAULT_AMBIENT_STRENGTH,
            cone_cutoff: gpu::Settings::DEFAULT_CONE_CUTOFF,
            indirect_samples: gpu::Settings::DEFAULT_SAMPLE_COUNT,
            indirect_radius_min: gpu::Settings::DEFAULT_RADIUS_MIN,
            indirect_radius_max: gpu::Settings::DEFAULT_RADIUS_MAX,
            indirect_depth_bias: gpu::Settings::DEFAULT_DEPTH_BIAS,
            secondary_area: gpu::Settings::DEFAULT_SECONDARY_AREA,
            normal_epsilon: gpu::Settings::DEFAULT_NORMAL_EPSILON,
            animate_noise: false,
            motion_sensitivity: 4.0,
            indirect_gain: gpu::Settings::DEFAULT_INDIRECT_GAIN,
            gamma: gpu::Settings::DEFAULT_GAMMA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        assert_eq!(gpu::Settings::default(), Config::default().serialize());
    }

    #[test]
    fn serialize() {
        let target = Config {
            shadows_enabled: false,
            shadow_map_size: 2048,
            indirect_samples: 16,
            indirect_radius_max: 2.5,
            gamma: 1.8,
            ..Default::default()
        };

        let actual = target.serialize();

        assert!(!actual.has_shadows());
        assert_eq!(2048, actual.shadow_map_size());
        assert_eq!(16, actual.sample_count());
        assert_eq!(2.5, actual.radius_max());
        assert_eq!(1.8, actual.gamma());
        assert_eq!(target.cone_cutoff, actual.cone_cutoff());
    }
}
