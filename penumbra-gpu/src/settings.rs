use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec4};

/// Tunable constants shared by all stages, uploaded once as a uniform.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Settings {
    /// x - shadow bias
    /// y - ambient strength
    /// z - cone cutoff (cosine)
    /// w - (as u32) whether shadow maps are available
    pub d0: Vec4,

    /// x - (as u32) indirect sample count
    /// y - indirect min radius
    /// z - indirect max radius
    /// w - indirect depth bias
    pub d1: Vec4,

    /// x - secondary surface area
    /// y - normal epsilon
    /// z - indirect gain
    /// w - gamma
    pub d2: Vec4,

    /// x - (as u32) size of each shadow map, in texels
    pub d3: Vec4,
}

impl Settings {
    pub const DEFAULT_SHADOW_BIAS: f32 = 1e-4;
    pub const DEFAULT_AMBIENT_STRENGTH: f32 = 0.002;
    pub const DEFAULT_CONE_CUTOFF: f32 = 0.7;
    pub const DEFAULT_SAMPLE_COUNT: u32 = 50;
    pub const DEFAULT_RADIUS_MIN: f32 = 0.01;
    pub const DEFAULT_RADIUS_MAX: f32 = 4.0;
    pub const DEFAULT_DEPTH_BIAS: f32 = 1e-3;
    pub const DEFAULT_SECONDARY_AREA: f32 = 1000.0;
    pub const DEFAULT_NORMAL_EPSILON: f32 = 1e-4;
    pub const DEFAULT_INDIRECT_GAIN: f32 = 1.0;
    pub const DEFAULT_GAMMA: f32 = 2.2;
    pub const DEFAULT_SHADOW_MAP_SIZE: u32 = 1000;

    pub fn shadow_bias(&self) -> f32 {
        self.d0.x
    }

    pub fn ambient_strength(&self) -> f32 {
        self.d0.y
    }

    pub fn cone_cutoff(&self) -> f32 {
        self.d0.z
    }

    pub fn has_shadows(&self) -> bool {
        self.d0.w.to_bits() == 1
    }

    pub fn sample_count(&self) -> u32 {
        self.d1.x.to_bits()
    }

    pub fn radius_min(&self) -> f32 {
        self.d1.y
    }

    pub fn radius_max(&self) -> f32 {
        self.d1.z
    }

    pub fn depth_bias(&self) -> f32 {
        self.d1.w
    }

    pub fn secondary_area(&self) -> f32 {
        self.d2.x
    }

    pub fn normal_epsilon(&self) -> f32 {
        self.d2.y
    }

    pub fn indirect_gain(&self) -> f32 {
        self.d2.z
    }

    pub fn gamma(&self) -> f32 {
        self.d2.w
    }

    pub fn shadow_map_size(&self) -> u32 {
        self.d3.x.to_bits()
    }

    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.d0.w = f32::from_bits(enabled as u32);
        self
    }

    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.d1.x = f32::from_bits(count);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            d0: vec4(
                Self::DEFAULT_SHADOW_BIAS,
                Self::DEFAULT_AMBIENT_STRENGTH,
                Self::DEFAULT_CONE_CUTOFF,
                f32::from_bits(1),
            ),
            d1: vec4(
                f32::from_bits(Self::DEFAULT_SAMPLE_COUNT),
                Self::DEFAULT_RADIUS_MIN,
                Self::DEFAULT_RADIUS_MAX,
                Self::DEFAULT_DEPTH_BIAS,
            ),
            d2: vec4(
                Self::DEFAULT_SECONDARY_AREA,
                Self::DEFAULT_NORMAL_EPSILON,
                Self::DEFAULT_INDIRECT_GAIN,
                Self::DEFAULT_GAMMA,
            ),
            d3: vec4(
                f32::from_bits(Self::DEFAULT_SHADOW_MAP_SIZE),
                0.0,
                0.0,
                0.0,
            ),
        }
    }
}
