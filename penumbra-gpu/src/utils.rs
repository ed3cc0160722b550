mod f32_ext;
mod temporal_denoiser;
mod u32_ext;
mod vec3_ext;

use spirv_std::Image;

pub use self::f32_ext::*;
pub use self::temporal_denoiser::*;
pub use self::u32_ext::*;
pub use self::vec3_ext::*;

pub type Tex<'a> = &'a Image!(2D, type = f32, sampled);
pub type TexRgba32<'a> = &'a Image!(2D, format = rgba32f, sampled = false);
pub type TexShadowMaps<'a> =
    &'a Image!(2D, type = f32, sampled, arrayed, depth);
