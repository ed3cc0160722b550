//! Common structs and algorithms used both by Penumbra's shaders and by its
//! renderer.
//!
//! Everything here compiles for the host (where it's unit-tested) and for
//! SPIR-V (where it's invoked by `penumbra-shaders`).

#![cfg_attr(target_arch = "spirv", no_std)]
#![allow(clippy::manual_range_contains)]

mod brdf;
mod camera;
mod composition;
mod direct;
mod gbuffer;
mod indirect;
mod light;
mod material;
mod noise;
mod normal;
mod passes;
mod settings;
mod shadow;
mod surface;
mod utils;

pub use self::brdf::*;
pub use self::camera::*;
pub use self::composition::*;
pub use self::direct::*;
pub use self::gbuffer::*;
pub use self::indirect::*;
pub use self::light::*;
pub use self::material::*;
pub use self::noise::*;
pub use self::normal::*;
pub use self::passes::*;
pub use self::settings::*;
pub use self::shadow::*;
pub use self::surface::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;
    #[cfg(target_arch = "spirv")]
    pub use spirv_std::num_traits::Float;
    pub use spirv_std::{spirv, Image, Sampler};

    pub use crate::*;
}

/// Small value used to avoid divisions by zero.
pub const PENUMBRA_EPSILON: f32 = 0.0001;
