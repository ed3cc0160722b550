#![cfg_attr(target_arch = "spirv", no_std)]

pub mod compose;
pub mod denoise;
pub mod gbuffer;
pub mod indirect;
pub mod shadow;
