use log::debug;

use super::{ComputePass, Resource, StageLayout, StageResources};
use crate::{gpu, FrameParity, Result, Targets};

/// Blends the current indirect light with the previous frame's result.
#[derive(Debug)]
pub struct DenoiseStage {
    pass: ComputePass<gpu::DenoisePassParams>,
}

impl DenoiseStage {
    pub fn layout() -> StageLayout {
        StageLayout::new("denoise")
            .bind_group(|group| {
                group.reads([Resource::Camera, Resource::Indirect])
            })
            .bind_group(|group| {
                group
                    .reads([Resource::DenoiseHistory])
                    .writes([Resource::Denoised])
            })
    }

    pub fn new(device: &wgpu::Device, res: &StageResources) -> Result<Self> {
        debug!("Initializing stage: denoise");

        let pass = ComputePass::builder("denoise")
            .with_bind_groups(res.bind_groups(device, &Self::layout())?)
            .build(device, &res.shaders.denoise);

        Ok(Self { pass })
    }

    pub fn run(
        &self,
        targets: &Targets,
        parity: FrameParity,
        alpha: f32,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        self.pass.run(
            encoder,
            parity,
            targets.resolution(),
            gpu::DenoisePassParams::new(alpha),
        );
    }
}
