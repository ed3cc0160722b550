use log::debug;

use super::{ComputePass, Resource, StageLayout, StageResources};
use crate::{FrameParity, Result, Targets};

/// Estimates indirect light bouncing off of the surfaces visible on the
/// screen.
#[derive(Debug)]
pub struct IndirectStage {
    pass: ComputePass,
}

impl IndirectStage {
    pub fn layout() -> StageLayout {
        StageLayout::new("indirect").bind_group(|group| {
            group
                .reads([
                    Resource::Camera,
                    Resource::Settings,
                    Resource::GBufferColor,
                    Resource::GBufferSurface,
                    Resource::GBufferMaterial,
                ])
                .writes([Resource::Indirect])
        })
    }

    pub fn new(device: &wgpu::Device, res: &StageResources) -> Result<Self> {
        debug!("Initializing stage: indirect");

        let pass = ComputePass::builder("indirect")
            .with_bind_groups(res.bind_groups(device, &Self::layout())?)
            .build(device, &res.shaders.indirect);

        Ok(Self { pass })
    }

    pub fn run(
        &self,
        targets: &Targets,
        parity: FrameParity,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        self.pass.run(encoder, parity, targets.resolution(), ());
    }
}
