use log::debug;

use super::{Resource, StageLayout, StageResources};
use crate::{BindGroup, FrameParity, Result};

/// Adds indirect light to direct light, tone-maps the result and writes it
/// into the caller's view.
#[derive(Debug)]
pub struct ComposeStage {
    bind_groups: Vec<BindGroup>,
    pipeline: wgpu::RenderPipeline,
}

impl ComposeStage {
    pub fn layout() -> StageLayout {
        StageLayout::new("compose")
            .bind_group(|group| {
                group.reads([
                    Resource::Settings,
                    Resource::GBufferColor,
                    Resource::Denoised,
                ])
            })
            .writes([Resource::Output])
    }

    pub fn new(device: &wgpu::Device, res: &StageResources) -> Result<Self> {
        debug!("Initializing stage: compose");

        let bind_groups = res.bind_groups(device, &Self::layout())?;

        let bind_group_layouts: Vec<_> =
            bind_groups.iter().map(|bg| bg.layout()).collect();

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("penumbra_compose_pipeline_layout"),
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("penumbra_compose_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &res.shaders.compose_vs.module,
                    entry_point: res.shaders.compose_vs.entry_point,
                    buffers: &[],
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &res.shaders.compose_fs.module,
                    entry_point: res.shaders.compose_fs.entry_point,
                    targets: &[Some(wgpu::ColorTargetState {
                        format: res.config.output_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });

        Ok(Self {
            bind_groups,
            pipeline,
        })
    }

    pub fn run(
        &self,
        parity: FrameParity,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("penumbra_compose"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: true,
                },
            })],
            depth_stencil_attachment: None,
        });

        pass.set_pipeline(&self.pipeline);

        for (idx, bind_group) in self.bind_groups.iter().enumerate() {
            pass.set_bind_group(idx as u32, bind_group.get(parity), &[]);
        }

        pass.draw(0..3, 0..1);
    }
}
