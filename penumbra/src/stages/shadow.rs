use std::mem;
use std::ops::Range;

use log::debug;

use super::{Resource, StageLayout, StageResources};
use crate::{gpu, Batches, Lights, Result, ShadowMaps, Vertex};

/// Renders depth of the scene from each shadow-casting light's point of
/// view into that light's shadow map.
#[derive(Debug)]
pub struct ShadowStage {
    pipeline: wgpu::RenderPipeline,
}

impl ShadowStage {
    pub fn layout() -> StageLayout {
        StageLayout::new("shadow")
            .reads([Resource::Lights, Resource::Geometry])
            .writes([Resource::ShadowMaps])
    }

    pub fn new(device: &wgpu::Device, res: &StageResources) -> Result<Self> {
        debug!("Initializing stage: shadow");

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("penumbra_shadow_pipeline_layout"),
                bind_group_layouts: &[],
                push_constant_ranges: &[wgpu::PushConstantRange {
                    stages: wgpu::ShaderStages::VERTEX,
                    range: Range {
                        start: 0,
                        end: mem::size_of::<gpu::ShadowPassParams>() as u32,
                    },
                }],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("penumbra_shadow_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &res.shaders.shadow_vs.module,
                    entry_point: res.shaders.shadow_vs.entry_point,
                    buffers: &[Vertex::layout_depth_only()],
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: ShadowMaps::FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: None,
                multiview: None,
            });

        Ok(Self { pipeline })
    }

    pub fn run(
        &self,
        lights: &Lights,
        shadow_maps: &ShadowMaps,
        batches: &Batches,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        for light in lights.serialized_shadow_casters() {
            let Some(view) = shadow_maps.layer(light.shadow_map()) else {
                continue;
            };

            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("penumbra_shadow"),
                    color_attachments: &[],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: true,
                            }),
                            stencil_ops: None,
                        },
                    ),
                });

            pass.set_pipeline(&self.pipeline);

            for (batch, xforms) in batches.iter() {
                for xform in xforms {
                    let params = gpu::ShadowPassParams {
                        mvp: light.projection_view * *xform,
                    };

                    pass.set_push_constants(
                        wgpu::ShaderStages::VERTEX,
                        0,
                        bytemuck::bytes_of(&params),
                    );

                    batch.draw_depth(&mut pass);
                }
            }
        }
    }
}
