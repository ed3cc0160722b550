use std::mem;
use std::ops::Range;

use log::debug;

use super::{Resource, StageLayout, StageResources};
use crate::{
    gpu, BindGroup, Batches, Error, FrameParity, Materials, Result, Targets,
    Vertex,
};

/// Rasterizes the scene from the camera, evaluating direct lighting per
/// fragment; produces the G-buffer.
#[derive(Debug)]
pub struct GBufferStage {
    bg0: BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl GBufferStage {
    pub fn layout() -> StageLayout {
        StageLayout::new("gbuffer")
            .bind_group(|group| {
                group.reads([
                    Resource::Camera,
                    Resource::Settings,
                    Resource::Lights,
                    Resource::Materials,
                    Resource::ShadowMaps,
                ])
            })
            .reads([Resource::Geometry])
            .writes([
                Resource::GBufferColor,
                Resource::GBufferSurface,
                Resource::GBufferMaterial,
                Resource::GBufferDepth,
            ])
    }

    pub fn new(device: &wgpu::Device, res: &StageResources) -> Result<Self> {
        debug!("Initializing stage: gbuffer");

        let [bg0]: [BindGroup; 1] = res
            .bind_groups(device, &Self::layout())?
            .try_into()
            .map_err(|_| Error::InvalidStageLayout {
                stage: "gbuffer",
                reason: "expected a single bind group".into(),
            })?;

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("penumbra_gbuffer_pipeline_layout"),
                bind_group_layouts: &[bg0.layout(), res.materials.layout()],
                push_constant_ranges: &[wgpu::PushConstantRange {
                    stages: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    range: Range {
                        start: 0,
                        end: mem::size_of::<gpu::GBufferPassParams>() as u32,
                    },
                }],
            });

        let target = Some(wgpu::ColorTargetState {
            format: Targets::GBUFFER_FORMAT,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("penumbra_gbuffer_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &res.shaders.gbuffer_vs.module,
                    entry_point: res.shaders.gbuffer_vs.entry_point,
                    buffers: &[Vertex::layout()],
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
                    format: Targets::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &res.shaders.gbuffer_fs.module,
                    entry_point: res.shaders.gbuffer_fs.entry_point,
                    targets: &[target.clone(), target.clone(), target],
                }),
                multiview: None,
            });

        Ok(Self { bg0, pipeline })
    }

    pub fn run(
        &self,
        targets: &Targets,
        materials: &Materials,
        batches: &Batches,
        light_count: u32,
        parity: FrameParity,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let color_attachment = |view, clear: wgpu::Color| {
            Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: true,
                },
            })
        };

        let empty_surface = {
            let [r, g, b, a] = gpu::GBufferEntry::EMPTY_SURFACE.to_array();

            wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("penumbra_gbuffer"),
            color_attachments: &[
                color_attachment(
                    targets.gbuffer_color.view(),
                    wgpu::Color::TRANSPARENT,
                ),
                color_attachment(targets.gbuffer_surface.view(), empty_surface),
                color_attachment(
                    targets.gbuffer_material.view(),
                    wgpu::Color::TRANSPARENT,
                ),
            ],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: targets.gbuffer_depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                },
            ),
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.bg0.get(parity), &[]);

        for (batch, xforms) in batches.iter() {
            for xform in xforms {
                batch.draw(&mut pass, |pass, material| {
                    let material = materials.lookup(material);

                    let params = gpu::GBufferPassParams::new(
                        *xform,
                        material.get(),
                        light_count,
                    );

                    pass.set_bind_group(1, materials.bind_group(material), &[]);

                    pass.set_push_constants(
                        wgpu::ShaderStages::VERTEX_FRAGMENT,
                        0,
                        bytemuck::bytes_of(&params),
                    );
                });
            }
        }
    }
}
