use std::marker::PhantomData;
use std::mem;
use std::ops::Range;

use bytemuck::Pod;
use glam::UVec2;
use log::debug;

use crate::{BindGroup, FrameParity, Shader};

/// Compute pipeline invoked once per pixel, in 8x8 workgroups.
#[derive(Debug)]
pub struct ComputePass<P = ()> {
    label: String,
    bind_groups: Vec<BindGroup>,
    pipeline: wgpu::ComputePipeline,
    _params: PhantomData<P>,
}

impl<P> ComputePass<P>
where
    P: Pod,
{
    const WORKGROUP_SIZE: u32 = 8;

    pub fn builder(label: impl ToString) -> ComputePassBuilder<P> {
        ComputePassBuilder {
            label: label.to_string(),
            bind_groups: Default::default(),
            _params: Default::default(),
        }
    }

    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        parity: FrameParity,
        resolution: UVec2,
        params: P,
    ) {
        let label = format!("penumbra_{}_pass", self.label);

        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&label),
            });

        pass.set_pipeline(&self.pipeline);

        if mem::size_of::<P>() > 0 {
            pass.set_push_constants(0, bytemuck::bytes_of(&params));
        }

        for (bind_group_idx, bind_group) in self.bind_groups.iter().enumerate()
        {
            pass.set_bind_group(
                bind_group_idx as u32,
                bind_group.get(parity),
                &[],
            );
        }

        let size = workgroups(resolution, Self::WORKGROUP_SIZE);

        pass.dispatch_workgroups(size.x, size.y, 1);
    }
}

pub struct ComputePassBuilder<P> {
    label: String,
    bind_groups: Vec<BindGroup>,
    _params: PhantomData<P>,
}

impl<P> ComputePassBuilder<P>
where
    P: Pod,
{
    pub fn with_bind_groups(mut self, bind_groups: Vec<BindGroup>) -> Self {
        self.bind_groups.extend(bind_groups);
        self
    }

    pub fn build(
        self,
        device: &wgpu::Device,
        shader: &Shader,
    ) -> ComputePass<P> {
        debug!("Initializing pass: {}:{}", self.label, shader.entry_point);

        let bind_group_layouts: Vec<_> =
            self.bind_groups.iter().map(|bg| bg.layout()).collect();

        let push_constant_ranges = if mem::size_of::<P>() > 0 {
            vec![wgpu::PushConstantRange {
                stages: wgpu::ShaderStages::COMPUTE,
                range: Range {
                    start: 0,
                    end: mem::size_of::<P>() as u32,
                },
            }]
        } else {
            vec![]
        };

        let pipeline_layout_label =
            format!("penumbra_{}_pipeline_layout", self.label);

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&pipeline_layout_label),
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &push_constant_ranges,
            });

        let pipeline_label = format!("penumbra_{}_pipeline", self.label);

        let pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&pipeline_label),
                layout: Some(&pipeline_layout),
                module: &shader.module,
                entry_point: shader.entry_point,
            });

        ComputePass {
            label: self.label,
            bind_groups: self.bind_groups,
            pipeline,
            _params: PhantomData,
        }
    }
}

/// Returns how many workgroups cover given resolution.
fn workgroups(resolution: UVec2, workgroup_size: u32) -> UVec2 {
    (resolution + workgroup_size - 1) / workgroup_size
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn workgroups_cover_the_whole_screen() {
        assert_eq!(uvec2(1, 1), workgroups(uvec2(1, 1), 8));
        assert_eq!(uvec2(1, 2), workgroups(uvec2(8, 9), 8));
        assert_eq!(uvec2(240, 135), workgroups(uvec2(1920, 1080), 8));
    }
}
