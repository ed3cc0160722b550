use std::ops::Range;

use fxhash::FxHashMap;
use glam::Mat4;
use log::{debug, warn};
use wgpu::util::DeviceExt;

use crate::{GeometryBatch, MaterialId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchId(u32);

impl BatchId {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Geometry batches uploaded into VRAM, together with their instances'
/// transforms.
#[derive(Debug, Default)]
pub struct Batches {
    batches: Vec<Batch>,
    transforms: FxHashMap<String, Vec<Mat4>>,
}

impl Batches {
    pub fn insert(
        &mut self,
        device: &wgpu::Device,
        batch: &GeometryBatch,
    ) -> BatchId {
        let id = BatchId(self.batches.len() as u32);

        let buffers = if batch.is_degenerate() {
            warn!(
                "Batch `{}` has nothing to draw; it will be skipped",
                batch.name
            );

            None
        } else {
            Some(BatchBuffers::new(device, batch))
        };

        self.batches.push(Batch {
            name: batch.name.clone(),
            buffers,
        });

        id
    }

    /// Replaces instances of all batches named `name`.
    ///
    /// Batches without any transforms are drawn once, with the identity
    /// transform; an explicitly empty list hides the batch.
    pub fn set_transforms(&mut self, name: impl ToString, xforms: Vec<Mat4>) {
        self.transforms.insert(name.to_string(), xforms);
    }

    pub fn transforms(&self, name: &str) -> &[Mat4] {
        self.transforms
            .get(name)
            .map(|xforms| xforms.as_slice())
            .unwrap_or(&[Mat4::IDENTITY])
    }

    /// Returns drawable batches together with their transforms.
    pub fn iter(&self) -> impl Iterator<Item = (&BatchBuffers, &[Mat4])> + '_ {
        self.batches.iter().filter_map(|batch| {
            let buffers = batch.buffers.as_ref()?;

            Some((buffers, self.transforms(&batch.name)))
        })
    }
}

#[derive(Debug)]
struct Batch {
    name: String,
    buffers: Option<BatchBuffers>,
}

#[derive(Debug)]
pub struct BatchBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    ranges: Vec<(Range<u32>, Option<MaterialId>)>,
}

impl BatchBuffers {
    fn new(device: &wgpu::Device, batch: &GeometryBatch) -> Self {
        let indices = batch.drawable_indices();

        debug!(
            "Uploading batch `{}`; vertices={}, indices={}",
            batch.name,
            batch.vertices.len(),
            indices.len()
        );

        let vertices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("penumbra_batch_{}_vertices", batch.name)),
                contents: bytemuck::cast_slice(&batch.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_count = indices.len() as u32;

        let indices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("penumbra_batch_{}_indices", batch.name)),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertices,
            indices,
            index_count,
            ranges: batch.drawable_ranges().collect(),
        }
    }

    /// Draws the batch range-by-range, calling `bind_material` before each
    /// range so that the caller can set up that range's material.
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        mut bind_material: impl FnMut(
            &mut wgpu::RenderPass<'a>,
            Option<MaterialId>,
        ),
    ) {
        self.bind(pass);

        for (indices, material) in &self.ranges {
            bind_material(pass, *material);
            pass.draw_indexed(indices.clone(), 0, 0..1);
        }
    }

    /// Draws the whole batch at once, ignoring materials.
    pub fn draw_depth<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.bind(pass);

        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(
            self.indices.slice(..),
            wgpu::IndexFormat::Uint32,
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn transforms() {
        let mut target = Batches::default();

        assert_eq!(&[Mat4::IDENTITY], target.transforms("cube"));

        let xforms = vec![
            Mat4::from_translation(vec3(1.0, 0.0, 0.0)),
            Mat4::from_translation(vec3(0.0, 2.0, 0.0)),
        ];

        target.set_transforms("cube", xforms.clone());

        assert_eq!(xforms.as_slice(), target.transforms("cube"));
        assert_eq!(&[Mat4::IDENTITY], target.transforms("sphere"));

        target.set_transforms("cube", vec![]);

        assert!(target.transforms("cube").is_empty());
    }
}
