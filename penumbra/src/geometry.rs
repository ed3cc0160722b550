use std::mem;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::MaterialId;

/// Vertex, as laid out in the vertex buffer.
///
/// UVs are split between the two attributes, so that each one fits a single
/// `Float32x4`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub u: f32,
    pub normal: Vec3,
    pub v: f32,
}

impl Vertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        // position (xyz) + uv (x)
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x4,
        },
        // normal (xyz) + uv (y)
        wgpu::VertexAttribute {
            offset: (4 * mem::size_of::<f32>()) as _,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x4,
        },
    ];

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            u: uv.x,
            normal,
            v: uv.y,
        }
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::new(self.u, self.v)
    }

    /// Layout used by passes that shade geometry.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Self>() as _,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }

    /// Layout used by depth-only passes, which care just about positions.
    pub fn layout_depth_only() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Self>() as _,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES[..1],
        }
    }
}

/// Drawable unit: a vertex list plus triangle lists grouped by material.
///
/// Batches are identified by name, which is what transforms refer to (see
/// [`crate::Renderer::set_transforms()`]).
#[derive(Clone, Debug, Default)]
pub struct GeometryBatch {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub ranges: Vec<GeometryRange>,
}

#[derive(Clone, Debug, Default)]
pub struct GeometryRange {
    /// Triangle list, indexing into [`GeometryBatch::vertices`]
    pub indices: Vec<u32>,

    /// Material to shade the triangles with; `None` stands for the fallback
    /// material
    pub material: Option<MaterialId>,
}

impl GeometryBatch {
    pub fn new(name: impl ToString, vertices: Vec<Vertex>) -> Self {
        Self {
            name: name.to_string(),
            vertices,
            ranges: Default::default(),
        }
    }

    pub fn with_range(
        mut self,
        indices: Vec<u32>,
        material: Option<MaterialId>,
    ) -> Self {
        self.ranges.push(GeometryRange { indices, material });
        self
    }

    /// Returns ranges that can be drawn, i.e. ranges with at least one
    /// triangle and with all indices in bounds.
    ///
    /// Yielded ranges refer to the concatenation of all drawable ranges' index
    /// lists, i.e. what's returned by [`Self::drawable_indices()`].
    pub(crate) fn drawable_ranges(
        &self,
    ) -> impl Iterator<Item = (Range<u32>, Option<MaterialId>)> + '_ {
        let mut offset = 0;

        self.ranges
            .iter()
            .filter(|range| range.is_drawable(self.vertices.len()))
            .map(move |range| {
                let len = range.indices.len() as u32;
                let indices = offset..(offset + len);

                offset += len;

                (indices, range.material)
            })
    }

    pub(crate) fn drawable_indices(&self) -> Vec<u32> {
        self.ranges
            .iter()
            .filter(|range| range.is_drawable(self.vertices.len()))
            .flat_map(|range| range.indices.iter().copied())
            .collect()
    }

    /// Returns whether there's nothing to draw in this batch.
    pub fn is_degenerate(&self) -> bool {
        self.drawable_ranges().next().is_none()
    }
}

impl GeometryRange {
    fn is_drawable(&self, vertex_count: usize) -> bool {
        !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&index| (index as usize) < vertex_count)
    }
}
