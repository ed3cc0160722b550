use std::ops::{Deref, DerefMut};
use std::{any, mem};

use bytemuck::Pod;
use log::info;

use super::Bindable;

/// Storage buffer kept both in RAM and VRAM, holding a list of items.
///
/// Like [`super::MappedUniformBuffer`], tracks modifications through
/// [`DerefMut`]; additionally the GPU-side buffer grows (but never shrinks)
/// when the list outgrows it, which invalidates all bind groups referring to
/// it - see [`BufferFlushOutcome`].
#[derive(Debug)]
pub struct MappedStorageBuffer<T> {
    label: String,
    buffer: wgpu::Buffer,
    data: Vec<T>,
    dirty: bool,
}

impl<T> MappedStorageBuffer<T>
where
    T: Pod,
{
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        data: Vec<T>,
    ) -> Self {
        let label = label.as_ref().to_owned();
        let buffer = Self::allocate(device, &label, data.len());

        Self {
            label,
            buffer,
            data,
            dirty: true,
        }
    }

    pub fn new_default(device: &wgpu::Device, label: impl AsRef<str>) -> Self {
        Self::new(device, label, Vec::new())
    }

    /// Uploads the list into VRAM, if it's been changed since the last flush.
    pub fn flush(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> BufferFlushOutcome {
        let mut outcome = BufferFlushOutcome::default();

        if !mem::take(&mut self.dirty) {
            return outcome;
        }

        let size = Self::size_of(self.data.len());

        if size > self.buffer.size() {
            let capacity = self.data.len().next_power_of_two();

            self.buffer = Self::allocate(device, &self.label, capacity);
            outcome.reallocated = true;
        }

        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&self.data));

        outcome
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
    ) -> wgpu::Buffer {
        let size = Self::size_of(capacity);

        info!(
            "Allocating storage buffer `{label}`; ty={}, capacity={capacity}, size={size}",
            any::type_name::<T>(),
        );

        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::STORAGE,
            size,
            mapped_at_creation: false,
        })
    }

    /// Returns size of a buffer able to hold given number of items; empty
    /// buffers cannot be bound, so there's always room for at least one item.
    fn size_of(len: usize) -> u64 {
        let size = len.max(1) * mem::size_of::<T>();

        ((size + 31) & !31) as u64
    }
}

impl<T> Deref for MappedStorageBuffer<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for MappedStorageBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dirty = true;

        &mut self.data
    }
}

impl<T> Bindable for MappedStorageBuffer<T> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                // TODO should say `read_only: true`, but rust-gpu doesn't emit
                //      the `NonWritable` decoration, so wgpu would reject
                //      the shader
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        vec![(layout, self.buffer.as_entire_binding())]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferFlushOutcome {
    /// Whether the GPU-side buffer has been replaced with a bigger one
    pub reallocated: bool,
}

impl BufferFlushOutcome {
    pub fn merge(self, other: Self) -> Self {
        Self {
            reallocated: self.reallocated || other.reallocated,
        }
    }
}
