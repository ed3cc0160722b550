use crate::{
    bind_group, bind_layout_entries, gpu, Bindable, BufferFlushOutcome,
    ImageId, Images, MappedStorageBuffer, Material, MaterialId,
};

/// Materials, as seen by the G-buffer stage: a storage buffer with their
/// parameters plus one bind group (textures and sampler) per material.
///
/// Material no. 0 is the fallback material, used for geometry that doesn't
/// specify any.
#[derive(Debug)]
pub struct Materials {
    buffer: MappedStorageBuffer<gpu::Material>,
    layout: wgpu::BindGroupLayout,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl Materials {
    pub fn new(device: &wgpu::Device, images: &Images) -> Self {
        let layout = {
            let texture = images.get(None);

            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("penumbra_material_layout"),
                entries: &bind_layout_entries(&[
                    &texture.bind_sampled(),
                    &texture.bind_sampled(),
                    images.sampler(),
                ]),
            })
        };

        let mut this = Self {
            buffer: MappedStorageBuffer::new_default(
                device,
                "penumbra_materials",
            ),
            layout,
            bind_groups: Default::default(),
        };

        this.push(device, images, gpu::Material::fallback(), None, None);
        this
    }

    pub fn insert(
        &mut self,
        device: &wgpu::Device,
        images: &Images,
        material: &Material,
    ) -> MaterialId {
        self.push(
            device,
            images,
            material.serialize(),
            material.base_color_texture,
            material.normal_texture,
        )
    }

    /// Returns index of given material inside the storage buffer; unknown
    /// materials resolve to the fallback one.
    pub fn lookup(&self, id: Option<MaterialId>) -> MaterialId {
        match id {
            Some(id) if (id.get() as usize) < self.buffer.len() => id,
            _ => MaterialId::new(0),
        }
    }

    pub fn bind_group(&self, id: MaterialId) -> &wgpu::BindGroup {
        &self.bind_groups[self.lookup(Some(id)).get() as usize]
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn flush(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> BufferFlushOutcome {
        self.buffer.flush(device, queue)
    }

    pub fn bind_readable(&self) -> impl Bindable + '_ {
        &self.buffer
    }

    fn push(
        &mut self,
        device: &wgpu::Device,
        images: &Images,
        material: gpu::Material,
        base_color_texture: Option<ImageId>,
        normal_texture: Option<ImageId>,
    ) -> MaterialId {
        let id = MaterialId::new(self.buffer.len() as u32);

        let bind_group = bind_group(
            device,
            &format!("penumbra_material_{}", id.get()),
            &self.layout,
            &[
                &images.get(base_color_texture).bind_sampled(),
                &images.get(normal_texture).bind_sampled(),
                images.sampler(),
            ],
        );

        self.buffer.push(material);
        self.bind_groups.push(bind_group);

        id
    }
}
