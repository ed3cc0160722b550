use glam::UVec2;
use log::debug;

use super::Bindable;

#[derive(Debug)]
pub struct Texture {
    tex: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    size: UVec2,
}

impl Texture {
    pub fn builder(label: impl ToString) -> TextureBuilder {
        TextureBuilder {
            label: label.to_string(),
            size: UVec2::ONE,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::empty(),
        }
    }

    pub fn tex(&self) -> &wgpu::Texture {
        &self.tex
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Binds this texture as a storage image the shader reads from.
    ///
    /// Note that rust-gpu doesn't distinguish between read-only and read-write
    /// storage images, so both bindings end up read-write.
    pub fn bind_readable(&self) -> impl Bindable + '_ {
        StorageTextureBinder { parent: self }
    }

    /// Binds this texture as a storage image the shader writes to.
    pub fn bind_writable(&self) -> impl Bindable + '_ {
        StorageTextureBinder { parent: self }
    }

    /// Binds this texture as a filterable, sampled image.
    pub fn bind_sampled(&self) -> impl Bindable + '_ {
        SampledTextureBinder { parent: self }
    }
}

pub struct TextureBuilder {
    label: String,
    size: UVec2,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
}

impl TextureBuilder {
    pub fn with_size(mut self, size: UVec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_usage(mut self, usage: wgpu::TextureUsages) -> Self {
        self.usage |= usage;
        self
    }

    pub fn build(self, device: &wgpu::Device) -> Texture {
        let label = format!("penumbra_{}", self.label);

        debug!(
            "Allocating texture `{label}`; size={:?}, format={:?}",
            self.size, self.format
        );

        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size: wgpu::Extent3d {
                width: self.size.x.max(1),
                height: self.size.y.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: self.usage,
            view_formats: &[],
        });

        let view = tex.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&format!("{label}_view")),
            ..Default::default()
        });

        Texture {
            tex,
            view,
            format: self.format,
            size: self.size,
        }
    }
}

struct StorageTextureBinder<'a> {
    parent: &'a Texture,
}

impl Bindable for StorageTextureBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::ReadWrite,
                format: self.parent.format,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            count: None,
        };

        let resource = wgpu::BindingResource::TextureView(&self.parent.view);

        vec![(layout, resource)]
    }
}

struct SampledTextureBinder<'a> {
    parent: &'a Texture,
}

impl Bindable for SampledTextureBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: true,
                },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let resource = wgpu::BindingResource::TextureView(&self.parent.view);

        vec![(layout, resource)]
    }
}
