use log::debug;

use crate::{Bindable, Image, ImageId, Texture};

#[derive(Debug)]
pub struct Images {
    images: Vec<Texture>,
    fallback: Texture,
    sampler: Sampler,
}

impl Images {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let fallback = Self::upload(
            device,
            queue,
            "image_fallback",
            &Image::solid([255; 4]),
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("penumbra_images_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            images: Default::default(),
            fallback,
            sampler: Sampler { sampler },
        }
    }

    pub fn insert(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &Image,
    ) -> ImageId {
        let id = ImageId::new(self.images.len() as u32);
        let label = format!("image_{}", id.get());

        self.images.push(Self::upload(device, queue, label, image));

        id
    }

    /// Returns texture of given image or, if there's no such image, a 1x1
    /// white texture.
    pub fn get(&self, id: Option<ImageId>) -> &Texture {
        id.and_then(|id| self.images.get(id.get() as usize))
            .unwrap_or(&self.fallback)
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: impl ToString,
        image: &Image,
    ) -> Texture {
        let size = image.size();

        debug!("Uploading image; size={size:?}");

        let texture = Texture::builder(label)
            .with_size(size)
            .with_format(wgpu::TextureFormat::Rgba8Unorm)
            .with_usage(wgpu::TextureUsages::TEXTURE_BINDING)
            .with_usage(wgpu::TextureUsages::COPY_DST)
            .build(device);

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: texture.tex(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.x),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
        );

        texture
    }
}

#[derive(Debug)]
pub struct Sampler {
    sampler: wgpu::Sampler,
}

impl Bindable for Sampler {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(
                wgpu::SamplerBindingType::Filtering,
            ),
            count: None,
        };

        let resource = wgpu::BindingResource::Sampler(&self.sampler);

        vec![(layout, resource)]
    }
}
