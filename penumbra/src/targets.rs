use glam::UVec2;
use log::debug;

use crate::{gpu, DoubleBuffered, MappedUniformBuffer, Texture};

/// Per-resolution resources: the camera and all off-screen render targets.
///
/// Owned by the renderer; stages only ever get to bind them.
#[derive(Debug)]
pub struct Targets {
    pub camera: MappedUniformBuffer<gpu::Camera>,

    /// Direct-lit radiance
    pub gbuffer_color: Texture,

    /// Encoded normal and depth
    pub gbuffer_surface: Texture,

    /// Albedo plus packed metallic, roughness and ambient occlusion
    pub gbuffer_material: Texture,

    pub gbuffer_depth: Texture,

    /// Noisy indirect light, as estimated this frame
    pub indirect: Texture,

    /// Denoised indirect light; one slot is written this frame, the other one
    /// holds the previous frame's result
    pub denoised: DoubleBuffered<Texture>,
}

impl Targets {
    pub const GBUFFER_FORMAT: wgpu::TextureFormat =
        wgpu::TextureFormat::Rgba32Float;

    pub const DEPTH_FORMAT: wgpu::TextureFormat =
        wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, resolution: UVec2) -> Self {
        debug!("Allocating targets; resolution={resolution:?}");

        let camera = MappedUniformBuffer::new(
            device,
            "penumbra_camera",
            gpu::Camera::new(
                Default::default(),
                Default::default(),
                resolution,
                0,
            ),
        );

        let gbuffer = |label: &str| {
            Texture::builder(label)
                .with_size(resolution)
                .with_format(Self::GBUFFER_FORMAT)
                .with_usage(wgpu::TextureUsages::RENDER_ATTACHMENT)
                .with_usage(wgpu::TextureUsages::STORAGE_BINDING)
                .build(device)
        };

        let gbuffer_depth = Texture::builder("gbuffer_depth")
            .with_size(resolution)
            .with_format(Self::DEPTH_FORMAT)
            .with_usage(wgpu::TextureUsages::RENDER_ATTACHMENT)
            .build(device);

        let indirect = Texture::builder("indirect")
            .with_size(resolution)
            .with_format(wgpu::TextureFormat::Rgba32Float)
            .with_usage(wgpu::TextureUsages::STORAGE_BINDING)
            .build(device);

        let denoised = DoubleBuffered::<Texture>::new(
            device,
            "denoised",
            resolution,
            wgpu::TextureFormat::Rgba32Float,
            wgpu::TextureUsages::STORAGE_BINDING,
        );

        Self {
            camera,
            gbuffer_color: gbuffer("gbuffer_color"),
            gbuffer_surface: gbuffer("gbuffer_surface"),
            gbuffer_material: gbuffer("gbuffer_material"),
            gbuffer_depth,
            indirect,
            denoised,
        }
    }

    pub fn resolution(&self) -> UVec2 {
        self.camera.screen_size()
    }
}
