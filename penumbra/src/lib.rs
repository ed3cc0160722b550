//! Deferred renderer combining physically-based direct lighting, shadow maps
//! and screen-space indirect illumination, denoised over time.
//!
//! Each frame goes through the following stages:
//!
//! - shadow (depth of the scene as seen by each light),
//! - gbuffer (direct lighting plus surface data, as seen by the camera),
//! - indirect (light bouncing off of surfaces visible on the screen),
//! - denoise (blending the indirect light with the previous frame's),
//! - compose (tone mapping and gamma correction).
//!
//! Shaders are compiled separately, by `penumbra-shader-builder`, and loaded
//! at runtime from [`Config::shaders_dir`].

mod batches;
mod buffers;
mod config;
mod error;
mod frame;
mod geometry;
mod image;
mod images;
mod light;
mod lights;
mod material;
mod materials;
mod shaders;
mod shadow_maps;
mod stages;
mod state;
mod targets;

use glam::{uvec2, Mat4, UVec2};
use log::{debug, info, trace};
pub use penumbra_gpu as gpu;

pub use self::batches::BatchId;
pub(crate) use self::batches::*;
pub(crate) use self::buffers::*;
pub use self::config::*;
pub use self::error::*;
pub use self::frame::*;
pub use self::geometry::*;
pub use self::image::*;
pub(crate) use self::images::*;
pub use self::light::*;
pub(crate) use self::lights::*;
pub use self::material::*;
pub(crate) use self::materials::*;
pub(crate) use self::shaders::*;
pub(crate) use self::shadow_maps::*;
pub(crate) use self::stages::*;
pub use self::state::*;
pub(crate) use self::targets::*;

#[derive(Debug)]
pub struct Renderer {
    config: Config,
    state: State,
    settings: MappedUniformBuffer<gpu::Settings>,
    lights: Lights,
    images: Images,
    materials: Materials,
    batches: Batches,
    shadow_maps: ShadowMaps,
    pipeline: Option<Pipeline>,
}

/// Resources that exist only between [`Renderer::initialize()`] and
/// [`Renderer::teardown()`].
#[derive(Debug)]
struct Pipeline {
    shaders: Shaders,
    targets: Targets,
    stages: Stages,

    /// Whether `stages` refer to buffers or textures that have been
    /// reallocated since they were built
    stages_stale: bool,

    parity: FrameParity,
    frame: u64,
}

impl Renderer {
    /// Returns features the device must be created with.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::PUSH_CONSTANTS
            | wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES
    }

    /// Returns limits the device must be created with.
    pub fn required_limits() -> wgpu::Limits {
        wgpu::Limits {
            max_push_constant_size: 128,
            ..Default::default()
        }
    }

    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: Config,
    ) -> Self {
        info!("Creating renderer");

        let settings = MappedUniformBuffer::new(
            device,
            "penumbra_settings",
            config.serialize(),
        );

        let images = Images::new(device, queue);
        let materials = Materials::new(device, &images);
        let shadow_maps = ShadowMaps::new(device, config.shadow_map_size);

        Self {
            config,
            state: Default::default(),
            settings,
            lights: Lights::new(device),
            images,
            materials,
            batches: Default::default(),
            shadow_maps,
            pipeline: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Loads shaders and allocates render targets plus stages for given
    /// resolution.
    ///
    /// On failure, the renderer stays uninitialized.
    pub fn initialize(
        &mut self,
        device: &wgpu::Device,
        resolution: UVec2,
    ) -> Result<()> {
        if self.state.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        let max_size = device.limits().max_texture_dimension_2d;

        if resolution.cmpeq(UVec2::ZERO).any()
            || resolution.cmpgt(uvec2(max_size, max_size)).any()
        {
            return Err(Error::InvalidResolution {
                width: resolution.x,
                height: resolution.y,
            });
        }

        info!("Initializing; resolution={}x{}", resolution.x, resolution.y);

        let shaders = Shaders::new(device, &self.config.shaders_dir)?;
        let targets = Targets::new(device, resolution);

        let stages = Stages::new(
            device,
            &StageResources {
                config: &self.config,
                shaders: &shaders,
                settings: &self.settings,
                lights: &self.lights,
                materials: &self.materials,
                shadow_maps: &self.shadow_maps,
                targets: &targets,
            },
        )?;

        self.state.initialize()?;

        self.pipeline = Some(Pipeline {
            shaders,
            targets,
            stages,
            stages_stale: false,
            parity: Default::default(),
            frame: 0,
        });

        Ok(())
    }

    /// Replaces all lights; takes effect on the next frame.
    pub fn set_lights(&mut self, lights: Vec<Light>) {
        debug!("Setting lights; count={}", lights.len());

        self.lights.set(lights);
    }

    pub fn insert_batch(
        &mut self,
        device: &wgpu::Device,
        batch: &GeometryBatch,
    ) -> BatchId {
        self.batches.insert(device, batch)
    }

    pub fn insert_material(
        &mut self,
        device: &wgpu::Device,
        material: &Material,
    ) -> MaterialId {
        self.materials.insert(device, &self.images, material)
    }

    pub fn insert_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &Image,
    ) -> ImageId {
        self.images.insert(device, queue, image)
    }

    /// Sets transforms of all batches named `name`; a batch gets drawn once
    /// per transform.
    pub fn set_transforms(&mut self, name: impl ToString, xforms: Vec<Mat4>) {
        self.batches.set_transforms(name, xforms);
    }

    /// Renders a frame into given view, whose size should match the
    /// resolution passed to [`Self::initialize()`] and whose format should
    /// match [`Config::output_format`].
    pub fn render_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        ctx: &FrameContext,
    ) -> Result<()> {
        self.state.begin_frame()?;

        let result = self.encode_frame(device, queue, view, ctx);

        self.state.end_frame();

        result
    }

    fn encode_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        ctx: &FrameContext,
    ) -> Result<()> {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return Err(Error::NotInitialized);
        };

        let config = &self.config;

        trace!(
            "Rendering frame {}; time={}, parity={:?}",
            pipeline.frame,
            ctx.time,
            pipeline.parity
        );

        // Lights might've been moved since the last frame, so their
        // projections have to be re-derived before anything gets drawn
        self.lights.refresh(config);

        if config.shadows_enabled {
            pipeline.stages_stale |= self
                .shadow_maps
                .ensure(device, self.lights.shadow_casters());
        }

        pipeline.stages_stale |= self
            .lights
            .flush(device, queue)
            .merge(self.materials.flush(device, queue))
            .reallocated;

        self.settings.flush(queue);

        let seed = if config.animate_noise {
            rand::random()
        } else {
            0
        };

        let resolution = pipeline.targets.resolution();

        *pipeline.targets.camera = gpu::Camera::new(
            ctx.view_projection,
            ctx.camera_position,
            resolution,
            seed,
        );

        pipeline.targets.camera.flush(queue);

        rebuild_if_stale(
            &mut pipeline.stages_stale,
            &mut pipeline.stages,
            || {
                debug!("Buffers have been reallocated, rebuilding stages");

                Stages::new(
                    device,
                    &StageResources {
                        config,
                        shaders: &pipeline.shaders,
                        settings: &self.settings,
                        lights: &self.lights,
                        materials: &self.materials,
                        shadow_maps: &self.shadow_maps,
                        targets: &pipeline.targets,
                    },
                )
            },
        )?;

        let alpha = gpu::TemporalDenoiser::alpha(
            ctx.denoise_base_alpha,
            ctx.motion_magnitude,
            config.motion_sensitivity,
            pipeline.frame > 0,
        );

        let parity = pipeline.parity;
        let stages = &pipeline.stages;
        let targets = &pipeline.targets;

        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("penumbra_frame"),
            });

        if config.shadows_enabled {
            stages.shadow.run(
                &self.lights,
                &self.shadow_maps,
                &self.batches,
                &mut encoder,
            );
        }

        stages.gbuffer.run(
            targets,
            &self.materials,
            &self.batches,
            self.lights.len(),
            parity,
            &mut encoder,
        );

        stages.indirect.run(targets, parity, &mut encoder);
        stages.denoise.run(targets, parity, alpha, &mut encoder);
        stages.compose.run(parity, &mut encoder, view);

        queue.submit([encoder.finish()]);

        pipeline.parity = parity.flip();
        pipeline.frame += 1;

        Ok(())
    }

    /// Drops all render targets and stages; scene content (batches,
    /// materials, images and lights) is kept.
    pub fn teardown(&mut self) {
        info!("Tearing down");

        self.pipeline = None;
        self.state.teardown();
    }
}
