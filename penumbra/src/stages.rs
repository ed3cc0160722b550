mod compute_pass;
mod layout;

use log::debug;

pub use self::compute_pass::*;
pub use self::layout::*;
use crate::{
    gpu, BindGroup, Config, DoubleBufferedBindable, Error, Lights,
    MappedUniformBuffer, Materials, Result, Shaders, ShadowMaps, Targets,
    Texture,
};

/// Everything stages bind to.
pub struct StageResources<'a> {
    pub config: &'a Config,
    pub shaders: &'a Shaders,
    pub settings: &'a MappedUniformBuffer<gpu::Settings>,
    pub lights: &'a Lights,
    pub materials: &'a Materials,
    pub shadow_maps: &'a ShadowMaps,
    pub targets: &'a Targets,
}

impl<'a> StageResources<'a> {
    /// Builds bind groups declared by given layout.
    pub fn bind_groups(
        &self,
        device: &wgpu::Device,
        layout: &StageLayout,
    ) -> Result<Vec<BindGroup>> {
        let mut bind_groups = Vec::new();

        for (group_idx, group) in layout.bind_groups.iter().enumerate() {
            let items = group
                .iter()
                .map(|&(res, access)| {
                    self.bindable(res, access).ok_or_else(|| {
                        Error::InvalidStageLayout {
                            stage: layout.stage,
                            reason: format!(
                                "{res:?} cannot be bound for {access:?}"
                            ),
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let mut bind_group = BindGroup::builder(format!(
                "{}_bg{group_idx}",
                layout.stage
            ));

            for item in &items {
                bind_group = bind_group.add(item.as_ref());
            }

            bind_groups.push(bind_group.build(device));
        }

        Ok(bind_groups)
    }

    fn bindable(
        &self,
        res: Resource,
        access: Access,
    ) -> Option<Box<dyn DoubleBufferedBindable + 'a>> {
        let targets = self.targets;

        let texture = |tex: &'a Texture| {
            let bindable: Box<dyn DoubleBufferedBindable + 'a> = match access {
                Access::Read => Box::new(tex.bind_readable()),
                Access::Write => Box::new(tex.bind_writable()),
            };

            bindable
        };

        let bindable: Box<dyn DoubleBufferedBindable + 'a> =
            match (res, access) {
                (Resource::Camera, Access::Read) => Box::new(&targets.camera),
                (Resource::Settings, Access::Read) => Box::new(self.settings),
                (Resource::Lights, Access::Read) => {
                    Box::new(self.lights.bind_readable())
                }
                (Resource::Materials, Access::Read) => {
                    Box::new(self.materials.bind_readable())
                }
                (Resource::ShadowMaps, Access::Read) => {
                    Box::new(self.shadow_maps.bind_readable())
                }
                (Resource::GBufferColor, _) => texture(&targets.gbuffer_color),
                (Resource::GBufferSurface, _) => {
                    texture(&targets.gbuffer_surface)
                }
                (Resource::GBufferMaterial, _) => {
                    texture(&targets.gbuffer_material)
                }
                (Resource::Indirect, _) => texture(&targets.indirect),
                (Resource::Denoised, Access::Read) => {
                    Box::new(targets.denoised.curr().bind_readable())
                }
                (Resource::Denoised, Access::Write) => {
                    Box::new(targets.denoised.curr().bind_writable())
                }
                (Resource::DenoiseHistory, Access::Read) => {
                    Box::new(targets.denoised.past().bind_readable())
                }
                _ => return None,
            };

        Some(bindable)
    }
}

macro_rules! stages {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        /// All stages, in the order they run.
        #[derive(Debug)]
        pub struct Stages {
            $( pub $name: $class, )*
        }

        impl Stages {
            pub fn layouts() -> Vec<StageLayout> {
                vec![ $( $class::layout(), )* ]
            }

            pub fn new(
                device: &wgpu::Device,
                res: &StageResources,
            ) -> Result<Self> {
                debug!("Initializing stages");

                validate(&Self::layouts())?;

                Ok(Self {
                    $(
                        $name: {
                            device.push_error_scope(
                                wgpu::ErrorFilter::Validation,
                            );

                            let stage = $class::new(device, res);

                            check(device, stringify!($name))?;
                            stage?
                        },
                    )*
                })
            }
        }
    };
}

stages!([
    shadow => ShadowStage,
    gbuffer => GBufferStage,
    indirect => IndirectStage,
    denoise => DenoiseStage,
    compose => ComposeStage,
]);

/// Replaces `stages` with freshly built ones if `stale` is set.
///
/// `stale` gets cleared only after a successful rebuild, so a failed one is
/// retried on the next call instead of leaving stages bound to resources
/// that no longer exist.
pub fn rebuild_if_stale<T>(
    stale: &mut bool,
    stages: &mut T,
    build: impl FnOnce() -> Result<T>,
) -> Result<()> {
    if *stale {
        *stages = build()?;
        *stale = false;
    }

    Ok(())
}

/// Pops the error scope pushed before creating given stage's resources.
fn check(device: &wgpu::Device, stage: &'static str) -> Result<()> {
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(Error::PipelineCreation {
            stage,
            message: err.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_is_valid() {
        validate(&Stages::layouts()).unwrap();
    }

    #[test]
    fn stages_run_in_order() {
        let actual: Vec<_> =
            Stages::layouts().iter().map(|layout| layout.stage).collect();

        assert_eq!(
            vec!["shadow", "gbuffer", "indirect", "denoise", "compose"],
            actual
        );
    }

    #[test]
    fn failed_rebuild_is_retried() {
        let mut stale = false;
        let mut stages = "initial";

        rebuild_if_stale(&mut stale, &mut stages, || unreachable!()).unwrap();

        stale = true;

        let result = rebuild_if_stale(&mut stale, &mut stages, || {
            Err(Error::PipelineCreation {
                stage: "gbuffer",
                message: "out of memory".into(),
            })
        });

        assert!(result.is_err());
        assert!(stale);
        assert_eq!("initial", stages);

        rebuild_if_stale(&mut stale, &mut stages, || Ok("rebuilt")).unwrap();

        assert!(!stale);
        assert_eq!("rebuilt", stages);

        rebuild_if_stale(&mut stale, &mut stages, || unreachable!()).unwrap();

        assert_eq!("rebuilt", stages);
    }

    #[test]
    fn bind_groups_are_bindable() {
        for layout in Stages::layouts() {
            for &(res, access) in layout.bind_groups.iter().flatten() {
                assert!(
                    res.is_bindable(access),
                    "stage `{}` binds {res:?} for {access:?}",
                    layout.stage
                );
            }
        }
    }

    #[test]
    fn denoise_reads_history_next_to_its_output() {
        assert_eq!(
            vec![
                vec![
                    (Resource::Camera, Access::Read),
                    (Resource::Indirect, Access::Read),
                ],
                vec![
                    (Resource::DenoiseHistory, Access::Read),
                    (Resource::Denoised, Access::Write),
                ],
            ],
            DenoiseStage::layout().bind_groups
        );
    }

    #[test]
    fn swapping_stages_breaks_the_pipeline() {
        let mut layouts = Stages::layouts();

        layouts.swap(2, 3);

        assert!(matches!(
            validate(&layouts),
            Err(Error::InvalidStageLayout {
                stage: "denoise",
                ..
            })
        ));
    }
}
