use fxhash::FxHashMap;
use log::debug;

use crate::{Error, Result};

/// Resource a stage can bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Camera,
    Settings,
    Lights,
    Materials,
    Geometry,
    ShadowMaps,
    GBufferColor,
    GBufferSurface,
    GBufferMaterial,
    GBufferDepth,
    Indirect,
    Denoised,

    /// Denoiser's output from the previous frame
    DenoiseHistory,

    /// Caller's texture view the frame is presented into
    Output,
}

impl Resource {
    /// Returns whether this resource is provided from outside of the
    /// pipeline (by the host or by the previous frame), as opposed to being
    /// produced by one of its stages.
    pub fn is_external(self) -> bool {
        matches!(
            self,
            Resource::Camera
                | Resource::Settings
                | Resource::Lights
                | Resource::Materials
                | Resource::Geometry
                | Resource::DenoiseHistory
        )
    }

    /// Returns whether this resource can be part of a bind group, as opposed
    /// to being attached to the pass (vertex buffers, render attachments).
    pub fn is_bindable(self, access: Access) -> bool {
        match self {
            Resource::Geometry | Resource::GBufferDepth | Resource::Output => {
                false
            }

            Resource::Camera
            | Resource::Settings
            | Resource::Lights
            | Resource::Materials
            | Resource::ShadowMaps
            | Resource::DenoiseHistory => access == Access::Read,

            Resource::GBufferColor
            | Resource::GBufferSurface
            | Resource::GBufferMaterial
            | Resource::Indirect
            | Resource::Denoised => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Resources a stage reads and writes.
///
/// Resources declared through [`Self::bind_group()`] are what the stage's
/// bind groups get built from, in the declared order; the rest is attached
/// to the pass directly.
#[derive(Clone, Debug)]
pub struct StageLayout {
    pub stage: &'static str,
    pub bindings: Vec<(Resource, Access)>,
    pub bind_groups: Vec<Vec<(Resource, Access)>>,
}

impl StageLayout {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            bindings: Default::default(),
            bind_groups: Default::default(),
        }
    }

    pub fn bind_group(mut self, f: impl FnOnce(Self) -> Self) -> Self {
        let group = f(Self::new(self.stage)).bindings;

        self.bindings.extend(group.iter().copied());
        self.bind_groups.push(group);
        self
    }

    pub fn reads(
        mut self,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Self {
        self.bindings
            .extend(resources.into_iter().map(|res| (res, Access::Read)));

        self
    }

    pub fn writes(
        mut self,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Self {
        self.bindings
            .extend(resources.into_iter().map(|res| (res, Access::Write)));

        self
    }

    fn accesses(&self, access: Access) -> impl Iterator<Item = Resource> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, access2)| *access2 == access)
            .map(|(res, _)| *res)
    }
}

/// Checks that given stages, run in given order, form a valid pipeline:
///
/// - a stage never reads and writes the same resource,
/// - each resource is produced by at most one stage,
/// - a stage reads only external resources and resources produced by stages
///   that run before it,
/// - external resources are never written,
/// - bind groups contain only resources that can be bound.
pub fn validate(stages: &[StageLayout]) -> Result<()> {
    let mut writers: FxHashMap<Resource, &'static str> = Default::default();

    for layout in stages {
        let stage = layout.stage;
        let invalid =
            |reason: String| Error::InvalidStageLayout { stage, reason };

        for &(res, access) in layout.bind_groups.iter().flatten() {
            if !res.is_bindable(access) {
                return Err(invalid(format!(
                    "{res:?} cannot be bound for {access:?}"
                )));
            }
        }

        for res in layout.accesses(Access::Write) {
            if layout.accesses(Access::Read).any(|res2| res2 == res) {
                return Err(invalid(format!(
                    "{res:?} is both read and written"
                )));
            }

            if res.is_external() {
                return Err(invalid(format!(
                    "{res:?} is provided from outside and cannot be written"
                )));
            }
        }

        for res in layout.accesses(Access::Read) {
            if !res.is_external() && !writers.contains_key(&res) {
                return Err(invalid(format!(
                    "{res:?} is read before any stage writes it"
                )));
            }
        }

        for res in layout.accesses(Access::Write) {
            if let Some(other) = writers.insert(res, stage) {
                return Err(invalid(format!(
                    "{res:?} is already written by stage `{other}`"
                )));
            }
        }

        debug!("Stage `{stage}` validated; bindings={:?}", layout.bindings);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Resource::*;

    fn assert_invalid(stages: &[StageLayout], expected_stage: &str) {
        match validate(stages) {
            Err(Error::InvalidStageLayout { stage, .. }) => {
                assert_eq!(expected_stage, stage);
            }
            other => panic!("expected an invalid layout, got {other:?}"),
        }
    }

    #[test]
    fn valid() {
        let stages = [
            StageLayout::new("a").reads([Camera]).writes([GBufferColor]),
            StageLayout::new("b")
                .reads([GBufferColor, DenoiseHistory])
                .writes([Denoised]),
            StageLayout::new("c").reads([Denoised]).writes([Output]),
        ];

        assert!(validate(&stages).is_ok());
        assert!(validate(&[]).is_ok());
    }

    #[test]
    fn read_before_write() {
        let stages = [
            StageLayout::new("a").reads([Indirect]).writes([Denoised]),
            StageLayout::new("b").reads([Camera]).writes([Indirect]),
        ];

        assert_invalid(&stages, "a");
    }

    #[test]
    fn read_and_write_aliasing() {
        let stages =
            [StageLayout::new("a").reads([Denoised]).writes([Denoised])];

        assert_invalid(&stages, "a");
    }

    #[test]
    fn multiple_writers() {
        let stages = [
            StageLayout::new("a").writes([Indirect]),
            StageLayout::new("b").writes([Indirect]),
        ];

        assert_invalid(&stages, "b");
    }

    #[test]
    fn bind_groups() {
        let layout = StageLayout::new("a")
            .bind_group(|group| group.reads([Camera]).writes([Indirect]))
            .reads([Geometry])
            .bind_group(|group| group.reads([Settings]));

        assert_eq!(
            vec![
                vec![(Camera, Access::Read), (Indirect, Access::Write)],
                vec![(Settings, Access::Read)],
            ],
            layout.bind_groups
        );

        assert_eq!(4, layout.bindings.len());
        assert!(validate(&[layout]).is_ok());
    }

    #[test]
    fn binding_attachments() {
        assert_invalid(
            &[StageLayout::new("a")
                .bind_group(|group| group.writes([GBufferDepth]))],
            "a",
        );

        assert_invalid(
            &[StageLayout::new("a")
                .bind_group(|group| group.reads([Geometry]))],
            "a",
        );

        assert_invalid(
            &[
                StageLayout::new("a").writes([ShadowMaps]),
                StageLayout::new("b")
                    .bind_group(|group| group.writes([ShadowMaps])),
            ],
            "b",
        );
    }

    #[test]
    fn writing_external_resource() {
        let stages = [StageLayout::new("a").writes([DenoiseHistory])];

        assert_invalid(&stages, "a");
    }
}
