use crate::{
    gpu, Bindable, BufferFlushOutcome, Config, Light, MappedStorageBuffer,
};

#[derive(Debug)]
pub struct Lights {
    lights: Vec<Light>,
    buffer: MappedStorageBuffer<gpu::Light>,
}

impl Lights {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            lights: Default::default(),
            buffer: MappedStorageBuffer::new_default(device, "penumbra_lights"),
        }
    }

    pub fn set(&mut self, lights: Vec<Light>) {
        self.lights = lights;
    }

    pub fn len(&self) -> u32 {
        self.lights.len() as u32
    }

    /// Returns the number of lights that need a shadow map.
    pub fn shadow_casters(&self) -> u32 {
        self.lights.iter().filter(|light| light.casts_shadows).count() as u32
    }

    /// Re-derives lights' projections and shadow-map assignments; called
    /// once per frame, since lights might've been mutated in-between.
    pub fn refresh(&mut self, config: &Config) {
        let layers = assign_shadow_maps(&self.lights);

        let lights = self
            .lights
            .iter()
            .zip(layers)
            .map(|(light, layer)| light.serialize(config, layer))
            .collect();

        *self.buffer = lights;
    }

    /// Returns the serialized lights that own a shadow map, as of the last
    /// [`Self::refresh()`].
    pub fn serialized_shadow_casters(
        &self,
    ) -> impl Iterator<Item = &gpu::Light> + '_ {
        self.buffer.iter().filter(|light| light.has_shadow_map())
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
}

/// Hands out shadow-map layers, in order, to the lights that cast shadows.
fn assign_shadow_maps(lights: &[Light]) -> Vec<Option<u32>> {
    let mut next = 0;

    lights
        .iter()
        .map(|light| {
            light.casts_shadows.then(|| {
                next += 1;
                next - 1
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn shadow_maps_are_assigned_to_casters_only() {
        let light = |casts_shadows| {
            Light::point(Vec3::ZERO, Vec3::ONE).with_shadows(casts_shadows)
        };

        let actual =
            assign_shadow_maps(&[light(true), light(false), light(true)]);

        assert_eq!(vec![Some(0), None, Some(1)], actual);
        assert!(assign_shadow_maps(&[]).is_empty());
    }
}
