use log::info;

use crate::Bindable;

/// Depth maps rendered from lights' point of view, stored as layers of a
/// single array texture.
///
/// The array grows lazily as shadow-casting lights appear and never shrinks,
/// so toggling lights back and forth doesn't cause reallocations.
#[derive(Debug)]
pub struct ShadowMaps {
    size: u32,
    capacity: u32,
    tex: wgpu::Texture,
    view: wgpu::TextureView,
    layers: Vec<wgpu::TextureView>,
}

impl ShadowMaps {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, size: u32) -> Self {
        Self::allocate(device, size, next_capacity(0, 0))
    }

    /// Makes sure there's room for `required` maps; returns whether the
    /// texture has been reallocated, which invalidates bind groups that refer
    /// to it.
    pub fn ensure(&mut self, device: &wgpu::Device, required: u32) -> bool {
        let capacity = next_capacity(self.capacity, required);

        if capacity == self.capacity {
            return false;
        }

        self.tex.destroy();

        *self = Self::allocate(device, self.size, capacity);

        true
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns view of a single map, for rendering into it.
    pub fn layer(&self, layer: u32) -> Option<&wgpu::TextureView> {
        self.layers.get(layer as usize)
    }

    pub fn bind_readable(&self) -> impl Bindable + '_ {
        ShadowMapsBinder { parent: self }
    }

    fn allocate(device: &wgpu::Device, size: u32, capacity: u32) -> Self {
        info!(
            "Allocating shadow maps; size={size}x{size}, capacity={capacity}"
        );

        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("penumbra_shadow_maps"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: capacity,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = tex.create_view(&wgpu::TextureViewDescriptor {
            label: Some("penumbra_shadow_maps_view"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });

        let layers = (0..capacity)
            .map(|layer| {
                tex.create_view(&wgpu::TextureViewDescriptor {
                    label: Some(&format!("penumbra_shadow_map_{layer}")),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_array_layer: layer,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        Self {
            size,
            capacity,
            tex,
            view,
            layers,
        }
    }
}

/// Returns how many maps should be allocated, given how many there are and
/// how many are needed.
///
/// Empty texture arrays cannot be bound, so there's always at least one map,
/// even if no light casts shadows.
fn next_capacity(current: u32, required: u32) -> u32 {
    current.max(required).max(1)
}

struct ShadowMapsBinder<'a> {
    parent: &'a ShadowMaps,
}

impl Bindable for ShadowMapsBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Depth,
                view_dimension: wgpu::TextureViewDimension::D2Array,
                multisampled: false,
            },
            count: None,
        };

        let resource = wgpu::BindingResource::TextureView(&self.parent.view);

        vec![(layout, resource)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_grows_but_never_shrinks() {
        let mut capacity = next_capacity(0, 0);

        assert_eq!(1, capacity);

        for (required, expected) in
            [(0, 1), (1, 1), (3, 3), (2, 3), (0, 3), (5, 5), (4, 5)]
        {
            capacity = next_capacity(capacity, required);

            assert_eq!(expected, capacity, "required={required}");
        }
    }
}
