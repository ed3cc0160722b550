use crate::{DoubleBufferedBindable, FrameParity};

/// Pair of bind groups sharing a single layout, one per frame parity.
///
/// Bind groups that don't refer to any double-buffered resource simply end up
/// with two identical versions.
#[derive(Debug)]
pub struct BindGroup {
    even: wgpu::BindGroup,
    odd: wgpu::BindGroup,
    layout: wgpu::BindGroupLayout,
}

impl BindGroup {
    pub fn builder<'a>(label: impl ToString) -> BindGroupBuilder<'a> {
        BindGroupBuilder {
            label: label.to_string(),
            layouts: Default::default(),
            resources: Default::default(),
        }
    }

    pub fn get(&self, parity: FrameParity) -> &wgpu::BindGroup {
        match parity {
            FrameParity::Even => &self.even,
            FrameParity::Odd => &self.odd,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }
}

pub struct BindGroupBuilder<'a> {
    label: String,
    layouts: Vec<wgpu::BindGroupLayoutEntry>,
    resources: Vec<[wgpu::BindingResource<'a>; 2]>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn add(mut self, item: &'a dyn DoubleBufferedBindable) -> Self {
        for (layout, resources) in item.bind(self.resources.len() as u32) {
            self.layouts.push(layout);
            self.resources.push(resources);
        }

        self
    }

    pub fn build(self, device: &wgpu::Device) -> BindGroup {
        let label = format!("penumbra_{}", self.label);

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}_layout")),
                entries: &self.layouts,
            });

        let (entries_even, entries_odd): (Vec<_>, Vec<_>) = self
            .resources
            .into_iter()
            .enumerate()
            .map(|(binding, resources)| {
                let [even, odd] =
                    resources.map(|resource| wgpu::BindGroupEntry {
                        binding: binding as u32,
                        resource,
                    });

                (even, odd)
            })
            .unzip();

        let even = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}_even")),
            layout: &layout,
            entries: &entries_even,
        });

        let odd = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}_odd")),
            layout: &layout,
            entries: &entries_odd,
        });

        BindGroup { even, odd, layout }
    }
}
