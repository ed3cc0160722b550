/// Resource that can be attached to a pipeline (a buffer, a texture, a
/// sampler).
///
/// Returns one entry per binding it occupies, starting at `binding`.
pub trait Bindable {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)>;
}

impl<T> Bindable for &T
where
    T: Bindable + ?Sized,
{
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        T::bind(self, binding)
    }
}

/// Resource that exists in two versions, one per frame parity.
///
/// Both versions must share the same layout; only the underlying resources
/// differ.
pub trait DoubleBufferedBindable {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, [wgpu::BindingResource; 2])>;
}

impl<T> DoubleBufferedBindable for T
where
    T: Bindable,
{
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, [wgpu::BindingResource; 2])> {
        T::bind(self, binding)
            .into_iter()
            .map(|(layout, resource)| (layout, [resource.clone(), resource]))
            .collect()
    }
}

/// Builds entries of a bind group layout out of given items.
pub fn bind_layout_entries(
    items: &[&dyn Bindable],
) -> Vec<wgpu::BindGroupLayoutEntry> {
    bind_entries(items)
        .into_iter()
        .map(|(layout, _)| layout)
        .collect()
}

/// Builds a bind group out of given items, according to an already existing
/// layout.
pub fn bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    items: &[&dyn Bindable],
) -> wgpu::BindGroup {
    let entries: Vec<_> = bind_entries(items)
        .into_iter()
        .map(|(layout, resource)| wgpu::BindGroupEntry {
            binding: layout.binding,
            resource,
        })
        .collect();

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    })
}

fn bind_entries<'a>(
    items: &[&'a dyn Bindable],
) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'a>)> {
    let mut entries = Vec::new();

    for &item in items {
        entries.extend(item.bind(entries.len() as u32));
    }

    entries
}
