use glam::UVec2;

use crate::{Bindable, DoubleBufferedBindable, FrameParity, Texture};

/// Two-slot ring of resources, indexed by [`FrameParity`].
///
/// During a frame, the slot selected by the current parity is written and the
/// other one is read as the previous frame's result; flipping the parity swaps
/// their roles without copying anything.
#[derive(Debug)]
pub struct DoubleBuffered<T> {
    even: T,
    odd: T,
}

impl<T> DoubleBuffered<T> {
    pub fn from_fn(mut f: impl FnMut(FrameParity) -> T) -> Self {
        Self {
            even: f(FrameParity::Even),
            odd: f(FrameParity::Odd),
        }
    }

    pub fn get(&self, parity: FrameParity) -> &T {
        match parity {
            FrameParity::Even => &self.even,
            FrameParity::Odd => &self.odd,
        }
    }

    /// Returns a view that resolves, for given parity, to the slot written
    /// during that frame.
    pub fn curr(&self) -> DoubleBuffered<&T> {
        DoubleBuffered {
            even: &self.even,
            odd: &self.odd,
        }
    }

    /// Returns a view that resolves, for given parity, to the slot written
    /// during the previous frame.
    pub fn past(&self) -> DoubleBuffered<&T> {
        DoubleBuffered {
            even: &self.odd,
            odd: &self.even,
        }
    }
}

impl DoubleBuffered<Texture> {
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: UVec2,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let label = label.as_ref();

        Self::from_fn(|parity| {
            let suffix = if parity.is_odd() { "odd" } else { "even" };

            Texture::builder(format!("{label}_{suffix}"))
                .with_size(size)
                .with_format(format)
                .with_usage(usage)
                .build(device)
        })
    }
}

impl<'a> DoubleBuffered<&'a Texture> {
    /// See: [`Texture::bind_readable()`].
    pub fn bind_readable(&self) -> impl DoubleBufferedBindable + 'a {
        DoubleBufferedBinder {
            even: self.even.bind_readable(),
            odd: self.odd.bind_readable(),
        }
    }

    /// See: [`Texture::bind_writable()`].
    pub fn bind_writable(&self) -> impl DoubleBufferedBindable + 'a {
        DoubleBufferedBinder {
            even: self.even.bind_writable(),
            odd: self.odd.bind_writable(),
        }
    }
}

pub struct DoubleBufferedBinder<T> {
    even: T,
    odd: T,
}

impl<T> DoubleBufferedBindable for DoubleBufferedBinder<T>
where
    T: Bindable,
{
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, [wgpu::BindingResource; 2])> {
        let entries_even = self.even.bind(binding);
        let entries_odd = self.odd.bind(binding);

        assert_eq!(entries_even.len(), entries_odd.len());

        entries_even
            .into_iter()
            .zip(entries_odd)
            .map(|((layout_even, even), (layout_odd, odd))| {
                assert_eq!(layout_even, layout_odd);

                (layout_even, [even, odd])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;

    #[test]
    fn read_and_write_slots_never_alias() {
        let target = DoubleBuffered::from_fn(|parity| parity);

        for parity in [FrameParity::Even, FrameParity::Odd] {
            let write: &FrameParity = *target.curr().get(parity);
            let read: &FrameParity = *target.past().get(parity);

            assert!(!ptr::eq(write, read));
            assert_eq!(parity, *write);
            assert_eq!(parity.flip(), *read);
        }
    }

    #[test]
    fn previous_write_becomes_next_read() {
        let target = DoubleBuffered::from_fn(|parity| parity);
        let mut parity = FrameParity::default();

        for _ in 0..4 {
            let written = **target.curr().get(parity);

            parity = parity.flip();

            assert_eq!(written, **target.past().get(parity));
        }
    }
}
