use derivative::Derivative;
use glam::UVec2;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(u32);

impl ImageId {
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// RGBA8 image, uploaded to the GPU as-is; colors are expected to be in sRGB.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Image {
    size: UVec2,

    #[derivative(Debug = "ignore")]
    pixels: Vec<u8>,
}

impl Image {
    pub fn new(size: UVec2, pixels: Vec<u8>) -> Result<Self> {
        let expected = 4 * (size.x as usize) * (size.y as usize);

        if size.x == 0 || size.y == 0 || pixels.len() != expected {
            return Err(Error::InvalidImage {
                width: size.x,
                height: size.y,
                len: pixels.len(),
            });
        }

        Ok(Self { size, pixels })
    }

    /// Creates a 1x1 image of given color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            size: UVec2::ONE,
            pixels: rgba.to_vec(),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
