//! Texture and sampler bindables

use crate::error::Result;
use crate::gfx::{GraphicsDevice, SamplerDesc, SamplerId, TextureDesc, TextureId};

/// Immutable texture bound to a pixel-shader slot
pub struct Texture {
    texture: TextureId,
    slot: u32,
}

impl Texture {
    pub fn new(device: &mut dyn GraphicsDevice, desc: TextureDesc, slot: u32) -> Result<Self> {
        let texture = device.create_texture(desc)?;
        Ok(Self { texture, slot })
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_texture(self.slot, self.texture)
    }
}

/// Sampler state bound to a pixel-shader slot
pub struct Sampler {
    sampler: SamplerId,
    slot: u32,
}

impl Sampler {
    pub fn new(device: &mut dyn GraphicsDevice, desc: SamplerDesc, slot: u32) -> Result<Self> {
        let sampler = device.create_sampler(desc)?;
        Ok(Self { sampler, slot })
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_sampler(self.slot, self.sampler)
    }
}
