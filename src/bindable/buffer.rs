//! Buffer bindables - vertex, index and constant buffers

use bytemuck::Pod;

use crate::error::Result;
use crate::gfx::{BufferId, GraphicsDevice, ShaderStage};

/// Immutable vertex buffer
pub struct VertexBuffer {
    buffer: BufferId,
    stride: u32,
}

impl VertexBuffer {
    /// Create from raw bytes with an explicit stride
    pub fn new(device: &mut dyn GraphicsDevice, data: &[u8], stride: u32) -> Result<Self> {
        let buffer = device.create_vertex_buffer(data, stride)?;
        Ok(Self { buffer, stride })
    }

    /// Create from a typed vertex slice
    pub fn from_vertices<V: Pod>(device: &mut dyn GraphicsDevice, vertices: &[V]) -> Result<Self> {
        Self::new(
            device,
            bytemuck::cast_slice(vertices),
            std::mem::size_of::<V>() as u32,
        )
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_vertex_buffer(self.buffer)
    }
}

/// Immutable 16-bit index buffer
///
/// A drawable owns exactly one; its index count is the draw count.
pub struct IndexBuffer {
    buffer: BufferId,
    count: u32,
}

impl IndexBuffer {
    pub fn new(device: &mut dyn GraphicsDevice, indices: &[u16]) -> Result<Self> {
        let buffer = device.create_index_buffer(indices)?;
        Ok(Self {
            buffer,
            count: indices.len() as u32,
        })
    }

    /// Number of indices (the indexed draw count)
    pub fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_index_buffer(self.buffer)
    }
}

/// Constant buffer bound to one stage/slot
///
/// The contents are updated in place through the device; sharing one
/// constant buffer across drawables gives "last object wins" semantics.
#[derive(Clone, Copy)]
pub struct ConstantBuffer {
    buffer: BufferId,
    stage: ShaderStage,
    slot: u32,
}

impl ConstantBuffer {
    /// Create with initial contents
    pub fn new<T: Pod>(
        device: &mut dyn GraphicsDevice,
        stage: ShaderStage,
        slot: u32,
        initial: &T,
    ) -> Result<Self> {
        let size = std::mem::size_of::<T>() as u64;
        let buffer = device.create_constant_buffer(size)?;
        device.update_constant_buffer(buffer, bytemuck::bytes_of(initial))?;
        Ok(Self {
            buffer,
            stage,
            slot,
        })
    }

    /// Overwrite the buffer contents
    pub fn update<T: Pod>(&self, device: &mut dyn GraphicsDevice, value: &T) -> Result<()> {
        device.update_constant_buffer(self.buffer, bytemuck::bytes_of(value))
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub(crate) fn id(&self) -> BufferId {
        self.buffer
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_constant_buffer(self.stage, self.slot, self.buffer)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
