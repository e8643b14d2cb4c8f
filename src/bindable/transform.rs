//! Transform constant buffer
//!
//! One constant buffer carrying the per-object transform matrices,
//! updated in place on every bind from the current [`DrawContext`].
//! Sharing one transform buffer across drawables is safe in the
//! single-threaded frame loop: the draw that follows each bind consumes
//! the values before the next object overwrites them ("last object
//! wins"). Not safe for reentrant or concurrent bind calls.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::bindable::DrawContext;
use crate::error::Result;
use crate::gfx::{GraphicsDevice, ShaderStage};

use super::buffer::ConstantBuffer;

/// GPU layout of the transform constants
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct TransformData {
    world: Mat4,
    world_view: Mat4,
    world_view_projection: Mat4,
}

/// Per-draw transform constant buffer
///
/// Bound to the vertex stage, and optionally mirrored to a pixel-stage
/// slot for techniques that need the transform in the pixel shader.
pub struct TransformBuffer {
    vertex: ConstantBuffer,
    pixel: Option<ConstantBuffer>,
}

impl TransformBuffer {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        vertex_slot: u32,
        pixel_slot: Option<u32>,
    ) -> Result<Self> {
        let initial = TransformData {
            world: Mat4::IDENTITY,
            world_view: Mat4::IDENTITY,
            world_view_projection: Mat4::IDENTITY,
        };
        let vertex = ConstantBuffer::new(device, ShaderStage::Vertex, vertex_slot, &initial)?;
        let pixel = match pixel_slot {
            Some(slot) => Some(ConstantBuffer::new(
                device,
                ShaderStage::Pixel,
                slot,
                &initial,
            )?),
            None => None,
        };
        Ok(Self { vertex, pixel })
    }

    pub(crate) fn vertex_buffer_id(&self) -> crate::gfx::BufferId {
        self.vertex.id()
    }

    pub(crate) fn bind(&self, ctx: &mut DrawContext) -> Result<()> {
        let world_view = ctx.view * ctx.world;
        let data = TransformData {
            world: ctx.world,
            world_view,
            world_view_projection: ctx.projection * world_view,
        };
        self.vertex.update(ctx.device, &data)?;
        self.vertex.bind(ctx.device)?;
        if let Some(pixel) = &self.pixel {
            pixel.update(ctx.device, &data)?;
            pixel.bind(ctx.device)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
