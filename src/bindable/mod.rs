//! Bindable pipeline-state objects
//!
//! A bindable wraps one piece of GPU pipeline state and pushes it into the
//! device on [`Bindable::bind`]. The variant set is closed: there are no
//! plugin bindables, so dispatch is a plain match instead of a trait
//! object. Bindables are shared across drawables via `Arc`, usually
//! through the [`BindableCache`].

pub mod buffer;
pub mod cache;
pub mod shader;
pub mod state;
pub mod texture;
pub mod transform;

pub use buffer::{ConstantBuffer, IndexBuffer, VertexBuffer};
pub use cache::BindableCache;
pub use shader::{InputLayout, PixelShader, VertexShader};
pub use state::{Blend, DepthStencil, Rasterizer, Topology};
pub use texture::{Sampler, Texture};
pub use transform::TransformBuffer;

use glam::Mat4;

use crate::error::Result;
use crate::gfx::GraphicsDevice;

/// Per-draw context handed to every bind
///
/// Carries the device plus the matrices the transform bindable needs.
/// Pass-scoped bindables bind with an identity world matrix.
pub struct DrawContext<'a> {
    pub device: &'a mut dyn GraphicsDevice,
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl<'a> DrawContext<'a> {
    /// Context for pass-scoped binds (no object transform)
    pub fn pass_scope(device: &'a mut dyn GraphicsDevice, view: Mat4, projection: Mat4) -> Self {
        Self {
            device,
            world: Mat4::IDENTITY,
            view,
            projection,
        }
    }
}

/// One piece of bindable GPU pipeline state
///
/// Binding pushes state into the device without branching on external
/// conditions; later binds overwrite earlier ones in the same stage/slot,
/// so callers sequence binds deliberately (geometry first, then
/// technique-specific state).
pub enum Bindable {
    VertexBuffer(VertexBuffer),
    IndexBuffer(IndexBuffer),
    Constant(ConstantBuffer),
    VertexShader(VertexShader),
    PixelShader(PixelShader),
    InputLayout(InputLayout),
    Topology(Topology),
    Transform(TransformBuffer),
    Rasterizer(Rasterizer),
    Blend(Blend),
    DepthStencil(DepthStencil),
    Texture(Texture),
    Sampler(Sampler),
}

impl Bindable {
    /// Push this state into the device
    pub fn bind(&self, ctx: &mut DrawContext) -> Result<()> {
        match self {
            Bindable::VertexBuffer(b) => b.bind(ctx.device),
            Bindable::IndexBuffer(b) => b.bind(ctx.device),
            Bindable::Constant(b) => b.bind(ctx.device),
            Bindable::VertexShader(s) => s.bind(ctx.device),
            Bindable::PixelShader(s) => s.bind(ctx.device),
            Bindable::InputLayout(l) => l.bind(ctx.device),
            Bindable::Topology(t) => t.bind(ctx.device),
            Bindable::Transform(t) => t.bind(ctx),
            Bindable::Rasterizer(r) => r.bind(ctx.device),
            Bindable::Blend(b) => b.bind(ctx.device),
            Bindable::DepthStencil(d) => d.bind(ctx.device),
            Bindable::Texture(t) => t.bind(ctx.device),
            Bindable::Sampler(s) => s.bind(ctx.device),
        }
    }

    /// The index buffer behind this bindable, if it is one
    pub fn as_index_buffer(&self) -> Option<&IndexBuffer> {
        match self {
            Bindable::IndexBuffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_topology(&self) -> bool {
        matches!(self, Bindable::Topology(_))
    }
}
