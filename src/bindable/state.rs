//! Fixed-function state bindables - topology, rasterizer, blend,
//! depth/stencil

use crate::error::Result;
use crate::gfx::{BlendMode, CullMode, DepthStencilMode, GraphicsDevice, PrimitiveTopology};

/// Primitive topology for the input assembler
///
/// A drawable owns exactly one.
pub struct Topology {
    topology: PrimitiveTopology,
}

impl Topology {
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self { topology }
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_topology(self.topology)
    }
}

/// Rasterizer state (face culling)
pub struct Rasterizer {
    cull: CullMode,
}

impl Rasterizer {
    pub fn new(cull: CullMode) -> Self {
        Self { cull }
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.set_cull_mode(self.cull)
    }
}

/// Output-merger blend state
pub struct Blend {
    mode: BlendMode,
}

impl Blend {
    pub fn new(mode: BlendMode) -> Self {
        Self { mode }
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.set_blend_mode(self.mode)
    }
}

/// Depth/stencil state
pub struct DepthStencil {
    mode: DepthStencilMode,
}

impl DepthStencil {
    pub fn new(mode: DepthStencilMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DepthStencilMode {
        self.mode
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.set_depth_stencil_mode(self.mode)
    }
}
