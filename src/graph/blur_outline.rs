//! Blur-outline render graph
//!
//! Concrete five-pass graph drawing the scene and a blurred outline
//! around selected geometry:
//!
//! 1. `geometry` - scene color into the back buffer
//! 2. `outline_mask` - outlined geometry in flat color into the mask
//!    target, marking covered pixels in the stencil
//! 3. `blur_horizontal` - separable Gaussian, mask into ping
//! 4. `blur_vertical` - ping into pong
//! 5. `composite` - pong over the back buffer, stencil-masked so the
//!    blur shows only outside the object
//!
//! The constructor wires targets, kernel constants, sampler and render
//! state; shader bindables are attached afterwards through
//! [`BlurOutlineRenderGraph::pass_mut`].

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::bindable::{Bindable, Blend, ConstantBuffer, DepthStencil, Rasterizer, Sampler};
use crate::config::Config;
use crate::engine_bail;
use crate::error::Result;
use crate::gfx::{
    BlendMode, CullMode, DepthStencilMode, GraphicsDevice, SamplerDesc, ShaderStage, TargetDesc,
    TargetId, TargetUsage, TextureFormat,
};
use crate::scene::Scene;

use super::graph::RenderGraph;
use super::job::Job;
use super::pass::{FullscreenPass, Pass, RenderQueuePass};

/// Largest supported blur radius in pixels
pub const MAX_BLUR_RADIUS: u32 = 15;

pub const PASS_GEOMETRY: &str = "geometry";
pub const PASS_OUTLINE_MASK: &str = "outline_mask";
pub const PASS_BLUR_HORIZONTAL: &str = "blur_horizontal";
pub const PASS_BLUR_VERTICAL: &str = "blur_vertical";
pub const PASS_COMPOSITE: &str = "composite";

/// GPU layout of the Gaussian kernel constants
///
/// Weights sit in the x lane of each row; cbuffer rows are 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BlurKernel {
    tap_count: u32,
    _padding: [u32; 3],
    weights: [[f32; 4]; 31],
}

impl BlurKernel {
    /// Normalized Gaussian weights for `tap_count = 2 * radius + 1` taps
    fn compute(radius: u32, sigma: f32) -> Self {
        let tap_count = 2 * radius + 1;
        let mut weights = [[0.0f32; 4]; 31];
        let mut sum = 0.0f32;
        for i in 0..tap_count as usize {
            let x = i as f32 - radius as f32;
            let w = (-(x * x) / (2.0 * sigma * sigma)).exp();
            weights[i][0] = w;
            sum += w;
        }
        for row in weights.iter_mut().take(tap_count as usize) {
            row[0] /= sum;
        }
        Self {
            tap_count,
            _padding: [0; 3],
            weights,
        }
    }
}

fn check_kernel_params(radius: u32, sigma: f32) -> Result<()> {
    if radius == 0 || radius > MAX_BLUR_RADIUS {
        engine_bail!(
            InvalidResource,
            "wind3d::BlurOutlineRenderGraph",
            "blur radius {} outside 1..={}",
            radius,
            MAX_BLUR_RADIUS
        );
    }
    if sigma <= 0.0 {
        engine_bail!(
            InvalidResource,
            "wind3d::BlurOutlineRenderGraph",
            "blur sigma {} must be positive",
            sigma
        );
    }
    Ok(())
}

/// GPU layout of the blur direction toggle
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BlurDirection {
    horizontal: u32,
    _padding: [u32; 3],
}

/// The five-pass blur-outline graph
pub struct BlurOutlineRenderGraph {
    graph: RenderGraph,
    mask: TargetId,
    ping: TargetId,
    pong: TargetId,
    kernel: ConstantBuffer,
    radius: u32,
    sigma: f32,
}

impl BlurOutlineRenderGraph {
    /// Build the graph over the device's frame surface
    ///
    /// Creates the mask/ping/pong targets at viewport size, the kernel
    /// and direction constants, and wires all five passes. The wiring is
    /// validated before returning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidResource`] if the config's blur
    /// radius or sigma is outside the range [`Self::set_kernel`]
    /// accepts.
    pub fn new(device: &mut dyn GraphicsDevice, config: &Config) -> Result<Self> {
        check_kernel_params(config.blur_radius, config.blur_sigma)?;
        let (width, height) = device.viewport_size();
        let offscreen = TargetDesc {
            width,
            height,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TargetUsage::RENDER_TARGET | TargetUsage::SHADER_RESOURCE,
        };
        let mask = device.create_render_target(offscreen)?;
        let ping = device.create_render_target(offscreen)?;
        let pong = device.create_render_target(offscreen)?;

        let kernel_data = BlurKernel::compute(config.blur_radius, config.blur_sigma);
        let kernel = ConstantBuffer::new(device, ShaderStage::Pixel, 0, &kernel_data)?;
        let horizontal = ConstantBuffer::new(
            device,
            ShaderStage::Pixel,
            1,
            &BlurDirection {
                horizontal: 1,
                _padding: [0; 3],
            },
        )?;
        let vertical = ConstantBuffer::new(
            device,
            ShaderStage::Pixel,
            1,
            &BlurDirection {
                horizontal: 0,
                _padding: [0; 3],
            },
        )?;
        let sampler = Arc::new(Bindable::Sampler(Sampler::new(
            device,
            SamplerDesc::default(),
            0,
        )?));

        let back = device.back_buffer();
        let depth = device.depth_buffer();

        let mut graph = RenderGraph::new();
        graph.add_pass(Pass::Queue(
            RenderQueuePass::new(PASS_GEOMETRY)
                .with_color_target(back)
                .with_depth_target(depth)
                .with_clear_color([0.0, 0.0, 0.0, 1.0])
                .with_clear_depth(1.0)
                .with_bindable(Arc::new(Bindable::DepthStencil(DepthStencil::new(
                    DepthStencilMode::Default,
                ))))
                .with_bindable(Arc::new(Bindable::Blend(Blend::new(BlendMode::Opaque))))
                .with_bindable(Arc::new(Bindable::Rasterizer(Rasterizer::new(
                    CullMode::Back,
                )))),
        ))?;
        graph.add_pass(Pass::Queue(
            RenderQueuePass::new(PASS_OUTLINE_MASK)
                .with_color_target(mask)
                .with_depth_target(depth)
                .with_clear_color([0.0, 0.0, 0.0, 0.0])
                .with_bindable(Arc::new(Bindable::DepthStencil(DepthStencil::new(
                    DepthStencilMode::StencilWrite,
                ))))
                .with_bindable(Arc::new(Bindable::Blend(Blend::new(BlendMode::Opaque)))),
        ))?;
        graph.add_pass(Pass::Fullscreen(
            FullscreenPass::new(PASS_BLUR_HORIZONTAL, mask, 0)
                .with_color_target(ping)
                .with_clear_color([0.0, 0.0, 0.0, 0.0])
                .with_bindable(Arc::new(Bindable::Constant(kernel)))
                .with_bindable(Arc::new(Bindable::Constant(horizontal)))
                .with_bindable(sampler.clone())
                .with_bindable(Arc::new(Bindable::DepthStencil(DepthStencil::new(
                    DepthStencilMode::DepthOff,
                ))))
                .with_bindable(Arc::new(Bindable::Blend(Blend::new(BlendMode::Opaque)))),
        ))?;
        graph.add_pass(Pass::Fullscreen(
            FullscreenPass::new(PASS_BLUR_VERTICAL, ping, 0)
                .with_color_target(pong)
                .with_clear_color([0.0, 0.0, 0.0, 0.0])
                .with_bindable(Arc::new(Bindable::Constant(kernel)))
                .with_bindable(Arc::new(Bindable::Constant(vertical)))
                .with_bindable(sampler.clone())
                .with_bindable(Arc::new(Bindable::DepthStencil(DepthStencil::new(
                    DepthStencilMode::DepthOff,
                ))))
                .with_bindable(Arc::new(Bindable::Blend(Blend::new(BlendMode::Opaque)))),
        ))?;
        graph.add_pass(Pass::Fullscreen(
            FullscreenPass::new(PASS_COMPOSITE, pong, 0)
                .with_color_target(back)
                .with_depth_target(depth)
                .with_bindable(sampler)
                .with_bindable(Arc::new(Bindable::DepthStencil(DepthStencil::new(
                    DepthStencilMode::StencilMask,
                ))))
                .with_bindable(Arc::new(Bindable::Blend(Blend::new(BlendMode::Alpha)))),
        ))?;
        graph.validate(device)?;

        Ok(Self {
            graph,
            mask,
            ping,
            pong,
            kernel,
            radius: config.blur_radius,
            sigma: config.blur_sigma,
        })
    }

    /// Recompute and upload the Gaussian kernel
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidResource`] for a radius of 0 or
    /// above [`MAX_BLUR_RADIUS`], or a non-positive sigma.
    pub fn set_kernel(
        &mut self,
        device: &mut dyn GraphicsDevice,
        radius: u32,
        sigma: f32,
    ) -> Result<()> {
        check_kernel_params(radius, sigma)?;
        self.kernel
            .update(device, &BlurKernel::compute(radius, sigma))?;
        self.radius = radius;
        self.sigma = sigma;
        Ok(())
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Offscreen target the outline mask renders into
    pub fn mask_target(&self) -> TargetId {
        self.mask
    }

    /// Intermediate target of the horizontal blur
    pub fn ping_target(&self) -> TargetId {
        self.ping
    }

    /// Intermediate target of the vertical blur
    pub fn pong_target(&self) -> TargetId {
        self.pong
    }

    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    /// Mutable graph access, e.g. for [`crate::scene::Scene::submit`]
    pub fn graph_mut(&mut self) -> &mut RenderGraph {
        &mut self.graph
    }

    /// Pass lookup for attaching shader bindables after construction
    pub fn pass_mut(&mut self, name: &str) -> Option<&mut Pass> {
        self.graph.pass_mut(name)
    }

    pub fn set_camera(&mut self, view: Mat4, projection: Mat4) {
        self.graph.set_camera(view, projection);
    }

    pub fn accept(&mut self, pass_name: &str, job: Job) -> Result<()> {
        self.graph.accept(pass_name, job)
    }

    pub fn validate(&self, device: &dyn GraphicsDevice) -> Result<()> {
        self.graph.validate(device)
    }

    pub fn execute(&self, scene: &Scene, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.graph.execute(scene, device)
    }

    pub fn reset(&mut self) {
        self.graph.reset();
    }

    /// Execute then reset, even when execution fails
    pub fn render_frame(&mut self, scene: &Scene, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.graph.render_frame(scene, device)
    }
}

#[cfg(test)]
#[path = "blur_outline_tests.rs"]
mod tests;
