//! GraphicsDevice trait - resource factory and pipeline-state machine

use bitflags::bitflags;

use crate::error::Result;

slotmap::new_key_type! {
    /// Handle to a GPU buffer (vertex, index or constant)
    pub struct BufferId;
    /// Handle to a compiled shader
    pub struct ShaderId;
    /// Handle to an input layout
    pub struct LayoutId;
    /// Handle to a texture
    pub struct TextureId;
    /// Handle to a sampler state
    pub struct SamplerId;
    /// Handle to a render target (color or depth/stencil)
    pub struct TargetId;
}

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

/// Primitive topology for the input assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    LineList,
}

/// Output-merger blend configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// No blending, source overwrites destination
    Opaque,
    /// Standard alpha blending
    Alpha,
    /// Additive blending
    Additive,
}

/// Rasterizer face culling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Depth/stencil configuration
///
/// The stencil modes implement the outline effect: `StencilWrite` marks
/// outlined geometry, `StencilMask` restricts a later composite to the
/// unmarked region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthStencilMode {
    /// Depth test and write enabled, stencil off
    Default,
    /// Depth as Default, stencil writes a mask bit for covered pixels
    StencilWrite,
    /// Depth off, stencil rejects pixels the mask bit covers
    StencilMask,
    /// Depth and stencil both off (fullscreen passes)
    DepthOff,
}

/// Sampler filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Point,
    Linear,
    Anisotropic,
}

/// Sampler addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Wrap,
    Clamp,
    Mirror,
}

/// Texture and target pixel formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    B8G8R8A8_UNORM,
    R32G32B32A32_FLOAT,
    D24_UNORM_S8_UINT,
}

/// Per-component format of one vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum VertexFormat {
    R32G32_FLOAT,
    R32G32B32_FLOAT,
    R32G32B32A32_FLOAT,
    R8G8B8A8_UNORM,
}

impl VertexFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            VertexFormat::R32G32_FLOAT => 8,
            VertexFormat::R32G32B32_FLOAT => 12,
            VertexFormat::R32G32B32A32_FLOAT => 16,
            VertexFormat::R8G8B8A8_UNORM => 4,
        }
    }
}

bitflags! {
    /// How a render target may be bound to the pipeline
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TargetUsage: u32 {
        /// Writable as a color attachment
        const RENDER_TARGET = 1 << 0;
        /// Readable as a shader-resource texture
        const SHADER_RESOURCE = 1 << 1;
        /// Usable as the depth/stencil attachment
        const DEPTH_STENCIL = 1 << 2;
    }
}

/// One vertex attribute in an input layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputElement {
    /// Semantic name matched against the vertex shader's input signature
    pub semantic: String,
    /// Attribute format
    pub format: VertexFormat,
}

impl InputElement {
    pub fn new(semantic: impl Into<String>, format: VertexFormat) -> Self {
        Self {
            semantic: semantic.into(),
            format,
        }
    }
}

/// Descriptor for creating a shader
///
/// `inputs` is the shader's declared input signature (semantic names in
/// order). Only meaningful for vertex shaders; the input layout built
/// alongside the shader must structurally match it.
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    pub stage: ShaderStage,
    pub name: String,
    pub bytecode: Vec<u8>,
    pub inputs: Vec<String>,
}

/// Descriptor for creating a texture with initial pixel data
#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
}

/// Descriptor for creating a sampler state
#[derive(Debug, Clone, Copy)]
pub struct SamplerDesc {
    pub filter: FilterMode,
    pub address: AddressMode,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            filter: FilterMode::Linear,
            address: AddressMode::Clamp,
        }
    }
}

/// Descriptor for creating an offscreen render target
#[derive(Debug, Clone, Copy)]
pub struct TargetDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TargetUsage,
}

/// Snapshot of the pipeline-state machine
///
/// One slot per pipeline stage; later binds silently overwrite earlier
/// ones in the same slot, so bind order is the caller's contract.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub vertex_buffer: Option<BufferId>,
    pub index_buffer: Option<BufferId>,
    pub vertex_shader: Option<ShaderId>,
    pub pixel_shader: Option<ShaderId>,
    pub input_layout: Option<LayoutId>,
    pub topology: Option<PrimitiveTopology>,
    pub blend: Option<BlendMode>,
    pub cull: Option<CullMode>,
    pub depth_stencil: Option<DepthStencilMode>,
    pub color_target: Option<TargetId>,
    pub depth_target: Option<TargetId>,
}

/// The graphics device - resource factory and pipeline-state machine
///
/// A single logical thread owns the device and issues all binds and draws
/// in program order; the `&mut` receiver carries that ordering guarantee.
/// Creation calls may fail with [`crate::Error::Device`]; binds only fail
/// for invalid handles or after device loss.
pub trait GraphicsDevice: Send {
    // ===== Resource creation =====

    /// Create an immutable vertex buffer from raw bytes
    fn create_vertex_buffer(&mut self, data: &[u8], stride: u32) -> Result<BufferId>;

    /// Create an immutable 16-bit index buffer
    fn create_index_buffer(&mut self, indices: &[u16]) -> Result<BufferId>;

    /// Create an updatable constant buffer of `size` bytes
    fn create_constant_buffer(&mut self, size: u64) -> Result<BufferId>;

    /// Overwrite a constant buffer's contents; `data` must match its size
    fn update_constant_buffer(&mut self, buffer: BufferId, data: &[u8]) -> Result<()>;

    /// Create a shader from precompiled bytecode
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<ShaderId>;

    /// Create an input layout validated against a vertex shader's input
    /// signature; a structural mismatch is a construction-time failure
    fn create_input_layout(&mut self, elements: &[InputElement], shader: ShaderId)
        -> Result<LayoutId>;

    /// Create an immutable texture
    fn create_texture(&mut self, desc: TextureDesc) -> Result<TextureId>;

    /// Create a sampler state
    fn create_sampler(&mut self, desc: SamplerDesc) -> Result<SamplerId>;

    /// Create an offscreen render target
    fn create_render_target(&mut self, desc: TargetDesc) -> Result<TargetId>;

    /// Look up the descriptor of a render target
    fn target_desc(&self, target: TargetId) -> Option<TargetDesc>;

    // ===== Pipeline binds =====

    fn bind_vertex_buffer(&mut self, buffer: BufferId) -> Result<()>;
    fn bind_index_buffer(&mut self, buffer: BufferId) -> Result<()>;
    fn bind_constant_buffer(&mut self, stage: ShaderStage, slot: u32, buffer: BufferId)
        -> Result<()>;
    fn bind_shader(&mut self, shader: ShaderId) -> Result<()>;
    fn bind_input_layout(&mut self, layout: LayoutId) -> Result<()>;
    fn bind_topology(&mut self, topology: PrimitiveTopology) -> Result<()>;
    fn bind_texture(&mut self, slot: u32, texture: TextureId) -> Result<()>;

    /// Bind a render target's texture view as a shader resource; the target
    /// must have been created with `TargetUsage::SHADER_RESOURCE`
    fn bind_target_as_texture(&mut self, slot: u32, target: TargetId) -> Result<()>;

    fn bind_sampler(&mut self, slot: u32, sampler: SamplerId) -> Result<()>;
    fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()>;
    fn set_cull_mode(&mut self, mode: CullMode) -> Result<()>;
    fn set_depth_stencil_mode(&mut self, mode: DepthStencilMode) -> Result<()>;

    // ===== Output merger =====

    /// Bind the color and depth attachments draws will render into
    fn set_render_target(&mut self, color: Option<TargetId>, depth: Option<TargetId>)
        -> Result<()>;

    fn clear_target(&mut self, target: TargetId, color: [f32; 4]) -> Result<()>;
    fn clear_depth(&mut self, target: TargetId, depth: f32) -> Result<()>;

    // ===== Draws =====

    /// Non-indexed draw (fullscreen triangles)
    fn draw(&mut self, vertex_count: u32) -> Result<()>;

    /// Indexed draw using the bound vertex/index buffers
    fn draw_indexed(&mut self, index_count: u32) -> Result<()>;

    // ===== Frame surface =====

    /// The swap-chain back buffer target
    fn back_buffer(&self) -> TargetId;

    /// The depth/stencil buffer paired with the back buffer
    fn depth_buffer(&self) -> TargetId;

    /// Back buffer dimensions in pixels
    fn viewport_size(&self) -> (u32, u32);
}
