//! Headless graphics device (no GPU required)
//!
//! Owns resource arenas and tracks the pipeline-state machine without
//! touching a real graphics API. Every pipeline command is appended to a
//! trace so tests can assert exact bind/draw ordering. Creation failures
//! and device loss can be injected to exercise error paths.

use slotmap::SlotMap;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::{device_error, engine_bail, engine_info};

use super::device::*;

enum BufferKind {
    Vertex { stride: u32 },
    Index { count: u32 },
    Constant { size: u64 },
}

struct BufferRecord {
    kind: BufferKind,
    data: Vec<u8>,
}

struct ShaderRecord {
    stage: ShaderStage,
    name: String,
    inputs: Vec<String>,
}

struct LayoutRecord {
    semantics: Vec<String>,
}

struct TextureRecord {
    #[allow(dead_code)]
    desc: TextureDesc,
}

struct SamplerRecord {
    #[allow(dead_code)]
    desc: SamplerDesc,
}

struct TargetRecord {
    desc: TargetDesc,
}

/// GPU-free [`GraphicsDevice`] implementation
///
/// Used by the test suite and by tools that need to exercise the render
/// graph without a swap chain. The command trace records pipeline commands
/// (binds, clears, draws) in issue order; resource creation is tracked in
/// the arenas instead.
pub struct HeadlessDevice {
    width: u32,
    height: u32,
    debug_layer: bool,

    buffers: SlotMap<BufferId, BufferRecord>,
    shaders: SlotMap<ShaderId, ShaderRecord>,
    layouts: SlotMap<LayoutId, LayoutRecord>,
    textures: SlotMap<TextureId, TextureRecord>,
    samplers: SlotMap<SamplerId, SamplerRecord>,
    targets: SlotMap<TargetId, TargetRecord>,

    back_buffer: TargetId,
    depth_buffer: TargetId,

    state: PipelineState,
    commands: Vec<String>,
    debug_messages: Vec<String>,

    fail_next_creation: bool,
    removed: Option<u32>,
    draw_calls: u32,
}

impl HeadlessDevice {
    /// Create a headless device with a back buffer and depth buffer sized
    /// from the config
    pub fn new(config: &Config) -> Self {
        let mut targets = SlotMap::with_key();
        let back_buffer = targets.insert(TargetRecord {
            desc: TargetDesc {
                width: config.width,
                height: config.height,
                format: TextureFormat::B8G8R8A8_UNORM,
                usage: TargetUsage::RENDER_TARGET,
            },
        });
        let depth_buffer = targets.insert(TargetRecord {
            desc: TargetDesc {
                width: config.width,
                height: config.height,
                format: TextureFormat::D24_UNORM_S8_UINT,
                usage: TargetUsage::DEPTH_STENCIL,
            },
        });

        engine_info!(
            "wind3d::HeadlessDevice",
            "created headless device {}x{} (debug layer: {})",
            config.width,
            config.height,
            config.debug_layer
        );

        Self {
            width: config.width,
            height: config.height,
            debug_layer: config.debug_layer,
            buffers: SlotMap::with_key(),
            shaders: SlotMap::with_key(),
            layouts: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            samplers: SlotMap::with_key(),
            targets,
            back_buffer,
            depth_buffer,
            state: PipelineState::default(),
            commands: Vec::new(),
            debug_messages: Vec::new(),
            fail_next_creation: false,
            removed: None,
            draw_calls: 0,
        }
    }

    /// Recorded pipeline commands in issue order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Clear the command trace (between frames in tests)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Snapshot of the current pipeline state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Pending debug-layer messages (drained into the next device error)
    pub fn debug_messages(&self) -> &[String] {
        &self.debug_messages
    }

    /// Raw contents of a buffer (for inspecting constant-buffer updates)
    pub fn buffer_data(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(buffer).map(|b| b.data.as_slice())
    }

    /// Semantics of a created input layout
    pub fn layout_semantics(&self, layout: LayoutId) -> Option<&[String]> {
        self.layouts.get(layout).map(|l| l.semantics.as_slice())
    }

    /// Number of draw calls issued since creation
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    /// Make the next `create_*` call fail with a device error
    pub fn fail_next_creation(&mut self) {
        self.fail_next_creation = true;
    }

    /// Simulate device loss; every subsequent call fails with
    /// [`Error::DeviceRemoved`] carrying `reason`
    pub fn remove_device(&mut self, reason: u32) {
        self.removed = Some(reason);
    }

    fn push_command(&mut self, command: String) {
        self.commands.push(command);
    }

    fn note(&mut self, message: String) {
        if self.debug_layer {
            self.debug_messages.push(message);
        }
    }

    /// Build a device error for `call`, draining pending debug messages
    fn failure(&mut self, call: &'static str, code: u32, description: String) -> Error {
        let mut err = device_error!(call, code, "{}", description);
        err.messages = std::mem::take(&mut self.debug_messages);
        Error::Device(err)
    }

    fn ensure_alive(&mut self, call: &'static str) -> Result<()> {
        if let Some(reason) = self.removed {
            let err = device_error!(call, reason, "device was removed");
            return Err(Error::DeviceRemoved(err));
        }
        Ok(())
    }

    fn check_creation(&mut self, call: &'static str) -> Result<()> {
        self.ensure_alive(call)?;
        if self.fail_next_creation {
            self.fail_next_creation = false;
            return Err(self.failure(call, 0x8000_4005, "injected creation failure".to_string()));
        }
        Ok(())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_vertex_buffer(&mut self, data: &[u8], stride: u32) -> Result<BufferId> {
        self.check_creation("create_vertex_buffer")?;
        if stride == 0 || data.len() % stride as usize != 0 {
            engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "vertex data length {} is not a multiple of stride {}",
                data.len(),
                stride
            );
        }
        Ok(self.buffers.insert(BufferRecord {
            kind: BufferKind::Vertex { stride },
            data: data.to_vec(),
        }))
    }

    fn create_index_buffer(&mut self, indices: &[u16]) -> Result<BufferId> {
        self.check_creation("create_index_buffer")?;
        Ok(self.buffers.insert(BufferRecord {
            kind: BufferKind::Index {
                count: indices.len() as u32,
            },
            data: bytemuck::cast_slice(indices).to_vec(),
        }))
    }

    fn create_constant_buffer(&mut self, size: u64) -> Result<BufferId> {
        self.check_creation("create_constant_buffer")?;
        if size == 0 || size % 16 != 0 {
            engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "constant buffer size {} must be a non-zero multiple of 16",
                size
            );
        }
        Ok(self.buffers.insert(BufferRecord {
            kind: BufferKind::Constant { size },
            data: vec![0; size as usize],
        }))
    }

    fn update_constant_buffer(&mut self, buffer: BufferId, data: &[u8]) -> Result<()> {
        self.ensure_alive("update_constant_buffer")?;
        let record = match self.buffers.get_mut(buffer) {
            Some(record) => record,
            None => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "update_constant_buffer: stale buffer handle"
            ),
        };
        match record.kind {
            BufferKind::Constant { size } if size as usize == data.len() => {
                record.data.clear();
                record.data.extend_from_slice(data);
                Ok(())
            }
            BufferKind::Constant { size } => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "update_constant_buffer: {} bytes written to a {} byte buffer",
                data.len(),
                size
            ),
            _ => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "update_constant_buffer: buffer is not a constant buffer"
            ),
        }
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<ShaderId> {
        self.check_creation("create_shader")?;
        if desc.bytecode.is_empty() {
            return Err(self.failure(
                "create_shader",
                0x8000_4005,
                format!("shader '{}' has empty bytecode", desc.name),
            ));
        }
        Ok(self.shaders.insert(ShaderRecord {
            stage: desc.stage,
            name: desc.name,
            inputs: desc.inputs,
        }))
    }

    fn create_input_layout(
        &mut self,
        elements: &[InputElement],
        shader: ShaderId,
    ) -> Result<LayoutId> {
        self.check_creation("create_input_layout")?;
        let record = match self.shaders.get(shader) {
            Some(record) => record,
            None => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "create_input_layout: stale shader handle"
            ),
        };
        if record.stage != ShaderStage::Vertex {
            let name = record.name.clone();
            return Err(self.failure(
                "create_input_layout",
                0x8000_4005,
                format!("shader '{}' is not a vertex shader", name),
            ));
        }
        let semantics: Vec<String> = elements.iter().map(|e| e.semantic.clone()).collect();
        if semantics != record.inputs {
            let name = record.name.clone();
            let expected = record.inputs.join(", ");
            self.note(format!(
                "input layout [{}] does not match signature [{}] of shader '{}'",
                semantics.join(", "),
                expected,
                name
            ));
            return Err(self.failure(
                "create_input_layout",
                0x8000_4005,
                format!("layout does not match input signature of shader '{}'", name),
            ));
        }
        Ok(self.layouts.insert(LayoutRecord { semantics }))
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<TextureId> {
        self.check_creation("create_texture")?;
        Ok(self.textures.insert(TextureRecord { desc }))
    }

    fn create_sampler(&mut self, desc: SamplerDesc) -> Result<SamplerId> {
        self.check_creation("create_sampler")?;
        Ok(self.samplers.insert(SamplerRecord { desc }))
    }

    fn create_render_target(&mut self, desc: TargetDesc) -> Result<TargetId> {
        self.check_creation("create_render_target")?;
        if desc.usage.is_empty() {
            engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "create_render_target: target has no usage flags"
            );
        }
        Ok(self.targets.insert(TargetRecord { desc }))
    }

    fn target_desc(&self, target: TargetId) -> Option<TargetDesc> {
        self.targets.get(target).map(|t| t.desc)
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId) -> Result<()> {
        self.ensure_alive("bind_vertex_buffer")?;
        match self.buffers.get(buffer).map(|b| &b.kind) {
            Some(BufferKind::Vertex { .. }) => {}
            _ => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_vertex_buffer: handle is not a live vertex buffer"
            ),
        }
        self.state.vertex_buffer = Some(buffer);
        self.push_command("bind_vertex_buffer".to_string());
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) -> Result<()> {
        self.ensure_alive("bind_index_buffer")?;
        match self.buffers.get(buffer).map(|b| &b.kind) {
            Some(BufferKind::Index { .. }) => {}
            _ => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_index_buffer: handle is not a live index buffer"
            ),
        }
        self.state.index_buffer = Some(buffer);
        self.push_command("bind_index_buffer".to_string());
        Ok(())
    }

    fn bind_constant_buffer(
        &mut self,
        stage: ShaderStage,
        slot: u32,
        buffer: BufferId,
    ) -> Result<()> {
        self.ensure_alive("bind_constant_buffer")?;
        match self.buffers.get(buffer).map(|b| &b.kind) {
            Some(BufferKind::Constant { .. }) => {}
            _ => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_constant_buffer: handle is not a live constant buffer"
            ),
        }
        self.push_command(format!("bind_constant_buffer({:?}, {})", stage, slot));
        Ok(())
    }

    fn bind_shader(&mut self, shader: ShaderId) -> Result<()> {
        self.ensure_alive("bind_shader")?;
        let stage = match self.shaders.get(shader) {
            Some(record) => record.stage,
            None => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_shader: stale shader handle"
            ),
        };
        match stage {
            ShaderStage::Vertex => self.state.vertex_shader = Some(shader),
            ShaderStage::Pixel => self.state.pixel_shader = Some(shader),
        }
        self.push_command(format!("bind_shader({:?})", stage));
        Ok(())
    }

    fn bind_input_layout(&mut self, layout: LayoutId) -> Result<()> {
        self.ensure_alive("bind_input_layout")?;
        if !self.layouts.contains_key(layout) {
            engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_input_layout: stale layout handle"
            );
        }
        self.state.input_layout = Some(layout);
        self.push_command("bind_input_layout".to_string());
        Ok(())
    }

    fn bind_topology(&mut self, topology: PrimitiveTopology) -> Result<()> {
        self.ensure_alive("bind_topology")?;
        self.state.topology = Some(topology);
        self.push_command(format!("bind_topology({:?})", topology));
        Ok(())
    }

    fn bind_texture(&mut self, slot: u32, texture: TextureId) -> Result<()> {
        self.ensure_alive("bind_texture")?;
        if !self.textures.contains_key(texture) {
            engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_texture: stale texture handle"
            );
        }
        self.push_command(format!("bind_texture({})", slot));
        Ok(())
    }

    fn bind_target_as_texture(&mut self, slot: u32, target: TargetId) -> Result<()> {
        self.ensure_alive("bind_target_as_texture")?;
        let desc = match self.targets.get(target) {
            Some(record) => record.desc,
            None => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_target_as_texture: stale target handle"
            ),
        };
        if !desc.usage.contains(TargetUsage::SHADER_RESOURCE) {
            return Err(self.failure(
                "bind_target_as_texture",
                0x8000_4005,
                "target was not created with SHADER_RESOURCE usage".to_string(),
            ));
        }
        if self.state.color_target == Some(target) {
            self.note(format!(
                "target bound as texture at slot {} is still the current render target",
                slot
            ));
        }
        self.push_command(format!("bind_target_as_texture({})", slot));
        Ok(())
    }

    fn bind_sampler(&mut self, slot: u32, sampler: SamplerId) -> Result<()> {
        self.ensure_alive("bind_sampler")?;
        if !self.samplers.contains_key(sampler) {
            engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "bind_sampler: stale sampler handle"
            );
        }
        self.push_command(format!("bind_sampler({})", slot));
        Ok(())
    }

    fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()> {
        self.ensure_alive("set_blend_mode")?;
        self.state.blend = Some(mode);
        self.push_command(format!("set_blend_mode({:?})", mode));
        Ok(())
    }

    fn set_cull_mode(&mut self, mode: CullMode) -> Result<()> {
        self.ensure_alive("set_cull_mode")?;
        self.state.cull = Some(mode);
        self.push_command(format!("set_cull_mode({:?})", mode));
        Ok(())
    }

    fn set_depth_stencil_mode(&mut self, mode: DepthStencilMode) -> Result<()> {
        self.ensure_alive("set_depth_stencil_mode")?;
        self.state.depth_stencil = Some(mode);
        self.push_command(format!("set_depth_stencil_mode({:?})", mode));
        Ok(())
    }

    fn set_render_target(
        &mut self,
        color: Option<TargetId>,
        depth: Option<TargetId>,
    ) -> Result<()> {
        self.ensure_alive("set_render_target")?;
        if let Some(target) = color {
            match self.targets.get(target) {
                Some(record) if record.desc.usage.contains(TargetUsage::RENDER_TARGET) => {}
                Some(_) => engine_bail!(
                    InvalidResource,
                    "wind3d::HeadlessDevice",
                    "set_render_target: color target lacks RENDER_TARGET usage"
                ),
                None => engine_bail!(
                    InvalidResource,
                    "wind3d::HeadlessDevice",
                    "set_render_target: stale color target handle"
                ),
            }
        }
        if let Some(target) = depth {
            match self.targets.get(target) {
                Some(record) if record.desc.usage.contains(TargetUsage::DEPTH_STENCIL) => {}
                Some(_) => engine_bail!(
                    InvalidResource,
                    "wind3d::HeadlessDevice",
                    "set_render_target: depth target lacks DEPTH_STENCIL usage"
                ),
                None => engine_bail!(
                    InvalidResource,
                    "wind3d::HeadlessDevice",
                    "set_render_target: stale depth target handle"
                ),
            }
        }
        self.state.color_target = color;
        self.state.depth_target = depth;
        self.push_command("set_render_target".to_string());
        Ok(())
    }

    fn clear_target(&mut self, target: TargetId, _color: [f32; 4]) -> Result<()> {
        self.ensure_alive("clear_target")?;
        match self.targets.get(target) {
            Some(record) if record.desc.usage.contains(TargetUsage::RENDER_TARGET) => {}
            _ => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "clear_target: handle is not a live color target"
            ),
        }
        self.push_command("clear_target".to_string());
        Ok(())
    }

    fn clear_depth(&mut self, target: TargetId, _depth: f32) -> Result<()> {
        self.ensure_alive("clear_depth")?;
        match self.targets.get(target) {
            Some(record) if record.desc.usage.contains(TargetUsage::DEPTH_STENCIL) => {}
            _ => engine_bail!(
                InvalidResource,
                "wind3d::HeadlessDevice",
                "clear_depth: handle is not a live depth target"
            ),
        }
        self.push_command("clear_depth".to_string());
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32) -> Result<()> {
        self.ensure_alive("draw")?;
        self.draw_calls += 1;
        self.push_command(format!("draw({})", vertex_count));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32) -> Result<()> {
        self.ensure_alive("draw_indexed")?;
        if self.state.index_buffer.is_none() {
            self.note("draw_indexed issued with no index buffer bound".to_string());
            return Err(self.failure(
                "draw_indexed",
                0x8000_4005,
                "no index buffer bound".to_string(),
            ));
        }
        self.draw_calls += 1;
        self.push_command(format!("draw_indexed({})", index_count));
        Ok(())
    }

    fn back_buffer(&self) -> TargetId {
        self.back_buffer
    }

    fn depth_buffer(&self) -> TargetId {
        self.depth_buffer
    }

    fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
#[path = "headless_tests.rs"]
mod tests;
