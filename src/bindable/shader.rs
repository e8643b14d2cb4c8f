//! Shader bindables - vertex shader, pixel shader and input layout
//!
//! Shaders are created from precompiled bytecode, loaded from disk by
//! name or supplied directly. The input layout is validated against the
//! vertex shader's input signature at construction time; a structural
//! mismatch never reaches a draw.

use std::path::Path;

use crate::engine_err;
use crate::error::Result;
use crate::gfx::{GraphicsDevice, InputElement, LayoutId, ShaderDesc, ShaderId, ShaderStage};

fn read_bytecode(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        engine_err!(
            Io,
            "wind3d::Shader",
            "failed to read shader bytecode '{}': {}",
            path.display(),
            err
        )
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Vertex shader with a declared input signature
pub struct VertexShader {
    shader: ShaderId,
    name: String,
    inputs: Vec<String>,
}

impl VertexShader {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        name: impl Into<String>,
        bytecode: Vec<u8>,
        inputs: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        let shader = device.create_shader(ShaderDesc {
            stage: ShaderStage::Vertex,
            name: name.clone(),
            bytecode,
            inputs: inputs.clone(),
        })?;
        Ok(Self {
            shader,
            name,
            inputs,
        })
    }

    /// Load precompiled bytecode from disk
    pub fn from_file(
        device: &mut dyn GraphicsDevice,
        path: impl AsRef<Path>,
        inputs: Vec<String>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let bytecode = read_bytecode(path)?;
        Self::new(device, file_stem(path), bytecode, inputs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared input signature (semantic names in order)
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub(crate) fn id(&self) -> ShaderId {
        self.shader
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_shader(self.shader)
    }
}

/// Pixel shader
pub struct PixelShader {
    shader: ShaderId,
    name: String,
}

impl PixelShader {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        name: impl Into<String>,
        bytecode: Vec<u8>,
    ) -> Result<Self> {
        let name = name.into();
        let shader = device.create_shader(ShaderDesc {
            stage: ShaderStage::Pixel,
            name: name.clone(),
            bytecode,
            inputs: Vec::new(),
        })?;
        Ok(Self { shader, name })
    }

    /// Load precompiled bytecode from disk
    pub fn from_file(device: &mut dyn GraphicsDevice, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytecode = read_bytecode(path)?;
        Self::new(device, file_stem(path), bytecode)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_shader(self.shader)
    }
}

/// Input layout built against a vertex shader's signature
pub struct InputLayout {
    layout: LayoutId,
}

impl InputLayout {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        elements: Vec<InputElement>,
        shader: &VertexShader,
    ) -> Result<Self> {
        let layout = device.create_input_layout(&elements, shader.id())?;
        Ok(Self { layout })
    }

    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_input_layout(self.layout)
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
