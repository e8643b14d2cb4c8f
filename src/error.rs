//! Error types for the WinD3D core
//!
//! This module defines the error types used throughout the crate,
//! covering device/API failures, device loss, and graph wiring errors.

use std::fmt;

/// Result type for WinD3D core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Structured device failure.
///
/// Captures the identity of the failing device call, a numeric error code,
/// the source location where the failure was raised, and any messages
/// drained from the device's debug queue at that point.
#[derive(Debug, Clone)]
pub struct DeviceError {
    /// Name of the failing device call (e.g. "create_input_layout")
    pub call: &'static str,
    /// Numeric error code reported by the device
    pub code: u32,
    /// Human-readable description
    pub description: String,
    /// Source file where the error was raised
    pub file: &'static str,
    /// Source line where the error was raised
    pub line: u32,
    /// Debug-queue messages accumulated up to the failure
    pub messages: Vec<String>,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed with code {:#010x}: {} ({}:{})",
            self.call, self.code, self.description, self.file, self.line
        )?;
        for msg in &self.messages {
            write!(f, "\n  [debug] {}", msg)?;
        }
        Ok(())
    }
}

/// WinD3D core errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A device call failed during resource creation or drawing
    Device(DeviceError),

    /// The device was lost; unrecoverable, surfaced to the frame loop
    DeviceRemoved(DeviceError),

    /// Invalid resource (bad handle, size mismatch, incompatible usage)
    InvalidResource(String),

    /// A drawable violated a construction invariant, or a job referenced
    /// a drawable that no longer exists
    InvalidDrawable(String),

    /// A step targeted a pass name the render graph does not contain
    UnknownPass(String),

    /// Graph wiring error detected at graph-build time
    GraphValidation(String),

    /// I/O failure while loading shader bytecode
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Device(err) => write!(f, "Device error: {}", err),
            Error::DeviceRemoved(err) => write!(f, "Device removed: {}", err),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidDrawable(msg) => write!(f, "Invalid drawable: {}", msg),
            Error::UnknownPass(msg) => write!(f, "Unknown pass: {}", msg),
            Error::GraphValidation(msg) => write!(f, "Graph validation failed: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build a string-carrying [`Error`] variant, logging it with file:line
///
/// # Example
///
/// ```ignore
/// return Err(engine_err!(UnknownPass, "wind3d::RenderGraph",
///     "pass '{}' not found", name));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!(),
        );
        $crate::Error::$variant(message)
    }};
}

/// Log an error and return it from the current function
#[macro_export]
macro_rules! engine_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($variant, $source, $($arg)*))
    };
}

/// Build a [`DeviceError`] capturing the current source location
#[macro_export]
macro_rules! device_error {
    ($call:expr, $code:expr, $($arg:tt)*) => {
        $crate::DeviceError {
            call: $call,
            code: $code,
            description: format!($($arg)*),
            file: file!(),
            line: line!(),
            messages: Vec::new(),
        }
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
