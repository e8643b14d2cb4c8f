//! Core configuration

/// Configuration for the device and the blur-outline graph
#[derive(Debug, Clone)]
pub struct Config {
    /// Back buffer width in pixels
    pub width: u32,
    /// Back buffer height in pixels
    pub height: u32,
    /// Enable the device debug layer (message queue capture)
    pub debug_layer: bool,
    /// Initial Gaussian blur radius in taps on each side of the center
    pub blur_radius: u32,
    /// Initial Gaussian sigma
    pub blur_sigma: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            debug_layer: cfg!(debug_assertions),
            blur_radius: 4,
            blur_sigma: 2.0,
        }
    }
}
