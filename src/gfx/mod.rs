//! Graphics device module - device abstraction and headless implementation
//!
//! The device is the one mutable pipeline-state machine of the renderer.
//! Every bind and draw goes through [`GraphicsDevice`], so command ordering
//! is carried by the `&mut` borrow rather than by an implicit global.

pub mod device;
pub mod headless;

pub use device::*;
pub use headless::HeadlessDevice;
