//! Scene module - drawables, techniques and the drawable store

pub mod drawable;
pub mod scene;
pub mod technique;

pub use drawable::{Drawable, DrawableBuilder};
pub use scene::{DrawableKey, Scene};
pub use technique::{Step, Technique};
