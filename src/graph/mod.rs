//! Render graph module - jobs, passes, the graph and the blur-outline
//! wiring

pub mod blur_outline;
pub mod graph;
pub mod job;
pub mod pass;

pub use blur_outline::{
    BlurOutlineRenderGraph, MAX_BLUR_RADIUS, PASS_BLUR_HORIZONTAL, PASS_BLUR_VERTICAL,
    PASS_COMPOSITE, PASS_GEOMETRY, PASS_OUTLINE_MASK,
};
pub use graph::RenderGraph;
pub use job::Job;
pub use pass::{FullscreenPass, Pass, RenderQueuePass};
