//! Unit tests for queue and fullscreen passes

use super::*;
use crate::bindable::{Bindable, Blend, DepthStencil, IndexBuffer, Topology, VertexBuffer};
use crate::config::Config;
use crate::error::Error;
use crate::gfx::{
    BlendMode, DepthStencilMode, GraphicsDevice, HeadlessDevice, PrimitiveTopology, TargetDesc,
    TargetId, TargetUsage, TextureFormat,
};
use crate::scene::drawable::Drawable;
use crate::scene::scene::Scene;
use crate::scene::technique::{Step, Technique};
use glam::Mat4;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn test_device() -> HeadlessDevice {
    HeadlessDevice::new(&Config::default())
}

fn test_drawable(device: &mut HeadlessDevice) -> Drawable {
    Drawable::builder()
        .with_bindable(Arc::new(Bindable::VertexBuffer(
            VertexBuffer::new(device, &[0u8; 36], 12).unwrap(),
        )))
        .with_bindable(Arc::new(Bindable::IndexBuffer(
            IndexBuffer::new(device, &[0u16, 1, 2]).unwrap(),
        )))
        .with_bindable(Arc::new(Bindable::Topology(Topology::new(
            PrimitiveTopology::TriangleList,
        ))))
        .with_technique(Technique::new("shade").with_step(Step::new("geometry")))
        .build()
        .unwrap()
}

fn sampleable_target(device: &mut HeadlessDevice) -> TargetId {
    device
        .create_render_target(TargetDesc {
            width: 64,
            height: 64,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TargetUsage::RENDER_TARGET | TargetUsage::SHADER_RESOURCE,
        })
        .unwrap()
}

// ============================================================================
// RENDER QUEUE PASS TESTS
// ============================================================================

#[test]
fn test_jobs_kept_in_fifo_order() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let first = scene.add_drawable(test_drawable(&mut device));
    let second = scene.add_drawable(test_drawable(&mut device));

    let mut pass = RenderQueuePass::new("geometry");
    pass.accept(Job::new(first, 0, 0));
    pass.accept(Job::new(second, 0, 0));

    assert_eq!(pass.job_count(), 2);
    assert_eq!(pass.jobs()[0].drawable(), first);
    assert_eq!(pass.jobs()[1].drawable(), second);
}

#[test]
fn test_queue_pass_execute_clears_then_draws() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device));
    let back = device.back_buffer();
    let depth = device.depth_buffer();

    let mut pass = Pass::Queue(
        RenderQueuePass::new("geometry")
            .with_color_target(back)
            .with_depth_target(depth)
            .with_clear_color([0.0; 4])
            .with_clear_depth(1.0)
            .with_bindable(Arc::new(Bindable::DepthStencil(DepthStencil::new(
                DepthStencilMode::Default,
            )))),
    );
    pass.accept(Job::new(key, 0, 0)).unwrap();
    device.clear_commands();

    pass.execute(&scene, &mut device, Mat4::IDENTITY, Mat4::IDENTITY)
        .unwrap();

    assert_eq!(
        device.commands(),
        &[
            "set_render_target".to_string(),
            "clear_target".to_string(),
            "clear_depth".to_string(),
            "set_depth_stencil_mode(Default)".to_string(),
            "bind_vertex_buffer".to_string(),
            "bind_index_buffer".to_string(),
            "bind_topology(TriangleList)".to_string(),
            "draw_indexed(3)".to_string(),
        ]
    );
}

#[test]
fn test_queue_pass_without_clears_skips_clear_commands() {
    let mut device = test_device();
    let scene = Scene::new();
    let back = device.back_buffer();

    let pass = Pass::Queue(RenderQueuePass::new("overlay").with_color_target(back));
    device.clear_commands();
    pass.execute(&scene, &mut device, Mat4::IDENTITY, Mat4::IDENTITY)
        .unwrap();

    assert_eq!(device.commands(), &["set_render_target".to_string()]);
}

#[test]
fn test_reset_drains_queue() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device));

    let mut pass = Pass::Queue(RenderQueuePass::new("geometry"));
    pass.accept(Job::new(key, 0, 0)).unwrap();
    assert_eq!(pass.job_count(), 1);

    pass.reset();
    assert_eq!(pass.job_count(), 0);
}

// ============================================================================
// FULLSCREEN PASS TESTS
// ============================================================================

#[test]
fn test_fullscreen_pass_samples_input_and_draws_triangle() {
    let mut device = test_device();
    let scene = Scene::new();
    let input = sampleable_target(&mut device);
    let output = sampleable_target(&mut device);

    let pass = Pass::Fullscreen(
        FullscreenPass::new("blur_horizontal", input, 0)
            .with_color_target(output)
            .with_clear_color([0.0; 4])
            .with_bindable(Arc::new(Bindable::Blend(Blend::new(BlendMode::Opaque)))),
    );
    device.clear_commands();

    pass.execute(&scene, &mut device, Mat4::IDENTITY, Mat4::IDENTITY)
        .unwrap();

    assert_eq!(
        device.commands(),
        &[
            "set_render_target".to_string(),
            "clear_target".to_string(),
            "bind_target_as_texture(0)".to_string(),
            "set_blend_mode(Opaque)".to_string(),
            "draw(3)".to_string(),
        ]
    );
}

#[test]
fn test_fullscreen_pass_rejects_jobs() {
    let mut device = test_device();
    let input = sampleable_target(&mut device);

    let mut pass = Pass::Fullscreen(FullscreenPass::new("composite", input, 0));
    let result = pass.accept(Job::new(crate::scene::DrawableKey::default(), 0, 0));
    match result {
        Err(Error::GraphValidation(msg)) => assert!(msg.contains("composite")),
        other => panic!("expected GraphValidation, got {:?}", other),
    }
    assert_eq!(pass.job_count(), 0);
}

#[test]
fn test_fullscreen_input_without_shader_resource_fails_at_execute() {
    let mut device = test_device();
    let scene = Scene::new();
    // Back buffer lacks SHADER_RESOURCE usage
    let back = device.back_buffer();
    let output = sampleable_target(&mut device);

    let pass =
        Pass::Fullscreen(FullscreenPass::new("composite", back, 0).with_color_target(output));
    let result = pass.execute(&scene, &mut device, Mat4::IDENTITY, Mat4::IDENTITY);
    assert!(matches!(result, Err(Error::Device(_))));
}

// ============================================================================
// PASS ENUM TESTS
// ============================================================================

#[test]
fn test_pass_name_dispatch() {
    let mut device = test_device();
    let input = sampleable_target(&mut device);
    let queue = Pass::Queue(RenderQueuePass::new("geometry"));
    let fullscreen = Pass::Fullscreen(FullscreenPass::new("composite", input, 0));
    assert_eq!(queue.name(), "geometry");
    assert_eq!(fullscreen.name(), "composite");
}

#[test]
fn test_pass_outputs_and_input() {
    let mut device = test_device();
    let input = sampleable_target(&mut device);
    let output = sampleable_target(&mut device);
    let depth = device.depth_buffer();

    let queue = Pass::Queue(
        RenderQueuePass::new("geometry")
            .with_color_target(output)
            .with_depth_target(depth),
    );
    assert_eq!(queue.outputs(), (Some(output), Some(depth)));
    assert!(queue.input().is_none());

    let fullscreen =
        Pass::Fullscreen(FullscreenPass::new("composite", input, 0).with_color_target(output));
    assert_eq!(fullscreen.input(), Some(input));
    assert_eq!(fullscreen.outputs(), (Some(output), None));
}
