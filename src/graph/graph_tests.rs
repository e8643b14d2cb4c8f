//! Unit tests for RenderGraph
//!
//! Covers pass registration, job routing, declaration-order execution,
//! wiring validation, and the execute/reset frame contract.

use super::*;
use crate::bindable::{Bindable, IndexBuffer, Topology, VertexBuffer};
use crate::config::Config;
use crate::error::Error;
use crate::gfx::{
    GraphicsDevice, HeadlessDevice, PrimitiveTopology, TargetDesc, TargetId, TargetUsage,
    TextureFormat,
};
use crate::scene::drawable::Drawable;
use crate::scene::scene::Scene;
use crate::graph::pass::{FullscreenPass, Pass, RenderQueuePass};
use crate::scene::technique::{Step, Technique};
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn test_device() -> HeadlessDevice {
    HeadlessDevice::new(&Config::default())
}

fn test_drawable(device: &mut HeadlessDevice, pass_names: &[&str]) -> Drawable {
    let mut technique = Technique::new("shade");
    for name in pass_names {
        technique.add_step(Step::new(*name));
    }
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
        .with_technique(technique)
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

fn two_pass_graph(device: &HeadlessDevice) -> RenderGraph {
    let mut graph = RenderGraph::new();
    graph
        .add_pass(Pass::Queue(
            RenderQueuePass::new("geometry")
                .with_color_target(device.back_buffer())
                .with_depth_target(device.depth_buffer()),
        ))
        .unwrap();
    graph
        .add_pass(Pass::Queue(
            RenderQueuePass::new("overlay").with_color_target(device.back_buffer()),
        ))
        .unwrap();
    graph
}

// ============================================================================
// PASS REGISTRATION TESTS
// ============================================================================

#[test]
fn test_add_pass_and_lookup() {
    let device = test_device();
    let graph = two_pass_graph(&device);
    assert_eq!(graph.pass_count(), 2);
    assert_eq!(graph.pass("geometry").unwrap().name(), "geometry");
    assert_eq!(graph.passes()[1].name(), "overlay");
    assert!(graph.pass("missing").is_none());
}

#[test]
fn test_duplicate_pass_name_rejected() {
    let mut graph = RenderGraph::new();
    graph
        .add_pass(Pass::Queue(RenderQueuePass::new("geometry")))
        .unwrap();
    let result = graph.add_pass(Pass::Queue(RenderQueuePass::new("geometry")));
    match result {
        Err(Error::GraphValidation(msg)) => assert!(msg.contains("geometry")),
        other => panic!("expected GraphValidation, got {:?}", other),
    }
    assert_eq!(graph.pass_count(), 1);
}

// ============================================================================
// JOB ROUTING TESTS
// ============================================================================

#[test]
fn test_accept_routes_to_named_pass() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device, &["geometry"]));

    let mut graph = two_pass_graph(&device);
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    assert_eq!(graph.pass("geometry").unwrap().job_count(), 1);
    assert_eq!(graph.pass("overlay").unwrap().job_count(), 0);
}

#[test]
fn test_accept_unknown_pass_fails() {
    let device = test_device();
    let mut graph = two_pass_graph(&device);
    let result = graph.accept("shadow", Job::new(crate::scene::DrawableKey::default(), 0, 0));
    match result {
        Err(Error::UnknownPass(msg)) => assert!(msg.contains("shadow")),
        other => panic!("expected UnknownPass, got {:?}", other),
    }
}

// ============================================================================
// EXECUTION ORDER TESTS
// ============================================================================

#[test]
fn test_passes_execute_in_declaration_order() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device, &["geometry", "overlay"]));

    let mut graph = two_pass_graph(&device);
    graph.accept("overlay", Job::new(key, 0, 1)).unwrap();
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    device.clear_commands();

    graph.execute(&scene, &mut device).unwrap();

    // One set_render_target per pass, both jobs drawn
    let target_sets = device
        .commands()
        .iter()
        .filter(|c| *c == "set_render_target")
        .count();
    assert_eq!(target_sets, 2);
    assert_eq!(device.draw_calls(), 2);
}

#[test]
fn test_execute_leaves_queues_intact() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device, &["geometry"]));

    let mut graph = two_pass_graph(&device);
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    graph.execute(&scene, &mut device).unwrap();

    assert_eq!(graph.pass("geometry").unwrap().job_count(), 1);
}

#[test]
fn test_double_execute_draws_twice() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device, &["geometry"]));

    let mut graph = two_pass_graph(&device);
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    graph.execute(&scene, &mut device).unwrap();
    graph.execute(&scene, &mut device).unwrap();

    // Queues were not drained, so the job draws once per execute
    assert_eq!(device.draw_calls(), 2);
}

#[test]
fn test_reset_drains_all_queues() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device, &["geometry", "overlay"]));

    let mut graph = two_pass_graph(&device);
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    graph.accept("overlay", Job::new(key, 0, 1)).unwrap();
    graph.reset();

    assert_eq!(graph.pass("geometry").unwrap().job_count(), 0);
    assert_eq!(graph.pass("overlay").unwrap().job_count(), 0);
}

#[test]
fn test_render_frame_executes_and_resets() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device, &["geometry"]));

    let mut graph = two_pass_graph(&device);
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    graph.render_frame(&scene, &mut device).unwrap();

    assert_eq!(device.draw_calls(), 1);
    assert_eq!(graph.pass("geometry").unwrap().job_count(), 0);
}

#[test]
fn test_render_frame_resets_even_on_failure() {
    let mut device = test_device();
    let mut scene = Scene::new();
    let key = scene.add_drawable(test_drawable(&mut device, &["geometry"]));

    let mut graph = two_pass_graph(&device);
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    device.remove_device(0x887A_0005);

    let result = graph.render_frame(&scene, &mut device);
    assert!(matches!(result, Err(Error::DeviceRemoved(_))));
    // Queues drained regardless, so the next frame starts clean
    assert_eq!(graph.pass("geometry").unwrap().job_count(), 0);
}

// ============================================================================
// VALIDATION TESTS
// ============================================================================

#[test]
fn test_validate_accepts_read_after_write() {
    let mut device = test_device();
    let offscreen = sampleable_target(&mut device);

    let mut graph = RenderGraph::new();
    graph
        .add_pass(Pass::Queue(
            RenderQueuePass::new("geometry").with_color_target(offscreen),
        ))
        .unwrap();
    graph
        .add_pass(Pass::Fullscreen(
            FullscreenPass::new("composite", offscreen, 0)
                .with_color_target(device.back_buffer()),
        ))
        .unwrap();

    graph.validate(&device).unwrap();
}

#[test]
fn test_validate_rejects_unwritten_input() {
    let mut device = test_device();
    let offscreen = sampleable_target(&mut device);

    let mut graph = RenderGraph::new();
    graph
        .add_pass(Pass::Fullscreen(
            FullscreenPass::new("composite", offscreen, 0)
                .with_color_target(device.back_buffer()),
        ))
        .unwrap();

    let result = graph.validate(&device);
    match result {
        Err(Error::GraphValidation(msg)) => assert!(msg.contains("composite")),
        other => panic!("expected GraphValidation, got {:?}", other),
    }
}

#[test]
fn test_validate_rejects_input_without_shader_resource() {
    let mut device = test_device();
    // Writable but not sampleable
    let write_only = device
        .create_render_target(TargetDesc {
            width: 64,
            height: 64,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TargetUsage::RENDER_TARGET,
        })
        .unwrap();

    let mut graph = RenderGraph::new();
    graph
        .add_pass(Pass::Queue(
            RenderQueuePass::new("geometry").with_color_target(write_only),
        ))
        .unwrap();
    graph
        .add_pass(Pass::Fullscreen(
            FullscreenPass::new("composite", write_only, 0)
                .with_color_target(device.back_buffer()),
        ))
        .unwrap();

    let result = graph.validate(&device);
    match result {
        Err(Error::GraphValidation(msg)) => assert!(msg.contains("SHADER_RESOURCE")),
        other => panic!("expected GraphValidation, got {:?}", other),
    }
}

#[test]
fn test_validate_rejects_sampling_own_output() {
    let mut device = test_device();
    let offscreen = sampleable_target(&mut device);

    let mut graph = RenderGraph::new();
    graph
        .add_pass(Pass::Queue(
            RenderQueuePass::new("geometry").with_color_target(offscreen),
        ))
        .unwrap();
    graph
        .add_pass(Pass::Fullscreen(
            FullscreenPass::new("feedback", offscreen, 0).with_color_target(offscreen),
        ))
        .unwrap();

    let result = graph.validate(&device);
    match result {
        Err(Error::GraphValidation(msg)) => assert!(msg.contains("own color attachment")),
        other => panic!("expected GraphValidation, got {:?}", other),
    }
}

#[test]
fn test_validate_empty_graph() {
    let device = test_device();
    let graph = RenderGraph::new();
    graph.validate(&device).unwrap();
}

// ============================================================================
// CAMERA TESTS
// ============================================================================

#[test]
fn test_set_camera_applies_to_transform_binds() {
    use crate::bindable::TransformBuffer;
    use glam::{Mat4, Vec3};

    let mut device = test_device();
    let mut scene = Scene::new();

    let tb = TransformBuffer::new(&mut device, 0, None).unwrap();
    let buffer_id = tb.vertex_buffer_id();
    let drawable = Drawable::builder()
        .with_bindable(Arc::new(Bindable::IndexBuffer(
            IndexBuffer::new(&mut device, &[0u16, 1, 2]).unwrap(),
        )))
        .with_bindable(Arc::new(Bindable::Topology(Topology::new(
            PrimitiveTopology::TriangleList,
        ))))
        .with_bindable(Arc::new(Bindable::Transform(tb)))
        .with_technique(Technique::new("shade").with_step(Step::new("geometry")))
        .build()
        .unwrap();
    let key = scene.add_drawable(drawable);

    let mut graph = two_pass_graph(&device);
    let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
    graph.set_camera(view, Mat4::IDENTITY);
    graph.accept("geometry", Job::new(key, 0, 0)).unwrap();
    graph.execute(&scene, &mut device).unwrap();

    let data = device.buffer_data(buffer_id).unwrap();
    let floats: &[f32] = bytemuck::cast_slice(data);
    let world_view = Mat4::from_cols_slice(&floats[16..32]);
    assert_eq!(world_view, view);
}
