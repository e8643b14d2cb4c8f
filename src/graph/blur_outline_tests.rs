//! Unit tests for the blur-outline render graph

use super::*;
use crate::bindable::{Bindable, IndexBuffer, Topology, VertexBuffer};
use crate::config::Config;
use crate::error::Error;
use crate::gfx::{GraphicsDevice, HeadlessDevice, PrimitiveTopology, TargetUsage};
use crate::scene::drawable::Drawable;
use crate::scene::scene::Scene;
use crate::scene::technique::{Step, Technique};
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn test_device() -> HeadlessDevice {
    HeadlessDevice::new(&Config::default())
}

fn outlined_drawable(device: &mut HeadlessDevice) -> Drawable {
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
        .with_technique(
            Technique::new("outline")
                .with_step(Step::new(PASS_GEOMETRY))
                .with_step(Step::new(PASS_OUTLINE_MASK)),
        )
        .build()
        .unwrap()
}

// ============================================================================
// CONSTRUCTION TESTS
// ============================================================================

#[test]
fn test_new_wires_five_passes_in_order() {
    let mut device = test_device();
    let graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();

    let names: Vec<_> = graph.graph().passes().iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        vec![
            PASS_GEOMETRY,
            PASS_OUTLINE_MASK,
            PASS_BLUR_HORIZONTAL,
            PASS_BLUR_VERTICAL,
            PASS_COMPOSITE,
        ]
    );
}

#[test]
fn test_offscreen_targets_are_sampleable() {
    let mut device = test_device();
    let graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();

    for target in [graph.mask_target(), graph.ping_target(), graph.pong_target()] {
        let desc = device.target_desc(target).unwrap();
        assert!(desc.usage.contains(TargetUsage::RENDER_TARGET));
        assert!(desc.usage.contains(TargetUsage::SHADER_RESOURCE));
        assert_eq!((desc.width, desc.height), device.viewport_size());
    }
}

#[test]
fn test_new_validates_wiring() {
    let mut device = test_device();
    let graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();
    // Re-validation stays clean
    graph.validate(&device).unwrap();
}

#[test]
fn test_initial_kernel_from_config() {
    let mut device = test_device();
    let config = Config {
        blur_radius: 7,
        blur_sigma: 3.0,
        ..Config::default()
    };
    let graph = BlurOutlineRenderGraph::new(&mut device, &config).unwrap();
    assert_eq!(graph.radius(), 7);
    assert_eq!(graph.sigma(), 3.0);
}

#[test]
fn test_new_rejects_out_of_range_radius() {
    let mut device = test_device();
    for blur_radius in [0, MAX_BLUR_RADIUS + 1] {
        let config = Config {
            blur_radius,
            ..Config::default()
        };
        let result = BlurOutlineRenderGraph::new(&mut device, &config);
        assert!(matches!(result, Err(Error::InvalidResource(_))));
    }
}

#[test]
fn test_new_accepts_max_radius() {
    let mut device = test_device();
    let config = Config {
        blur_radius: MAX_BLUR_RADIUS,
        ..Config::default()
    };
    let graph = BlurOutlineRenderGraph::new(&mut device, &config).unwrap();
    assert_eq!(graph.radius(), MAX_BLUR_RADIUS);
}

#[test]
fn test_new_rejects_non_positive_sigma() {
    let mut device = test_device();
    for blur_sigma in [0.0, -1.5] {
        let config = Config {
            blur_sigma,
            ..Config::default()
        };
        let result = BlurOutlineRenderGraph::new(&mut device, &config);
        assert!(matches!(result, Err(Error::InvalidResource(_))));
    }
}

// ============================================================================
// KERNEL TESTS
// ============================================================================

#[test]
fn test_kernel_weights_are_normalized() {
    let kernel = BlurKernel::compute(4, 2.0);
    assert_eq!(kernel.tap_count, 9);

    let sum: f32 = kernel.weights[..9].iter().map(|w| w[0]).sum();
    assert!((sum - 1.0).abs() < 1e-5);

    // Unused rows stay zero
    assert!(kernel.weights[9..].iter().all(|w| w[0] == 0.0));
}

#[test]
fn test_kernel_weights_are_symmetric_and_peaked() {
    let kernel = BlurKernel::compute(3, 1.5);
    let weights: Vec<f32> = kernel.weights[..7].iter().map(|w| w[0]).collect();
    for i in 0..3 {
        assert!((weights[i] - weights[6 - i]).abs() < 1e-6);
    }
    // Center tap dominates
    assert!(weights[3] > weights[2]);
    assert!(weights[2] > weights[1]);
}

#[test]
fn test_set_kernel_updates_parameters() {
    let mut device = test_device();
    let mut graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();
    graph.set_kernel(&mut device, 10, 4.0).unwrap();
    assert_eq!(graph.radius(), 10);
    assert_eq!(graph.sigma(), 4.0);
}

#[test]
fn test_set_kernel_rejects_out_of_range_radius() {
    let mut device = test_device();
    let mut graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();

    assert!(matches!(
        graph.set_kernel(&mut device, 0, 2.0),
        Err(Error::InvalidResource(_))
    ));
    assert!(matches!(
        graph.set_kernel(&mut device, MAX_BLUR_RADIUS + 1, 2.0),
        Err(Error::InvalidResource(_))
    ));
    // Unchanged on failure
    assert_eq!(graph.radius(), Config::default().blur_radius);
}

#[test]
fn test_set_kernel_rejects_non_positive_sigma() {
    let mut device = test_device();
    let mut graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();
    assert!(matches!(
        graph.set_kernel(&mut device, 4, 0.0),
        Err(Error::InvalidResource(_))
    ));
}

#[test]
fn test_max_radius_kernel_fills_every_row() {
    let kernel = BlurKernel::compute(MAX_BLUR_RADIUS, 6.0);
    assert_eq!(kernel.tap_count, 31);
    assert!(kernel.weights.iter().all(|w| w[0] > 0.0));
}

// ============================================================================
// FRAME SCENARIO TESTS
// ============================================================================

#[test]
fn test_outlined_drawable_queues_into_both_queue_passes() {
    let mut device = test_device();
    let mut graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();
    let mut scene = Scene::new();
    scene.add_drawable(outlined_drawable(&mut device));

    scene.submit(graph.graph_mut()).unwrap();

    assert_eq!(graph.graph().pass(PASS_GEOMETRY).unwrap().job_count(), 1);
    assert_eq!(graph.graph().pass(PASS_OUTLINE_MASK).unwrap().job_count(), 1);
    assert_eq!(graph.graph().pass(PASS_BLUR_HORIZONTAL).unwrap().job_count(), 0);
    assert_eq!(graph.graph().pass(PASS_BLUR_VERTICAL).unwrap().job_count(), 0);
    assert_eq!(graph.graph().pass(PASS_COMPOSITE).unwrap().job_count(), 0);
}

#[test]
fn test_render_frame_draws_geometry_and_fullscreen_passes() {
    let mut device = test_device();
    let mut graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();
    let mut scene = Scene::new();
    scene.add_drawable(outlined_drawable(&mut device));

    scene.submit(graph.graph_mut()).unwrap();
    device.clear_commands();
    graph.render_frame(&scene, &mut device).unwrap();

    // Two indexed draws (geometry + outline mask) and three fullscreen
    // triangles (two blurs + composite)
    let indexed = device
        .commands()
        .iter()
        .filter(|c| c.starts_with("draw_indexed"))
        .count();
    let fullscreen = device.commands().iter().filter(|c| *c == "draw(3)").count();
    assert_eq!(indexed, 2);
    assert_eq!(fullscreen, 3);

    // Queues drained for the next frame
    assert_eq!(graph.graph().pass(PASS_GEOMETRY).unwrap().job_count(), 0);
    assert_eq!(graph.graph().pass(PASS_OUTLINE_MASK).unwrap().job_count(), 0);
}

#[test]
fn test_submitting_to_fullscreen_pass_is_rejected() {
    let mut device = test_device();
    let mut graph = BlurOutlineRenderGraph::new(&mut device, &Config::default()).unwrap();
    let mut scene = Scene::new();

    let drawable = Drawable::builder()
        .with_bindable(Arc::new(Bindable::IndexBuffer(
            IndexBuffer::new(&mut device, &[0u16, 1, 2]).unwrap(),
        )))
        .with_bindable(Arc::new(Bindable::Topology(Topology::new(
            PrimitiveTopology::TriangleList,
        ))))
        .with_technique(Technique::new("broken").with_step(Step::new(PASS_COMPOSITE)))
        .build()
        .unwrap();
    scene.add_drawable(drawable);

    let result = scene.submit(graph.graph_mut());
    assert!(matches!(result, Err(Error::GraphValidation(_))));
}
