/*!
# WinD3D core

Render-graph and bindable-state core of the WinD3D demo renderer.

The crate models the stateful binding model of an immediate-mode graphics
API as an explicit [`gfx::GraphicsDevice`] that is threaded `&mut` through
every bind and draw call, so command ordering is visible in signatures
instead of hidden in a process-wide state machine.

## Architecture

- **[`gfx`]**: the device abstraction — resource creation, pipeline binds,
  draws — plus [`gfx::HeadlessDevice`], a GPU-free device that records a
  command trace for tests and tooling.
- **[`bindable`]**: the closed set of bindable pipeline-state objects
  (buffers, shaders, input layout, topology, transform constant buffer,
  blend/rasterizer/depth-stencil state, texture, sampler) and the cache
  that shares them across drawables.
- **[`scene`]**: drawables (geometry bindables + techniques) stored under
  stable keys, submitted into the graph once per frame.
- **[`graph`]**: jobs, passes and the render graph, including the fixed
  blur-outline pipeline.

A frame: entities mutate transforms, `Scene::submit` queues jobs into the
graph's passes, `RenderGraph::render_frame` executes every pass in declared
order against the device and resets the queues.
*/

mod config;
mod error;

pub mod bindable;
pub mod gfx;
pub mod graph;
pub mod log;
pub mod scene;

pub use config::Config;
pub use error::{DeviceError, Error, Result};

// Re-export math library at crate root
pub use glam;
