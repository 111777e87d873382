//! Offscreen engine tests. They need a GPU adapter and skip without one.

use std::sync::Arc;

use conescope_core::{Actor, CellArray, PolyData, PolyDataMapper, RenderWindow, Renderer, Vec3};
use conescope_render::RenderEngine;

fn engine(width: u32, height: u32) -> Option<RenderEngine> {
    match pollster::block_on(RenderEngine::new_headless(width, height)) {
        Ok(engine) => Some(engine),
        Err(e) => {
            eprintln!("GPU not available, skipping: {e}");
            None
        }
    }
}

fn triangle_actor() -> Actor {
    let mut data = PolyData::with_points(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ]);
    data.set_polys(CellArray::from_cells(vec![vec![0, 1, 2]]));
    let mut mapper = PolyDataMapper::new();
    mapper.set_input_connection(Arc::new(data));
    let mut actor = Actor::new();
    actor.set_mapper(mapper);
    actor
}

fn window_with(actor: Actor) -> RenderWindow {
    let mut renderer = Renderer::new();
    renderer.add_actor(actor);
    let mut window = RenderWindow::new();
    window.set_size(64, 48).unwrap();
    window.add_renderer(renderer);
    window
}

#[test]
fn test_offscreen_frame_size() {
    let Some(mut engine) = engine(64, 48) else {
        return;
    };
    let mut window = window_with(triangle_actor());
    let pixels = engine.render_offscreen(&mut window).unwrap();
    assert_eq!(pixels.len(), 64 * 48 * 4);
    assert_eq!(engine.dimensions(), (64, 48));
}

#[test]
fn test_hidden_actor_data_is_released() {
    let Some(mut engine) = engine(64, 48) else {
        return;
    };
    let mut window = window_with(triangle_actor());
    engine.render_offscreen(&mut window).unwrap();
    assert_eq!(engine.cached_actor_count(), 1);

    window.renderers_mut()[0].actors_mut()[0].set_visibility(false);
    engine.render_offscreen(&mut window).unwrap();
    assert_eq!(engine.cached_actor_count(), 0);
}

#[test]
fn test_offscreen_requires_renderer() {
    let Some(mut engine) = engine(16, 16) else {
        return;
    };
    let mut window = RenderWindow::new();
    assert!(engine.render_offscreen(&mut window).is_err());
}
