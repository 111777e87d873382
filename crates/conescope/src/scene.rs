//! Scenes: the cone program, plus a scalar-colored cube built from raw poly data.

use std::sync::Arc;

use conescope_core::{
    Actor, CellArray, ConeSource, Options, PolyData, PolyDataMapper, RenderWindow, Renderer, Vec3,
};

use crate::error::Result;
use crate::interactor::RenderWindowInteractor;
use crate::trackball_camera::InteractorStyleTrackballCamera;

/// Cone height.
pub const CONE_HEIGHT: f32 = 3.0;
/// Cone base radius.
pub const CONE_RADIUS: f32 = 1.0;
/// Number of facets around the cone.
pub const CONE_RESOLUTION: u32 = 10;

/// An actor showing the cone.
pub fn cone_actor() -> Result<Actor> {
    let mut cone = ConeSource::new();
    cone.set_height(CONE_HEIGHT);
    cone.set_radius(CONE_RADIUS);
    cone.set_resolution(CONE_RESOLUTION);

    let mut mapper = PolyDataMapper::new();
    mapper.set_input_connection(Arc::new(cone));
    mapper.update()?;

    let mut actor = Actor::new();
    actor.set_mapper(mapper);
    Ok(actor)
}

/// A 300x300 window with the cone on a dark blue background.
pub fn build_render_window() -> Result<RenderWindow> {
    build_render_window_with(&Options::default())
}

/// Like [`build_render_window`], sized and colored from options.
pub fn build_render_window_with(options: &Options) -> Result<RenderWindow> {
    let mut renderer = Renderer::new();
    renderer.add_actor(cone_actor()?);
    renderer.set_background(options.background_color);

    let mut render_window = RenderWindow::from_options(options);
    render_window.add_renderer(renderer);
    Ok(render_window)
}

/// The cone window with trackball camera interaction.
pub fn build_interactor() -> Result<RenderWindowInteractor> {
    build_interactor_with(&Options::default())
}

/// Like [`build_interactor`], configured from options.
pub fn build_interactor_with(options: &Options) -> Result<RenderWindowInteractor> {
    let mut interactor = RenderWindowInteractor::new(build_render_window_with(options)?);
    interactor.set_interactor_style(Box::new(InteractorStyleTrackballCamera::from_options(options)));
    Ok(interactor)
}

/// Unit cube with outward-facing quads and point scalars 0..7.
pub fn cube_poly_data() -> PolyData {
    let mut cube = PolyData::with_points(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
    ]);
    cube.set_polys(CellArray::from_cells(vec![
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![1, 2, 6, 5],
        vec![2, 3, 7, 6],
        vec![3, 0, 4, 7],
    ]));
    cube.set_point_scalars((0..8u8).map(f32::from).collect());
    cube
}

/// A 500x500 window showing the cube colored through the lookup table,
/// viewed from the (1, 1, 1) direction with +Z up.
pub fn build_cube_render_window() -> Result<RenderWindow> {
    let mut mapper = PolyDataMapper::new();
    mapper.set_input_connection(Arc::new(cube_poly_data()));
    mapper.set_scalar_range(0.0, 7.0)?;

    let mut actor = Actor::new();
    actor.set_mapper(mapper);

    let mut renderer = Renderer::new();
    renderer.add_actor(actor);
    renderer.set_background(Vec3::new(0.2, 0.2, 0.2));

    // Only the direction matters; reset_camera moves back to fit the cube.
    let camera = renderer.active_camera_mut();
    camera.set_position(Vec3::new(1.0, 1.0, 1.0));
    camera.set_view_up(Vec3::Z);
    renderer.reset_camera()?;

    let mut render_window = RenderWindow::new();
    render_window.set_size(500, 500)?;
    render_window.set_title("cube");
    render_window.add_renderer(renderer);
    Ok(render_window)
}
