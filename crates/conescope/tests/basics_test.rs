//! Basic integration tests for conescope: scene wiring without a GPU.
//!
//! Tests that require a window (start()) are marked #[ignore]
//! and should be run manually with: cargo test -- --ignored

use conescope::*;

#[test]
fn test_cone_pipeline_wiring() {
    let window = build_render_window().expect("scene builds");
    assert_eq!(window.size(), (300, 300));
    assert_eq!(window.renderers().len(), 1);

    let renderer = &window.renderers()[0];
    assert_eq!(renderer.background(), Vec3::new(0.1, 0.2, 0.4));
    assert_eq!(renderer.actors().len(), 1);

    let mapper = renderer.actors()[0].mapper().expect("actor has a mapper");
    let cone = mapper
        .input_as::<ConeSource>()
        .expect("mapper is connected to a cone source");
    assert_eq!(cone.height(), 3.0);
    assert_eq!(cone.radius(), 1.0);
    assert_eq!(cone.resolution(), 10);
    assert!(cone.capping());
}

#[test]
fn test_cone_geometry() {
    let actor = cone_actor().unwrap();
    let data = actor.mapper().unwrap().input().unwrap();
    // Tip plus ten base points; ten sides plus the cap.
    assert_eq!(data.number_of_points(), 11);
    assert_eq!(data.polys.len(), 11);

    let bounds = actor.bounds().unwrap();
    assert!((bounds.min.x + 1.5).abs() < 1e-5);
    assert!((bounds.max.x - 1.5).abs() < 1e-5);
    assert!((bounds.max.y - 1.0).abs() < 1e-5);
    assert!((bounds.min.y + 1.0).abs() < 1e-4);
}

#[test]
fn test_initialize_fits_camera() {
    let mut interactor = build_interactor().unwrap();
    interactor.initialize().unwrap();
    assert!(interactor.is_initialized());

    let renderer = &interactor.render_window().renderers()[0];
    let camera = renderer.active_camera();
    let bounds = renderer.visible_actor_bounds().unwrap();
    let expected_distance = bounds.diagonal_length() * 0.5 / 15f32.to_radians().sin();

    assert!((camera.focal_point - bounds.center()).length() < 1e-5);
    assert!((camera.distance() - expected_distance).abs() < 1e-3);
    assert!(camera.position.z > camera.focal_point.z);

    let (near, far) = camera.clipping_range;
    assert!(near > 0.0 && near < far);
}

#[test]
fn test_cube_camera_sees_the_whole_cube() {
    let window = build_cube_render_window().unwrap();
    assert_eq!(window.size(), (500, 500));

    let renderer = &window.renderers()[0];
    let camera = renderer.active_camera();
    let bounds = renderer.visible_actor_bounds().unwrap();

    assert!((camera.focal_point - Vec3::splat(0.5)).length() < 1e-5);
    // Still looking down the (1, 1, 1) diagonal, from outside the cube.
    let dop = camera.direction_of_projection();
    assert!((dop + Vec3::ONE.normalize()).length() < 1e-4, "{dop}");
    assert!(camera.position.min_element() > bounds.max.max_element());

    let expected_distance = bounds.diagonal_length() * 0.5 / 15f32.to_radians().sin();
    assert!((camera.distance() - expected_distance).abs() < 1e-3);
    let (near, far) = camera.clipping_range;
    assert!(near > 0.0 && far < camera.distance() * 2.0);
}

#[test]
fn test_options_drive_the_scene() {
    let options = Options::from_json_str(
        r#"{ "window_width": 640, "window_height": 480, "background_color": [1.0, 1.0, 1.0] }"#,
    )
    .unwrap();
    let window = build_render_window_with(&options).unwrap();
    assert_eq!(window.size(), (640, 480));
    assert_eq!(window.renderers()[0].background(), Vec3::ONE);
}

#[test]
fn test_start_without_initialize_fails() {
    let mut interactor = build_interactor().unwrap();
    assert!(matches!(interactor.start(), Err(ConescopeError::NotInitialized)));
}

#[test]
#[ignore = "opens a window"]
fn test_show_cone() {
    let mut interactor = build_interactor().unwrap();
    interactor.initialize().unwrap();
    interactor.start().unwrap();
}
