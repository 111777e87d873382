//! Headless rendering integration tests.
//!
//! These tests need a GPU adapter (real or software fallback). Without one
//! they fail at engine creation and skip themselves.

use conescope::*;

fn pixel(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

fn close_to(px: [u8; 4], color: Vec3) -> bool {
    let expected = (color * 255.0).round();
    (f32::from(px[0]) - expected.x).abs() <= 1.0
        && (f32::from(px[1]) - expected.y).abs() <= 1.0
        && (f32::from(px[2]) - expected.z).abs() <= 1.0
}

fn render_or_skip(window: &mut RenderWindow) -> Option<Vec<u8>> {
    match render_to_image(window) {
        Ok(pixels) => Some(pixels),
        Err(e) => {
            eprintln!("Skipping headless test: no GPU adapter available ({e})");
            None
        }
    }
}

#[test]
fn headless_cone() {
    let mut window = build_render_window().unwrap();
    let Some(pixels) = render_or_skip(&mut window) else {
        return;
    };
    assert_eq!(pixels.len(), 300 * 300 * 4);

    let background = Vec3::new(0.1, 0.2, 0.4);
    assert!(close_to(pixel(&pixels, 300, 0, 0), background));
    assert!(close_to(pixel(&pixels, 300, 299, 299), background));
    // The cone covers the middle of the view.
    assert!(!close_to(pixel(&pixels, 300, 150, 150), background));
}

#[test]
fn headless_cube_leaves_background_around_it() {
    let mut window = build_cube_render_window().unwrap();
    let Some(pixels) = render_or_skip(&mut window) else {
        return;
    };
    let background = Vec3::splat(0.2);
    let total = pixels.len() / 4;
    let covered = pixels
        .chunks(4)
        .filter(|px| !close_to([px[0], px[1], px[2], px[3]], background))
        .count();
    let fraction = covered as f32 / total as f32;
    assert!(fraction > 0.1 && fraction < 0.9, "cube covers {fraction}");
    assert!(close_to(pixel(&pixels, 500, 0, 0), background));
}

#[test]
fn headless_empty_scene_is_uniform() {
    let mut window = RenderWindow::new();
    let mut renderer = Renderer::new();
    renderer.set_background(Vec3::new(1.0, 0.0, 0.0));
    window.add_renderer(renderer);

    let Some(pixels) = render_or_skip(&mut window) else {
        return;
    };
    assert!(pixels
        .chunks(4)
        .all(|px| px[0] == 255 && px[1] == 0 && px[2] == 0));
}

#[test]
fn headless_viewports_have_their_own_background() {
    let mut window = RenderWindow::new();
    window.set_size(200, 100).unwrap();
    let mut left = Renderer::new();
    left.set_viewport(Viewport::new(0.0, 0.0, 0.5, 1.0).unwrap());
    left.set_background(Vec3::new(0.0, 1.0, 0.0));
    let mut right = Renderer::new();
    right.set_viewport(Viewport::new(0.5, 0.0, 1.0, 1.0).unwrap());
    right.set_background(Vec3::new(0.0, 0.0, 1.0));
    window.add_renderer(left);
    window.add_renderer(right);

    let Some(pixels) = render_or_skip(&mut window) else {
        return;
    };
    assert!(close_to(pixel(&pixels, 200, 10, 50), Vec3::new(0.0, 1.0, 0.0)));
    assert!(close_to(pixel(&pixels, 200, 190, 50), Vec3::new(0.0, 0.0, 1.0)));
}

#[test]
fn headless_render_to_file() {
    let mut window = build_render_window().unwrap();
    let path = std::env::temp_dir().join("conescope_headless_cone.png");
    match render_to_file(&mut window, &path) {
        Ok(()) => {
            let bytes = std::fs::read(&path).unwrap();
            assert_eq!(&bytes[1..4], b"PNG");
            let _ = std::fs::remove_file(&path);
        }
        Err(e) => eprintln!("Skipping headless test: no GPU adapter available ({e})"),
    }
}
