//! Headless rendering: draw a render window without opening a window.
//!
//! Useful for integration tests, batch processing and screenshots.

use std::path::Path;

use pollster::FutureExt;

use conescope_core::RenderWindow;
use conescope_render::RenderEngine;

use crate::error::Result;

/// Renders one frame of a render window to a raw RGBA8 pixel buffer.
///
/// Creates a headless GPU context sized like the render window. The buffer
/// holds `width * height * 4` bytes, rows from top to bottom. The first
/// render of a renderer fits its camera to the scene, as on screen.
///
/// # Example
/// ```no_run
/// let mut window = conescope::build_render_window().unwrap();
/// let pixels = conescope::render_to_image(&mut window).unwrap();
/// assert_eq!(pixels.len(), 300 * 300 * 4);
/// ```
pub fn render_to_image(render_window: &mut RenderWindow) -> Result<Vec<u8>> {
    let (width, height) = render_window.size();
    let mut engine = RenderEngine::new_headless(width, height).block_on()?;
    let pixels = engine.render_offscreen(render_window)?;
    log::debug!("rendered {width}x{height} frame offscreen");
    Ok(pixels)
}

/// Renders one frame of a render window and saves it as PNG or JPEG.
pub fn render_to_file(render_window: &mut RenderWindow, path: impl AsRef<Path>) -> Result<()> {
    let data = render_to_image(render_window)?;
    let (width, height) = render_window.size();
    conescope_render::save_image(path, &data, width, height)?;
    Ok(())
}
