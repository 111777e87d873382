//! Render window: window-level settings plus the renderers drawn into it.

use glam::Vec2;

use crate::error::{Result, SceneError};
use crate::options::Options;
use crate::renderer::Renderer;

/// A window description and its renderers, drawn in insertion order.
#[derive(Debug)]
pub struct RenderWindow {
    renderers: Vec<Renderer>,
    size: (u32, u32),
    title: String,
    vsync: bool,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl RenderWindow {
    /// Creates an empty 300x300 window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty window sized and titled from options.
    pub fn from_options(options: &Options) -> Self {
        Self {
            renderers: Vec::new(),
            size: (options.window_width.max(1), options.window_height.max(1)),
            title: options.title.clone(),
            vsync: options.vsync,
        }
    }

    /// Adds a renderer and returns its index.
    pub fn add_renderer(&mut self, renderer: Renderer) -> usize {
        self.renderers.push(renderer);
        self.renderers.len() - 1
    }

    /// All renderers.
    pub fn renderers(&self) -> &[Renderer] {
        &self.renderers
    }

    /// Mutable access to all renderers.
    pub fn renderers_mut(&mut self) -> &mut [Renderer] {
        &mut self.renderers
    }

    /// The first renderer.
    pub fn first_renderer(&self) -> Option<&Renderer> {
        self.renderers.first()
    }

    /// Mutable access to the first renderer.
    pub fn first_renderer_mut(&mut self) -> Option<&mut Renderer> {
        self.renderers.first_mut()
    }

    /// Sets the window size in pixels.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidParameter(format!(
                "window size must be non-zero, got {width}x{height}"
            )));
        }
        self.size = (width, height);
        Ok(())
    }

    /// Window size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Sets the window title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether presentation waits for vertical sync.
    pub fn vsync(&self) -> bool {
        self.vsync
    }

    /// Index of the topmost renderer whose viewport contains a display
    /// position (pixels, origin bottom-left).
    pub fn find_poked_renderer(&self, display: Vec2) -> Option<usize> {
        let (w, h) = self.size;
        self.renderers
            .iter()
            .rposition(|r| r.viewport().contains(display, w, h))
            .or_else(|| (!self.renderers.is_empty()).then_some(0))
    }

    /// Prepares every renderer for drawing (mapper updates, first camera fit).
    pub fn prepare_for_render(&mut self) -> Result<()> {
        if self.renderers.is_empty() {
            return Err(SceneError::NoRenderer);
        }
        for renderer in &mut self.renderers {
            renderer.prepare_for_render()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Viewport;

    #[test]
    fn test_defaults() {
        let window = RenderWindow::new();
        assert_eq!(window.size(), (300, 300));
        assert!(window.renderers().is_empty());
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut window = RenderWindow::new();
        assert!(window.set_size(0, 10).is_err());
        assert_eq!(window.size(), (300, 300));
    }

    #[test]
    fn test_prepare_requires_renderer() {
        let mut window = RenderWindow::new();
        assert!(matches!(
            window.prepare_for_render(),
            Err(SceneError::NoRenderer)
        ));
    }

    #[test]
    fn test_find_poked_renderer() {
        let mut window = RenderWindow::new();
        let mut left = Renderer::new();
        left.set_viewport(Viewport::new(0.0, 0.0, 0.5, 1.0).unwrap());
        let mut right = Renderer::new();
        right.set_viewport(Viewport::new(0.5, 0.0, 1.0, 1.0).unwrap());
        window.add_renderer(left);
        window.add_renderer(right);

        assert_eq!(window.find_poked_renderer(Vec2::new(10.0, 10.0)), Some(0));
        assert_eq!(window.find_poked_renderer(Vec2::new(290.0, 10.0)), Some(1));
    }
}
