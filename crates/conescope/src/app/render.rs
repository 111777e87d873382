use conescope_render::RenderError;

use super::App;

impl App<'_> {
    /// Draws one frame, recovering from transient surface errors.
    pub(super) fn render(&mut self) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.render_frame(self.interactor.render_window_mut()) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost | RenderError::SurfaceOutdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                engine.reconfigure_surface();
                self.request_redraw();
            }
            Err(RenderError::Timeout) => {
                log::warn!("surface timeout");
                self.request_redraw();
            }
            Err(e) => self.fail(e),
        }
    }
}
