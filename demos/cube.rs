//! A cube colored by point scalars through the default lookup table.
//!
//! Run with: cargo run --example cube

fn main() -> conescope::Result<()> {
    env_logger::init();

    let render_window = conescope::build_cube_render_window()?;
    let mut interactor = conescope::RenderWindowInteractor::new(render_window);
    interactor.initialize()?;
    interactor.start()
}
