//! Opens a window showing a cone; drag to rotate, `q` to quit.

fn main() -> conescope::Result<()> {
    let _ = env_logger::try_init();

    let mut interactor = conescope::build_interactor()?;
    interactor.initialize()?;
    interactor.start()
}
