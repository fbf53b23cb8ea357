/// Fragview Terminal Demo - a function surface in a labelled box
///
/// Usage: fragview-terminal [config.toml]
///
/// Controls:
///   - WASD / Arrow Keys: Rotate the scene
///   - E/R: Roll rotation
///   - Q/ESC: Quit
use fragview_terminal::{build_scene, TerminalApp, ViewerConfig};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {path}");
            ViewerConfig::load_from_file(&path)?
        }
        None => ViewerConfig::default(),
    };
    log::debug!("{config:?}");

    println!("Fragview Terminal Renderer - building scene...");
    let scene = build_scene(&config);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene, config)?;
    app.run()?;

    println!("Thank you for using Fragview Terminal Renderer!");
    Ok(())
}
