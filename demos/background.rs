//! Preview a particle background in a native window.
//!
//! ```text
//! cargo run --example background [config.json]
//! ```
//!
//! Space pauses, R respawns, S saves a snapshot, Escape quits.

use backdrop::prelude::*;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match FieldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => FieldConfig::default(),
    };

    if let Err(e) = Viewer::new(config).with_title("Backdrop").run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
