use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("cachetop").join("cachetop.log"))
}

/// Send log records to `~/.cache/cachetop/cachetop.log`; the screen belongs to
/// the dashboard. Default level is info, `RUST_LOG` overrides. Best-effort: if
/// the file cannot be opened, logging stays off.
pub fn initialize_logger() {
    let Some(path) = log_path() else { return };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f)  => f,
        Err(_) => return,
    };

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .parse_default_env();

    // Avoid panicking if the logger was already initialized elsewhere.
    let _ = builder.try_init();
}
