use env_logger::{Env, Target};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Send log output to `path`, since stderr is covered by the TUI.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_file_logger(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}
