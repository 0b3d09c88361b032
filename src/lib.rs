// Game core, runtime and settings; the terminal front end lives in the binary.
pub mod app_dirs;
pub mod celebration;
pub mod clock;
pub mod config;
pub mod delay;
pub mod game;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod timer;
