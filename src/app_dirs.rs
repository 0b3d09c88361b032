use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("neon-speed"),
            )
        } else {
            ProjectDirs::from("", "", "neon-speed")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("neon-speed.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_is_named_after_the_app() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with("neon-speed/neon-speed.log"));
        }
    }
}
