use std::{env, io, path::PathBuf};

// Public Exports
pub use directories;
pub use log;
pub use tokio;

use directories::ProjectDirs;

use log::debug;

pub mod file_ops;
pub mod formatter;
pub mod hashing;

/// Name used in the default user agent and in progress bar headers.
pub const APP_NAME: &str = "bulkfetch";

/// The default user-agent sent with every request.
///
/// It will always follow the version declared inside ```Cargo.toml```
#[inline]
pub fn default_user_agent() -> String {
    let ua = format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    debug!("Using user-agent: {}", ua);
    ua
}

/// Returns a `PathBuf` pointing to the directory holding `config.toml`.
///
/// This is XDG-compliant and resolves to
/// `$XDG_CONFIG_HOME/bulkfetch` on Linux or
/// `%APPDATA%/bulkfetch/bulkfetch` on Windows
///
/// Or you can set the env var `BULKFETCH_CONFIG_DIR` to point it to a custom location.
///
/// The directory is created when missing.
pub fn config_dir() -> Result<PathBuf, io::Error> {
    let cfg_path = match env::var("BULKFETCH_CONFIG_DIR") {
        Ok(path) => PathBuf::from(path),
        Err(_) => match ProjectDirs::from("com", APP_NAME, APP_NAME) {
            Some(dirs) => dirs.config_dir().to_path_buf(),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no home directory available to hold the config file",
                ))
            }
        },
    };

    file_ops::create_dir(&cfg_path)?;

    Ok(cfg_path)
}
