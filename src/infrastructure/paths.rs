//! Path utilities for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is mounted under `/host`, with
//! `/host` standing for the directory Zellij was started from (usually the
//! user's home).

use std::path::PathBuf;

/// Directory holding the plugin's trace files.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("cinematch")
}

/// Expands a leading `~` to the sandbox mount point `/host`.
///
/// ```
/// use cinematch::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tilde_is_the_host_root() {
        assert_eq!(expand_tilde("~"), "/host");
        assert_eq!(expand_tilde("~user/x"), "~user/x");
    }

    #[test]
    fn data_dir_lives_under_zellij_share() {
        assert_eq!(get_data_dir(), PathBuf::from("/host/.local/share/zellij/cinematch"));
    }
}
