use redlib_mcp_core::config::{base_url_from_file, config_file_path, resolve_base_url};
use std::path::Path;

/// Resolve the Redlib base address.
///
/// `explicit` comes from `--redlib-url` / `REDLIB_URL`; the config file under
/// the user's home directory is consulted only when it is absent.
pub fn load_base_url(explicit: Option<String>) -> String {
    let home = dirs_next::home_dir();
    load_base_url_from(explicit, home.as_deref())
}

pub fn load_base_url_from(explicit: Option<String>, home: Option<&Path>) -> String {
    if explicit.as_deref().is_some_and(|url| !url.trim().is_empty()) {
        return resolve_base_url(explicit, None);
    }

    let from_file = home.and_then(read_config_file);
    resolve_base_url(explicit, from_file)
}

fn read_config_file(home: &Path) -> Option<String> {
    let path = config_file_path(home);

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Ignoring unreadable config file {}: {e}", path.display());
            return None;
        }
    };

    match base_url_from_file(&contents) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Ignoring config file {}: {e}", path.display());
            None
        }
    }
}
