//! `.nrepl-port` discovery.
//!
//! Servers started from a project directory write their port to this file.

use std::io;
use std::path::Path;

use crate::exit::{io_error, CliError, CliResult, DATA_INVALID};

pub const PORT_FILE: &str = ".nrepl-port";

/// Port recorded in `dir/.nrepl-port`, or `None` when there is no such file.
pub fn discover(dir: &Path) -> CliResult<Option<u16>> {
    let path = dir.join(PORT_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(&format!("failed reading {}", path.display()), err)),
    };

    let port = contents.trim().parse::<u16>().ok().filter(|port| *port != 0);
    match port {
        Some(port) => {
            tracing::debug!(port, file = %path.display(), "using port file");
            Ok(Some(port))
        }
        None => Err(CliError::new(
            DATA_INVALID,
            format!("{} does not contain a port: {:?}", path.display(), contents.trim()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "replwire-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn missing_file_is_none() {
        let dir = unique_temp_dir("port-missing");
        assert_eq!(discover(&dir).unwrap(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn reads_trimmed_port() {
        let dir = unique_temp_dir("port-ok");
        std::fs::write(dir.join(PORT_FILE), "7888\n").unwrap();
        assert_eq!(discover(&dir).unwrap(), Some(7888));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn garbage_is_data_invalid() {
        let dir = unique_temp_dir("port-bad");
        std::fs::write(dir.join(PORT_FILE), "not-a-port").unwrap();
        assert_eq!(discover(&dir).unwrap_err().code, DATA_INVALID);
        std::fs::write(dir.join(PORT_FILE), "0").unwrap();
        assert_eq!(discover(&dir).unwrap_err().code, DATA_INVALID);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
