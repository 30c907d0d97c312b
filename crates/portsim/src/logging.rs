use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the log file inside the output directory
pub const LOG_FILE: &str = "portsim.log";

/// Size above which the log is truncated on startup (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Most recent bytes kept by a truncation (1 MB)
const KEEP_SIZE: u64 = 1024 * 1024;

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Truncate the log at `path` to its last `keep_size` bytes once it grows
/// beyond `max_size`. The first partial line of the kept tail is dropped.
fn rotate_log(path: &Path, max_size: u64, keep_size: u64) -> std::io::Result<()> {
    let len = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if len <= max_size {
        return Ok(());
    }

    let mut tail = Vec::new();
    {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(len.saturating_sub(keep_size)))?;
        file.read_to_end(&mut tail)?;
    }
    let first_line = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |newline| newline + 1);

    let mut file = File::create(path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(&tail[first_line..])
}

/// Initialize logging to `{output_dir}/portsim.log` and to stderr.
///
/// The file receives every event passing the filter; stderr only shows
/// warnings and errors. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(output_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(output_dir)?;
    let log_path = output_dir.join(LOG_FILE);

    if let Err(err) = rotate_log(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: failed to rotate {}: {err}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("portsim={level},portsim_core={level}")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr.with_max_level(Level::WARN))
                .with_target(false)
                .without_time(),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rotation_keeps_recent_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let content: String = (0..100).map(|i| format!("line {i:03}\n")).collect();
        fs::write(&path, &content).unwrap();

        rotate_log(&path, 500, 100).unwrap();

        let rotated = fs::read(&path).unwrap();
        assert!(rotated.starts_with(ROTATION_MARKER));
        let body = String::from_utf8(rotated[ROTATION_MARKER.len()..].to_vec()).unwrap();
        assert!(body.ends_with("line 099\n"));
        assert!(body.lines().all(|l| l.starts_with("line ")));
        assert!(body.len() < 100);
    }

    #[test]
    fn test_small_log_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "short\n").unwrap();

        rotate_log(&path, 500, 100).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");

        rotate_log(&dir.path().join("missing.log"), 500, 100).unwrap();
    }
}
