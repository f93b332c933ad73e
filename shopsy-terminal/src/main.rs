/// Shopsy Terminal Viewer
///
/// Shows the product model dropping into place and lets the panel move it.
/// Controls:
///   - Mouse: move the light
///   - Up/Down: select a control, Left/Right: adjust it
///   - Tab: collapse the panel, P: toggle projection
///   - Q/ESC: Quit
///
/// Usage: shopsy-terminal [config.toml]
///
/// Log output goes to `shopsy-terminal.log` (or `$SHOPSY_LOG_FILE`) so it
/// does not draw over the viewer; filter it with `RUST_LOG` as usual.

use anyhow::Context;
use std::fs::File;
use std::path::{Path, PathBuf};
use shopsy_core::{Mesh, ViewerConfig};
use shopsy_terminal::TerminalApp;

const DEFAULT_LOG_FILE: &str = "shopsy-terminal.log";

fn log_file_path() -> PathBuf {
    std::env::var_os("SHOPSY_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Log sink that stays off the alternate screen
fn log_target(path: &Path) -> std::io::Result<env_logger::Target> {
    let file = File::create(path)?;
    Ok(env_logger::Target::Pipe(Box::new(file)))
}

fn main() -> anyhow::Result<()> {
    let log_path = log_file_path();
    let target = log_target(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    env_logger::Builder::from_default_env().target(target).init();

    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => ViewerConfig::default(),
    };

    println!("Shopsy Terminal Viewer - Loading...");
    let mut app = TerminalApp::new(&config)?;
    app.load_model(Mesh::cube(2.0, 2));

    std::thread::sleep(std::time::Duration::from_secs(1));
    app.run()?;

    println!("Thank you for using Shopsy!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_writes_to_file() {
        let path = std::env::temp_dir().join(format!("shopsy-log-{}.log", std::process::id()));
        let target = log_target(&path).unwrap();
        assert!(matches!(target, env_logger::Target::Pipe(_)));
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_log_target_reports_bad_path() {
        let path = std::env::temp_dir().join("shopsy-missing-dir").join("nested").join("x.log");
        assert!(log_target(&path).is_err());
    }
}
