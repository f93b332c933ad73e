/// Example: run the viewer with a slower, linear entrance that resumes
/// from the current height when the target moves
///
/// Usage: cargo run --example slow_entrance

use std::io;
use shopsy_core::ViewerConfig;
use shopsy_terminal::TerminalApp;

const CONFIG: &str = r#"
[entrance]
duration_ms = 5000
easing = "linear"
rearm = "from-current"

[panel]
expanded = true
"#;

fn main() -> io::Result<()> {
    let config = ViewerConfig::from_toml_str(CONFIG)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut app = TerminalApp::new(&config)?;
    app.load_model(shopsy_core::Mesh::cube(2.0, 4));
    app.run()
}
