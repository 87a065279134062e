pub mod build;
pub mod resolve;
pub mod validate;

use std::error::Error;
use std::fs;
use std::path::Path;

use knot_graph::{diagram_from_json, LinkDiagram};

/// Loads a diagram written by `build --out` or `resolve --out`.
pub fn read_diagram(path: &Path) -> Result<LinkDiagram, Box<dyn Error>> {
    let json = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    Ok(diagram_from_json(&json)?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn write_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}
