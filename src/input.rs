use std::fs;
use std::path::Path;

/// Reads the target list. A missing or unreadable file is logged and yields
/// no targets.
pub fn load_targets<P: AsRef<Path>>(path: P) -> Vec<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => parse_targets(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::error!("Input file not found: {}", path.display());
            Vec::new()
        }
        Err(e) => {
            log::error!("Error reading input file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// One target per line, trimmed. Blank lines and `#` comments are skipped.
pub fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
