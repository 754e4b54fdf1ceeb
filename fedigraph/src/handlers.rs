use fedigraph_scanner::Instance;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

// Helper functions for the survey handler

/// Load survey targets from a newline-delimited hosts file.
///
/// User counts default to 0 for file-supplied instances; only the directory
/// knows real counts.
pub fn load_instances_from_file(path: &Path) -> Result<Vec<Instance>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read instances file {}: {}", path.display(), e))?;

    let mut seen = HashSet::new();
    let mut instances = Vec::new();
    for line in content.lines() {
        let Some(name) = parse_instance_line(line) else {
            continue;
        };
        if !seen.insert(name.clone()) {
            eprintln!("[!]  Skipping duplicate instance '{}'", name);
            continue;
        }
        instances.push(Instance::new(name, 0));
    }

    if instances.is_empty() {
        return Err(format!("No valid instance names found in {}", path.display()));
    }

    Ok(instances)
}

/// Parse a single line as an instance hostname.
///
/// Accepts bare hostnames and pasted URLs (reduced to their host:port);
/// blank lines and `#` comments yield None.
pub fn parse_instance_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let candidate = line
        .strip_prefix("https://")
        .or_else(|| line.strip_prefix("http://"))
        .unwrap_or(line);
    let candidate = candidate.split('/').next().unwrap_or(candidate);

    match Url::parse(&format!("https://{}", candidate)) {
        Ok(url) if url.host_str().is_some() => Some(candidate.to_string()),
        _ => {
            eprintln!("[!]  Skipping invalid instance name '{}'", line);
            None
        }
    }
}
