use crate::error::ExportError;
use crate::graph::GraphData;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write the graph as pretty-printed JSON, creating parent directories as
/// needed. The on-disk shape is what the force-graph frontend consumes.
pub fn save_graph(graph: &GraphData, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, graph)?;
    writer.flush()?;
    Ok(())
}

/// Read a previously exported graph back in.
pub fn load_graph(path: &Path) -> Result<GraphData, ExportError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
