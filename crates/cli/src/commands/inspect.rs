use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use std::path::Path;

use evplane_persistence::stream::FrameReader;
use evplane_persistence::StreamKind;

pub struct InspectSummary {
    pub kind: StreamKind,
    pub frames: u64,
    /// First integrity error, if any frame failed to read.
    pub error: Option<String>,
}

pub fn run(path: &Path) -> anyhow::Result<InspectSummary> {
    let mut frames = FrameReader::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let header = frames.header().clone();

    let mut count = 0u64;
    let mut error = None;
    for frame in frames.by_ref() {
        match frame {
            Ok(_) => count += 1,
            Err(e) => {
                error = Some(e.to_string());
                break;
            }
        }
    }

    println!("\nStream Report: {}", path.display());
    println!("--------------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    let created = chrono::DateTime::from_timestamp(header.created as i64, 0)
        .unwrap_or_default()
        .to_rfc3339();
    table.add_row(vec!["Magic".to_string(), String::from_utf8_lossy(&header.magic).into_owned()]);
    table.add_row(vec!["Version".to_string(), header.version.to_string()]);
    table.add_row(vec!["Kind".to_string(), header.kind.to_string()]);
    table.add_row(vec!["Created".to_string(), created]);
    table.add_row(vec!["Frames".to_string(), count.to_string()]);
    let status = match &error {
        None => "OK".to_string(),
        Some(e) => format!("CORRUPT after frame {count}: {e}"),
    };
    table.add_row(vec!["Checksums".to_string(), status]);

    println!("{table}\n");

    Ok(InspectSummary {
        kind: header.kind,
        frames: count,
        error,
    })
}
