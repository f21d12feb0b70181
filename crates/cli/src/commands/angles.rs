use anyhow::Context;
use std::path::Path;

use evplane_kernel::angles::{event_plane_angles, AngleSettings};
use evplane_kernel::record::{EventPlaneAngles, EventPlaneRecord};
use evplane_persistence::{StreamReader, StreamWriter};

/// Converts a Q-vector stream into an angle stream. Returns the record count.
pub fn run(input: &Path, output: &Path, settings: &AngleSettings) -> anyhow::Result<u64> {
    let reader = StreamReader::<EventPlaneRecord>::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let mut writer = StreamWriter::<EventPlaneAngles>::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    for record in reader {
        let record = record.with_context(|| format!("Failed to read {}", input.display()))?;
        writer
            .write(&event_plane_angles(&record, settings))
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }
    let written = writer.finish()?;

    tracing::info!(
        records = written,
        r1 = settings.r1,
        r2 = settings.r2,
        eta_weighted = settings.eta_weighted_first,
        "event-plane angles written"
    );
    println!("\n{written} event-plane angle records written to {}\n", output.display());
    Ok(written)
}
