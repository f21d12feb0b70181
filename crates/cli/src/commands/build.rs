use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use rayon::prelude::*;
use regex::Regex;

use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;
use evplane_kernel::event::RawEvent;
use evplane_kernel::record::EventPlaneRecord;
use evplane_kernel::{BuildStats, EventPlaneBuilder};
use evplane_persistence::scan::{self, DEFAULT_PATTERN};
use evplane_persistence::{PersistenceError, StreamReader, StreamWriter};

pub struct BuildArgs {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub pattern: Option<String>,
    pub config: Option<PathBuf>,
    /// Worker threads; `None` uses the global rayon pool.
    pub jobs: Option<usize>,
}

pub struct FileReport {
    pub path: PathBuf,
    /// `Err` holds the reason the file was skipped.
    pub stats: Result<BuildStats, String>,
}

pub struct BuildReport {
    pub files: Vec<FileReport>,
    pub total: BuildStats,
    pub written: u64,
}

impl BuildReport {
    pub fn skipped(&self) -> usize {
        self.files.iter().filter(|f| f.stats.is_err()).count()
    }
}

fn build_file(
    prototype: &EventPlaneBuilder,
    path: &Path,
) -> Result<(BuildStats, Vec<EventPlaneRecord>), PersistenceError> {
    let mut builder = prototype.clone();
    let reader = StreamReader::<RawEvent>::open(path)?;
    let mut records = Vec::new();
    let stats = builder.run(reader, &mut records)?;
    Ok((stats, records))
}

pub fn run(args: &BuildArgs) -> anyhow::Result<BuildReport> {
    let cfg = AnalysisConfig::load_or_default(args.config.as_deref())?;
    let prototype = EventPlaneBuilder::new(&cfg.builder).context("Invalid builder configuration")?;

    let pattern = args.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
    let re = Regex::new(pattern).with_context(|| format!("Invalid file pattern {pattern:?}"))?;
    let files = scan::filtered_files(&args.input_dir, &re)
        .with_context(|| format!("Failed to list {}", args.input_dir.display()))?;
    if files.is_empty() {
        tracing::warn!(dir = %args.input_dir.display(), pattern, "no input files matched");
    }
    tracing::info!(files = files.len(), "building event planes");

    let process = || -> Vec<_> {
        files
            .par_iter()
            .map(|path| {
                let result = build_file(&prototype, path);
                match &result {
                    Ok((stats, _)) => tracing::info!(
                        file = %path.display(),
                        events = stats.events,
                        emitted = stats.emitted,
                        "file processed"
                    ),
                    Err(e) => tracing::warn!(file = %path.display(), error = %e, "skipping file"),
                }
                result
            })
            .collect()
    };
    let results = match args.jobs {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("Failed to start worker pool")?
            .install(process),
        None => process(),
    };

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut writer = StreamWriter::<EventPlaneRecord>::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut total = BuildStats::default();
    let mut reports = Vec::with_capacity(files.len());
    for (path, result) in files.into_iter().zip(results) {
        let stats = match result {
            Ok((stats, records)) => {
                for record in &records {
                    writer
                        .write(record)
                        .with_context(|| format!("Failed to write {}", args.output.display()))?;
                }
                total.merge(&stats);
                Ok(stats)
            }
            Err(e) => Err(e.to_string()),
        };
        reports.push(FileReport { path, stats });
    }
    let written = writer
        .finish()
        .with_context(|| format!("Failed to finish {}", args.output.display()))?;

    let report = BuildReport {
        files: reports,
        total,
        written,
    };
    print_report(&report);
    Ok(report)
}

fn print_report(report: &BuildReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Events", "Failed Gate", "Failed Multiplicity", "Emitted"]);

    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &file.stats {
            Ok(s) => table.add_row(vec![
                name,
                s.events.to_string(),
                s.failed_event_gate.to_string(),
                s.failed_multiplicity.to_string(),
                s.emitted.to_string(),
            ]),
            Err(e) => table.add_row(vec![name, "SKIPPED".to_string(), e.clone(), String::new(), String::new()]),
        };
    }
    let t = &report.total;
    table.add_row(vec![
        "TOTAL".to_string(),
        t.events.to_string(),
        t.failed_event_gate.to_string(),
        t.failed_multiplicity.to_string(),
        t.emitted.to_string(),
    ]);

    let mut cuts = Table::new();
    cuts.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Event Cut", "Failed"]);
    let c = &t.event_cuts;
    for (label, n) in [
        ("nPVs", c.n_pvs),
        ("nBackTracks", c.n_back_tracks),
        ("PVZ", c.pv_z),
        ("nVeloTracks", c.n_velo_tracks),
    ] {
        cuts.add_row(vec![label.to_string(), n.to_string()]);
    }

    println!("\nEvent-Plane Build\n");
    println!("{table}\n");
    println!("{cuts}\n");
    println!("{} records written, {} files skipped\n", report.written, report.skipped());
}
