use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use std::path::PathBuf;

use crate::config::AnalysisConfig;
use evplane_kernel::matcher::Cut;
use evplane_kernel::record::{CandidateRecord, EventPlaneAngles, MatchedRecord};
use evplane_kernel::{CandidateMatcher, DuplicatePolicy, EventPlaneIndex, MatchStats};
use evplane_persistence::{read_all, PersistenceError, StreamReader, StreamWriter};

pub const DEFAULT_EVENT_PLANE: &str = "EventPlane_angles.evs";

pub struct MatchArgs {
    pub candidates: PathBuf,
    pub file_index: u32,
    pub event_plane: PathBuf,
    pub output_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub strict_keys: bool,
}

pub struct MatchReport {
    pub stats: MatchStats,
    pub output: PathBuf,
    pub indexed: usize,
    pub collisions: usize,
}

pub fn output_name(file_index: u32) -> String {
    format!("LambdaFile_newPhiEP_{file_index}.evs")
}

pub fn run(args: &MatchArgs) -> anyhow::Result<MatchReport> {
    let cfg = AnalysisConfig::load_or_default(args.config.as_deref())?;
    let policy = if args.strict_keys {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::LastWins
    };

    let planes: Vec<EventPlaneAngles> = read_all(&args.event_plane)
        .with_context(|| format!("Failed to read event planes {}", args.event_plane.display()))?;
    let index = EventPlaneIndex::build(planes.iter().map(|p| p.key), policy)
        .with_context(|| format!("Failed to index {}", args.event_plane.display()))?;

    let candidates = StreamReader::<CandidateRecord>::open(&args.candidates)
        .with_context(|| format!("Failed to open candidates {}", args.candidates.display()))?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let output = args.output_dir.join(output_name(args.file_index));
    let mut writer = StreamWriter::<MatchedRecord>::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    tracing::info!(
        candidates = %args.candidates.display(),
        indexed = index.len(),
        output = %output.display(),
        "matching candidates"
    );

    let mut matcher = CandidateMatcher::new(cfg.builder.event.clone(), cfg.candidate.clone(), &index, &planes);
    matcher
        .run::<_, PersistenceError, _>(candidates, &mut writer)
        .with_context(|| format!("Failed to match {}", args.candidates.display()))?;
    writer.finish()?;
    let stats = matcher.into_stats();

    tracing::info!(
        total = stats.total,
        failed_cuts = stats.failed_cuts,
        unmatched = stats.unmatched,
        saved = stats.saved,
        "matching complete"
    );

    let report = MatchReport {
        stats,
        output,
        indexed: index.len(),
        collisions: index.collisions().len(),
    };
    print_report(&report, &cfg);
    Ok(report)
}

fn print_report(report: &MatchReport, cfg: &AnalysisConfig) {
    let s = &report.stats;

    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Candidates", "Failed Cuts", "Unmatched", "Saved"]);
    summary.add_row(vec![
        s.total.to_string(),
        s.failed_cuts.to_string(),
        s.unmatched.to_string(),
        s.saved.to_string(),
    ]);

    let mut flow = Table::new();
    flow.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Cut", "Failed"]);
    for cut in Cut::ALL {
        flow.add_row(vec![
            cut.describe(&cfg.builder.event, &cfg.candidate),
            s.cut_flow.get(cut).to_string(),
        ]);
    }

    let runs: Vec<String> = s.runs.iter().map(u32::to_string).collect();

    println!("\nCandidate Matching\n");
    println!("{summary}\n");
    println!("{flow}\n");
    println!("Runs seen: {}", if runs.is_empty() { "none".to_string() } else { runs.join(", ") });
    println!(
        "Event planes indexed: {} ({} duplicate keys)",
        report.indexed, report.collisions
    );
    println!("Output: {}\n", report.output.display());
}
