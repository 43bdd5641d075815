//! Snapcard - resolve a selection in a markdown file into a flashcard capture.
//!
//! # Usage
//!
//! ```bash
//! snapcard notes.md --select 120..126
//! snapcard notes.md --select 120..126 --against 110..130
//! snapcard notes.md --select 120..126 --rect 1700,100,1800,120 --viewport 1920x1080 --json
//! ```

use std::ops::Range;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use snapcard::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, parse_size, save_config_flags,
};
use snapcard::context::{Notifier, PunctuationSentenceSplitter, extract_context};
use snapcard::document::{self, Tree};
use snapcard::error::CaptureError;
use snapcard::perf;
use snapcard::selection::{
    Affinity, Selection, absolute_offsets, normalize_selection_boundaries, position_at,
    selection_text, selections_overlap,
};
use snapcard::ui::anchor::{AnchorPoint, Rect, ViewportMetrics, anchor_position_with_margin};

/// Resolve a text selection in a markdown file into a flashcard capture
#[derive(Parser, Debug)]
#[command(name = "snapcard", version, about, long_about = None)]
struct Cli {
    /// Markdown file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Selected char range in the raw concatenated leaf text, as START..END
    #[arg(long, value_name = "START..END", value_parser = parse_range)]
    select: Option<Range<usize>>,

    /// Second range to test for overlap with the selection
    #[arg(long, value_name = "START..END", value_parser = parse_range)]
    against: Option<Range<usize>>,

    /// Selection bounding box relative to the viewport, as LEFT,TOP,RIGHT,BOTTOM
    #[arg(long, value_name = "L,T,R,B", value_parser = parse_rect)]
    rect: Option<Rect>,

    /// Viewport size and scroll, as WxH or WxH+SX+SY
    #[arg(long, value_name = "WxH[+SX+SY]", value_parser = parse_viewport, default_value = "1280x800")]
    viewport: ViewportMetrics,

    /// Max words in a selection that still gets climbing context
    #[arg(long, value_name = "N")]
    word_threshold: Option<usize>,

    /// Max chars of climbed context
    #[arg(long, value_name = "N")]
    max_context: Option<usize>,

    /// Gap between the panel and the selection or viewport edge
    #[arg(long, value_name = "PX")]
    margin: Option<u32>,

    /// Capture panel size, as WxH
    #[arg(long, value_name = "WxH")]
    panel: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable engine timing logs
    #[arg(long)]
    perf: bool,

    /// Write engine events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    selection: Span,
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlaps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    anchor: Option<AnchorPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Span {
    start: usize,
    end: usize,
    text: String,
}

/// Collects capture problems for the report.
#[derive(Debug, Default)]
struct Warnings(Vec<String>);

impl Notifier for Warnings {
    fn notify(&mut self, problem: &CaptureError) {
        self.0.push(problem.to_string());
    }
}

fn parse_range(s: &str) -> Result<Range<usize>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got {s:?}"))?;
    let start = start.trim().parse().map_err(|e| format!("bad start: {e}"))?;
    let end = end.trim().parse().map_err(|e| format!("bad end: {e}"))?;
    Ok(start..end)
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("bad rect: {e}"))?;
    match values.as_slice() {
        [left, top, right, bottom] => Ok(Rect::new(*left, *top, *right, *bottom)),
        _ => Err(format!("expected L,T,R,B, got {s:?}")),
    }
}

fn parse_viewport(s: &str) -> Result<ViewportMetrics, String> {
    let mut parts = s.split('+');
    let size = parts.next().unwrap_or_default();
    let (width, height) = parse_size(size).ok_or_else(|| format!("expected WxH, got {size:?}"))?;
    let mut scroll = parts.map(|part| part.trim().parse::<f64>());
    let scroll_x = scroll.next().transpose().map_err(|e| format!("bad scroll: {e}"))?;
    let scroll_y = scroll.next().transpose().map_err(|e| format!("bad scroll: {e}"))?;
    Ok(ViewportMetrics::new(f64::from(width), f64::from(height))
        .with_scroll(scroll_x.unwrap_or(0.0), scroll_y.unwrap_or(0.0)))
}

/// Map a range of the raw concatenated leaf text onto leaf positions.
fn resolve_range(tree: &Tree, range: &Range<usize>) -> Result<Selection> {
    let root = tree.root();
    let start = position_at(tree, root, range.start, Affinity::Downstream)
        .with_context(|| format!("offset {} is outside the document", range.start))?;
    let end = position_at(tree, root, range.end, Affinity::Upstream)
        .with_context(|| format!("offset {} is outside the document", range.end))?;
    Ok(Selection::new(start, end))
}

fn build_report(cli: &Cli, effective: &ConfigFlags, tree: &Tree) -> Result<Report> {
    let range = cli.select.clone().context("--select is required")?;
    let raw = resolve_range(tree, &range)?;
    let normalized = {
        let _scope = perf::scope("normalize");
        normalize_selection_boundaries(tree, &raw)
    };
    let offsets = absolute_offsets(tree, tree.root(), &[normalized.start, normalized.end]);
    let (start, end) = match offsets.as_slice() {
        [Some(start), Some(end)] => (*start.min(end), *start.max(end)),
        _ => (range.start, range.end),
    };
    let text = selection_text(tree, &normalized).unwrap_or_default();
    perf::log_event("normalize", format!("{range:?} -> {start}..{end}"));

    let mut warnings = Warnings::default();
    let context = {
        let _scope = perf::scope("context");
        extract_context(
            tree,
            &normalized,
            &effective.context_options(),
            &PunctuationSentenceSplitter,
            &mut warnings,
        )
    };

    let overlaps = cli
        .against
        .as_ref()
        .map(|other| {
            let other = resolve_range(tree, other)?;
            Ok::<_, anyhow::Error>(selections_overlap(tree, &normalized, &other))
        })
        .transpose()?;

    let anchor = cli.rect.map(|rect| {
        anchor_position_with_margin(
            rect,
            effective.panel_size(),
            cli.viewport,
            effective.anchor_margin(),
        )
    });

    Ok(Report {
        selection: Span { start, end, text },
        context,
        overlaps,
        anchor,
        warnings: warnings.0,
    })
}

fn print_report(report: &Report) {
    println!(
        "selection {}..{}: {:?}",
        report.selection.start, report.selection.end, report.selection.text
    );
    match &report.context {
        Some(context) => println!("context: {context}"),
        None => println!("context: <none>"),
    }
    if let Some(overlaps) = report.overlaps {
        println!("overlaps: {overlaps}");
    }
    if let Some(anchor) = report.anchor {
        println!("anchor: ({}, {})", anchor.x, anchor.y);
    }
    for warning in &report.warnings {
        eprintln!("[warn] {warning}");
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if let Some(panel) = &cli.panel
        && parse_size(panel).is_none()
    {
        anyhow::bail!("--panel expects WxH, got {panel:?}");
    }

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("SNAPCARD_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_event_log_path(debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize debug log {}: {}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    if cli.select.is_none() && (cli.save || cli.clear) {
        return Ok(());
    }

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }
    let source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let tree = {
        let _scope = perf::scope("parse");
        document::parse(&source)?
    };

    let report = build_report(&cli, &effective, &tree)?;
    if effective.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
