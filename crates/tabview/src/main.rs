//! tabview - list view over a JSON record snapshot.
//!
//! Loads a JSON array of records (as served by a list endpoint) plus an
//! optional view spec, and either prints one page or opens an interactive
//! table with filtering, sorting, paging and column toggles.
//!
//! Usage:
//!   tabview candidates.json                         # interactive, columns inferred
//!   tabview candidates.json --view candidates.view.json
//!   tabview candidates.json --print --filter bo --sort age
//!   tabview requisitions.json --print --page 2 --page-size 25 --hide notes

mod print;

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tabview_core::json::{
    DEFAULT_ID_FIELD, JsonRecord, LoadError, ViewSpec, load_records, load_view_spec,
};
use tabview_core::tui::App;
use tabview_core::{SortDirection, TableEngine};

/// List view over a JSON record snapshot.
#[derive(Parser)]
#[command(name = "tabview", about = "Filter, sort and page JSON records", version = tabview_core::VERSION)]
struct Args {
    /// JSON file holding an array of record objects.
    #[arg(value_name = "RECORDS", env = "TABVIEW_RECORDS")]
    records: PathBuf,

    /// View spec (columns, kinds, options). Inferred from the records if omitted.
    #[arg(long, value_name = "PATH", env = "TABVIEW_VIEW")]
    view: Option<PathBuf>,

    /// Rows per page; overrides the view spec.
    #[arg(long, env = "TABVIEW_PAGE_SIZE")]
    page_size: Option<usize>,

    /// Initial filter text.
    #[arg(long)]
    filter: Option<String>,

    /// Comma-separated columns the filter applies to.
    #[arg(long, value_delimiter = ',')]
    filter_columns: Vec<String>,

    /// Column to sort on.
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Page to show (1-based).
    #[arg(long, default_value = "1")]
    page: usize,

    /// Comma-separated columns to hide.
    #[arg(long, value_delimiter = ',')]
    hide: Vec<String>,

    /// Comma-separated columns to show (including ones hidden by default).
    #[arg(long, value_delimiter = ',')]
    show: Vec<String>,

    /// Print the page to stdout instead of opening the interactive view.
    #[arg(long)]
    print: bool,

    /// Reload the records file every N seconds (interactive mode).
    #[arg(long, value_name = "SECS")]
    refresh: Option<u64>,

    /// Write logs to this file (interactive mode logs nowhere otherwise).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: cannot open log file: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(args) {
        error!(error = %e, "tabview failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(args: &Args) -> std::io::Result<()> {
    let level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let directive = format!("tabview={level},tabview_core={level}");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // The TUI owns the terminal; only print mode logs to stderr.
        None if args.print => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let (mut spec, preloaded) = load_view(&args)?;
    if let Some(page_size) = args.page_size {
        spec.options.page_size = page_size;
    }

    let title = spec.title.clone().unwrap_or_else(|| title_from_path(&args.records));
    let mut engine = spec.build_engine()?;
    apply_args(&mut engine, &args)?;

    info!(
        version = tabview_core::VERSION,
        records = %args.records.display(),
        columns = engine.columns().len(),
        "view configured"
    );

    let path = args.records.clone();
    let id_field = spec.id_field.clone();

    if args.print {
        let records = match preloaded {
            Some(records) => records,
            None => load_records(&path, &id_field)?,
        };
        engine.set_records(records);
        // Records arrive after the initial page request; re-apply it.
        engine.set_page(args.page.saturating_sub(1));
        let vm = engine.view().to_view_model(title);
        print!("{}", print::render_plain(&vm));
        return Ok(());
    }

    let source = Box::new(move || load_records(&path, &id_field));
    let page = args.page.saturating_sub(1);
    let app = App::new(title, engine, source)
        .with_refresh(args.refresh.map(Duration::from_secs))
        .with_start_page(page);
    app.run()?;
    Ok(())
}

/// Loads the view spec, or infers one from the records file. Records read
/// for inference are handed back so they are not parsed twice.
fn load_view(args: &Args) -> Result<(ViewSpec, Option<Vec<JsonRecord>>), LoadError> {
    match &args.view {
        Some(path) => Ok((load_view_spec(path)?, None)),
        None => {
            let records = load_records(&args.records, DEFAULT_ID_FIELD)?;
            Ok((ViewSpec::infer(&records), Some(records)))
        }
    }
}

/// Applies the command-line view state on top of the view's configured defaults.
fn apply_args(
    engine: &mut TableEngine<JsonRecord>,
    args: &Args,
) -> Result<(), tabview_core::ConfigError> {
    if !args.filter_columns.is_empty() {
        engine.set_filter_columns(&args.filter_columns)?;
    }
    if let Some(filter) = &args.filter {
        engine.set_filter_text(filter.clone());
    }
    if let Some(sort) = &args.sort {
        engine.set_sort_column(Some(sort.as_str()))?;
        let descending = engine
            .sort()
            .is_some_and(|s| s.direction == SortDirection::Descending);
        if args.desc != descending {
            engine.toggle_sort_direction();
        }
    }
    for key in &args.hide {
        engine.set_visibility(key, false)?;
    }
    for key in &args.show {
        engine.set_visibility(key, true)?;
    }
    Ok(())
}

/// `"data/candidates.json"` -> `"candidates"`.
fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn title_uses_file_stem() {
        assert_eq!(title_from_path(Path::new("data/candidates.json")), "candidates");
        assert_eq!(title_from_path(Path::new("/")), "records");
    }

    #[test]
    fn args_parse_lists() {
        let args = Args::try_parse_from([
            "tabview",
            "reqs.json",
            "--print",
            "--hide",
            "notes,salary",
            "--sort",
            "opened",
            "--desc",
        ])
        .unwrap();
        assert_eq!(args.hide, vec!["notes", "salary"]);
        assert!(args.desc);
        assert_eq!(args.page, 1);
    }

    #[test]
    fn desc_requires_sort() {
        assert!(Args::try_parse_from(["tabview", "reqs.json", "--desc"]).is_err());
    }

    #[test]
    fn cli_state_applies_to_engine() {
        let spec: ViewSpec = serde_json_spec();
        let mut engine = spec.build_engine().unwrap();
        let args = Args::try_parse_from([
            "tabview",
            "x.json",
            "--filter-columns",
            "name",
            "--filter",
            "a",
            "--sort",
            "name",
            "--desc",
            "--hide",
            "stage",
        ])
        .unwrap();
        apply_args(&mut engine, &args).unwrap();
        assert_eq!(engine.filter_columns(), vec!["name"]);
        assert_eq!(engine.filter_text(), "a");
        assert_eq!(engine.sort().unwrap().direction, SortDirection::Descending);
        assert!(!engine.is_visible("stage").unwrap());

        let bad = Args::try_parse_from(["tabview", "x.json", "--sort", "salary"]).unwrap();
        assert!(apply_args(&mut engine, &bad).is_err());
    }

    #[test]
    fn inferred_view_reuses_parsed_records() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("rounds.json");
        fs::write(&records, r#"[{"id": "r1", "round": "HR"}, {"id": "r2", "round": "Tech"}]"#)
            .unwrap();
        let view = dir.path().join("rounds.view.json");
        fs::write(&view, r#"{"columns": [{"key": "round"}]}"#).unwrap();

        let args = Args::try_parse_from(["tabview", records.to_str().unwrap()]).unwrap();
        let (spec, preloaded) = load_view(&args).unwrap();
        assert_eq!(spec.columns.len(), 2);
        assert_eq!(preloaded.map(|r| r.len()), Some(2));

        let args = Args::try_parse_from([
            "tabview",
            records.to_str().unwrap(),
            "--view",
            view.to_str().unwrap(),
        ])
        .unwrap();
        let (spec, preloaded) = load_view(&args).unwrap();
        assert_eq!(spec.columns.len(), 1);
        assert!(preloaded.is_none());
    }

    fn serde_json_spec() -> ViewSpec {
        let records = tabview_core::json::parse_records(
            r#"[{"id": "1", "name": "Ana", "stage": "offer"}]"#,
            "id",
        )
        .unwrap();
        ViewSpec::infer(&records)
    }
}
