use clap::{ArgAction, Parser};
use log::{debug, LevelFilter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use treexport::sanitize::mark_empty_rows;
use treexport::{export, export_to_path, ClassificationTree, ExportError, ExportOptions, JsonIO, PlatformEscaping};

/// Export a trained classification tree to DOT, GraphML or JSON
#[derive(Parser, Debug)]
#[command(name = "treexport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serialized tree to export (REQUIRED unless --mark-empty is given)
    #[arg(long, value_name = "tree", required_unless_present = "mark_empty")]
    tree: Option<PathBuf>,

    /// Replace empty CSV fields with _ and write the result instead of exporting
    #[arg(long, value_name = "csv", conflicts_with = "tree")]
    mark_empty: Option<PathBuf>,

    /// Output the export code to the given file instead of stdout
    #[arg(short, long, value_name = "file")]
    file: Option<PathBuf>,

    /// Export format (graphml, dot, json). Default is: dot
    #[arg(short = 'e', long, value_name = "format")]
    format: Option<String>,

    /// Enable the pruning feature
    #[arg(short, long)]
    pruning: bool,

    /// Restore empty values that were replaced with _ upstream
    #[arg(short, long)]
    restore_placeholder: bool,

    /// Quote escaping of the DOT/JSON stream (none, windows, posix)
    #[arg(long, value_name = "convention")]
    escaping: Option<String>,

    /// Export options as json, command line flags take precedence
    #[arg(long, value_name = "config")]
    config: Option<PathBuf>,

    /// Verbose logging, repeat for debug output
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn options_from_cli(cli: &Cli) -> Result<ExportOptions, ExportError> {
    let mut options = match &cli.config {
        Some(path) => ExportOptions::load_json(path)?,
        None => ExportOptions::default(),
    };
    if let Some(format) = &cli.format {
        options = options.set_format(format.parse()?);
    }
    if cli.pruning {
        options = options.set_pruning(true);
    }
    if cli.restore_placeholder {
        options = options.set_restore_placeholder(true);
    }
    if let Some(escaping) = &cli.escaping {
        options = options.set_platform_escaping(PlatformEscaping::parse_or_fallback(escaping));
    }
    Ok(options)
}

fn run(cli: &Cli) -> Result<(), ExportError> {
    if let Some(csv) = &cli.mark_empty {
        return mark_empty(csv, cli.file.as_deref());
    }
    let options = options_from_cli(cli)?;
    let tree_path = cli
        .tree
        .as_ref()
        .ok_or_else(|| ExportError::UnableToRead("no tree given".to_string()))?;
    let tree = ClassificationTree::load_json(tree_path)?;
    debug!(
        "loaded tree: {} nodes, {} leaves, depth {}",
        tree.num_nodes(),
        tree.num_leaves(),
        tree.depth()
    );
    debug!("export options: {:?}", options);

    match &cli.file {
        Some(path) => export_to_path(&tree, path, &options)?,
        None => export(&tree, io::stdout().lock(), &options)?,
    };
    Ok(())
}

fn mark_empty(csv: &Path, out: Option<&Path>) -> Result<(), ExportError> {
    let text = fs::read_to_string(csv).map_err(|e| ExportError::UnableToRead(format!("{}: {}", csv.display(), e)))?;
    let marked = mark_empty_rows(&text)?;
    debug!("marked empty fields of {} lines", marked.lines().count());
    match out {
        Some(path) => fs::write(path, marked).map_err(|e| ExportError::UnableToWrite(e.to_string())),
        None => io::stdout()
            .lock()
            .write_all(marked.as_bytes())
            .map_err(|e| ExportError::UnableToWrite(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use treexport::ExportFormat;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "treexport",
            "--tree",
            "resources/weather_tree.json",
            "-e",
            "json",
            "-p",
            "-r",
            "--escaping",
            "windows",
        ]);
        let options = options_from_cli(&cli).unwrap();
        assert_eq!(options.format, ExportFormat::Json);
        assert!(options.pruning);
        assert!(options.restore_placeholder);
        assert_eq!(options.platform_escaping, PlatformEscaping::Windows);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let cli = Cli::parse_from(["treexport", "--tree", "t.json", "-e", "svg"]);
        assert!(matches!(options_from_cli(&cli), Err(ExportError::ParseString(..))));
    }

    #[test]
    fn test_unknown_escaping_falls_back() {
        let cli = Cli::parse_from(["treexport", "--tree", "t.json", "--escaping", "vms"]);
        let options = options_from_cli(&cli).unwrap();
        assert_eq!(options.platform_escaping, PlatformEscaping::Posix);
        assert_eq!(options.format, ExportFormat::Dot);
    }

    #[test]
    fn test_run_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tree.gv");
        let cli = Cli::parse_from([
            "treexport".to_string(),
            "--tree".to_string(),
            "resources/weather_tree.json".to_string(),
            "-f".to_string(),
            out.display().to_string(),
            "-p".to_string(),
        ]);
        run(&cli).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("digraph J48Tree {"));
        assert!(!text.contains("yes (0.0)"));
    }

    #[test]
    fn test_mark_empty_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("weather.csv");
        let out = dir.path().join("weather_marked.csv");
        std::fs::write(&csv, "outlook,windy,play\nsunny, ,no\n").unwrap();
        let cli = Cli::parse_from([
            "treexport".to_string(),
            "--mark-empty".to_string(),
            csv.display().to_string(),
            "-f".to_string(),
            out.display().to_string(),
        ]);
        assert!(cli.tree.is_none());
        run(&cli).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "outlook,windy,play\nsunny,_,no\n");
    }

    #[test]
    fn test_tree_or_csv_required() {
        assert!(Cli::try_parse_from(["treexport", "-p"]).is_err());
    }
}
