//! `notcore-dedup check | validate | types`

use std::path::{Path, PathBuf};

use notcore_dedup::{registry, Catalog, DedupReport, DedupSettings};

use crate::exit_codes::EXIT_DUPLICATES;
use crate::input::{load_batch, load_existing};
use crate::CliError;

pub struct CheckArgs {
    pub config: PathBuf,
    pub input: PathBuf,
    pub existing: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub locale: Option<String>,
    pub catalog: Option<PathBuf>,
}

fn read_settings(path: &Path) -> Result<DedupSettings, CliError> {
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| {
            CliError::usage(format!("cannot read config {}: {e}", path.display()))
                .with_hint("pass the path to a .dedup.toml file")
        })?;
    DedupSettings::from_toml(&config_str).map_err(CliError::dedup)
}

fn catalog_for(args: &CheckArgs, settings: &DedupSettings) -> Result<Catalog, CliError> {
    match (&args.catalog, &args.locale) {
        (Some(path), _) => {
            let source = std::fs::read_to_string(path)
                .map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display())))?;
            let lang = path.file_stem().and_then(|s| s.to_str()).unwrap_or("custom");
            Catalog::from_toml(lang, &source).map_err(CliError::dedup)
        }
        (None, Some(code)) => Ok(Catalog::for_locale(code)),
        (None, None) => Ok(Catalog::for_locale(&settings.report.locale)),
    }
}

pub fn cmd_check(args: CheckArgs) -> Result<(), CliError> {
    let settings = read_settings(&args.config)?;
    let catalog = catalog_for(&args, &settings)?;

    let table = load_batch(&args.input)?;
    let existing = match args.existing {
        Some(ref path) => load_existing(path)?,
        None => Vec::new(),
    };

    let report = notcore_dedup::run(&table, &settings, &existing, &catalog)
        .map_err(CliError::dedup)?;

    if args.json || args.output.is_some() {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::usage(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::usage(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    if !args.json {
        print_diagnostics(&report);
    }
    print_summary(&report);

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::new(
            EXIT_DUPLICATES,
            format!("{} problem(s) found", report.diagnostics.len()),
        ))
    }
}

fn print_diagnostics(report: &DedupReport) {
    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic.message);
        for detail in &diagnostic.details {
            println!("    {detail}");
        }
    }
}

// Human summary to stderr so --json stdout stays a single value.
fn print_summary(report: &DedupReport) {
    let s = &report.summary;
    eprintln!(
        "{} ({} {}): {} rows, {} duplicate pairs, {} rows matching existing records, {} id collisions",
        report.meta.config_name,
        report.meta.operator,
        report.meta.types.join("+"),
        s.rows,
        s.duplicate_pairs,
        s.rows_with_persisted_matches,
        s.identity_collisions,
    );
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let settings = read_settings(&config_path)?;
    let identity = settings.report.identity_column.as_deref().unwrap_or("(none)");
    eprintln!(
        "valid: '{}' with {} type(s) joined by {}, identity column {}, label column {}",
        settings.name,
        settings.dedup.types.len(),
        settings.dedup.operator,
        identity,
        settings.report.label_column,
    );
    Ok(())
}

pub fn cmd_types(json: bool) -> Result<(), CliError> {
    let types = registry::all();
    if json {
        let json_str = serde_json::to_string_pretty(&types)
            .map_err(|e| CliError::usage(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    for ty in types {
        println!(
            "{:<13} {:<3} {}",
            ty.name.as_str(),
            ty.condition.to_string(),
            ty.columns.join(", ")
        );
    }
    Ok(())
}
