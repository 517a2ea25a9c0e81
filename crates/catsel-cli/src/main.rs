//! catsel CLI: inspect, filter, and export catalog text dumps.

use clap::{Parser, Subcommand, ValueEnum};
use catsel_catalog::{Catalog, SelectionDocument};
use catsel_core::config::{CatalogConfig, CombineMode};
use catsel_io::{
    CatalogSource, JsonlCatalogWriter, TextCatalogReader, TextCatalogWriter,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catsel")]
#[command(about = "Columnar astronomical catalogs with incremental row selection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known catalogs and VizieR mirror sites
    Catalogs,

    /// Print titles and the quantity table of a catalog file
    Describe {
        /// Catalog text file
        #[arg(short, long)]
        input: PathBuf,

        /// Catalog identity used for generic roles (overrides #RESOURCE)
        #[arg(long)]
        code: Option<String>,
    },

    /// Load a catalog, apply criteria, report counts, optionally export
    Select {
        /// Catalog text file
        #[arg(short, long)]
        input: PathBuf,

        /// Catalog identity used for generic roles (overrides #RESOURCE)
        #[arg(long)]
        code: Option<String>,

        /// YAML selection document
        #[arg(short, long)]
        selection: Option<PathBuf>,

        /// Lower cut, QUANTITY=VALUE (repeatable)
        #[arg(long, value_parser = parse_bound)]
        min: Vec<(String, f64)>,

        /// Upper cut, QUANTITY=VALUE (repeatable)
        #[arg(long, value_parser = parse_bound)]
        max: Vec<(String, f64)>,

        /// Combine criteria with OR instead of AND
        #[arg(long)]
        or: bool,

        /// Row limit (overrides CATSEL_MAX_ROWS)
        #[arg(long)]
        max_rows: Option<usize>,

        /// Erase unselected rows before export
        #[arg(long)]
        erase: bool,

        /// Write selected rows here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Overwrite an existing output file
        #[arg(long)]
        clobber: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Jsonl,
}

fn main() {
    let cli = Cli::parse();
    let config = CatalogConfig::from_env();
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Catalogs => list_catalogs(),
        Commands::Describe { input, code } => {
            if let Err(e) = describe_catalog(&input, code, &config) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Select {
            input,
            code,
            selection,
            min,
            max,
            or,
            max_rows,
            erase,
            output,
            format,
            clobber,
        } => {
            let config = apply_overrides(config, max_rows, or);
            let request = SelectRequest {
                input,
                code,
                selection,
                min,
                max,
                erase,
                output,
                format,
                clobber,
            };
            if let Err(e) = run_select(request, &config) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse `QUANTITY=VALUE`.
fn parse_bound(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected QUANTITY=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing quantity name in '{}'", s));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad value in '{}': {}", s, e))?;
    Ok((name.to_string(), value))
}

fn apply_overrides(mut cfg: CatalogConfig, max_rows: Option<usize>, or: bool) -> CatalogConfig {
    if let Some(rows) = max_rows {
        cfg.max_rows = rows;
    }
    if or {
        cfg.combine_mode = CombineMode::Or;
    }
    cfg
}

fn list_catalogs() {
    println!("Known catalogs:");
    for cat in Catalog::known_catalogs() {
        println!("  {:<22} {}", cat.name, cat.vizier_id);
    }
    println!();
    println!("Mirror sites:");
    for site in Catalog::mirror_sites() {
        println!("  {:<10} {:<7} {}", site.code, site.country, site.host);
    }
}

fn reader_for(input: &Path, code: Option<String>) -> TextCatalogReader {
    let reader = TextCatalogReader::new(input);
    match code {
        Some(code) => reader.with_code(code),
        None => reader,
    }
}

fn describe_catalog(
    input: &Path,
    code: Option<String>,
    config: &CatalogConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = Catalog::with_config(config);
    reader_for(input, code).describe(&mut catalog)?;

    let info = catalog.info();
    println!("Catalog: {} ({})", info.catalog_name, info.catalog_ref);
    println!("Table:   {} ({})", info.table_name, info.table_ref);
    println!("Code:    {}", info.code);
    println!();
    println!("{:<16} {:<8} {:<8} {:<10} {:<24} {}", "name", "kind", "format", "unit", "ucd", "role");
    for q in catalog.quantities() {
        let role = q.role.map(|r| r.to_string()).unwrap_or_default();
        println!(
            "{:<16} {:<8} {:<8} {:<10} {:<24} {}",
            q.name,
            format!("{:?}", q.kind),
            q.format,
            q.unit,
            q.ucd,
            role
        );
    }
    Ok(())
}

struct SelectRequest {
    input: PathBuf,
    code: Option<String>,
    selection: Option<PathBuf>,
    min: Vec<(String, f64)>,
    max: Vec<(String, f64)>,
    erase: bool,
    output: Option<PathBuf>,
    format: OutputFormat,
    clobber: bool,
}

fn apply_bounds(
    catalog: &mut Catalog,
    min: &[(String, f64)],
    max: &[(String, f64)],
) -> catsel_core::error::Result<()> {
    for (name, value) in min {
        catalog.set_lower_cut(name, *value)?;
    }
    for (name, value) in max {
        catalog.set_upper_cut(name, *value)?;
    }
    Ok(())
}

fn run_select(req: SelectRequest, config: &CatalogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = Catalog::with_config(config);
    let mut reader = reader_for(&req.input, req.code);
    reader.load(&mut catalog, config.max_rows)?;

    if let Some(path) = &req.selection {
        let doc = SelectionDocument::parse_yaml(&fs::read_to_string(path)?)?;
        doc.apply(&mut catalog)?;
    }
    apply_bounds(&mut catalog, &req.min, &req.max)?;

    println!(
        "rows: {}, selected: {} ({} combination)",
        catalog.row_count(),
        catalog.selected_row_count(),
        catalog.combine_mode()
    );

    if req.erase {
        let removed = catalog.retain_selected(true)?;
        println!("erased {} rows, {} remain", removed, catalog.row_count());
    }

    if let Some(path) = &req.output {
        let written = match req.format {
            OutputFormat::Text => TextCatalogWriter::new()
                .clobber(req.clobber)
                .selected_only(true)
                .write_path(&catalog, path)?,
            OutputFormat::Jsonl => {
                if path.exists() && !req.clobber {
                    return Err(Box::new(catsel_io::Error::FileExists(path.clone())));
                }
                JsonlCatalogWriter::to_path(path)?.write_catalog(&catalog, true)?
            }
        };
        println!("wrote {} rows to {}", written, path.display());
    }
    Ok(())
}
