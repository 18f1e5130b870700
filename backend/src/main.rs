//! Sweeper CLI - clean and convert tabular files
//!
//! ```bash
//! sweeper serve                                  # Start HTTP server (port 3000)
//! sweeper inspect a.csv b.xlsx --chart           # Preview files as JSON
//! sweeper convert a.csv --to excel --remove-duplicates --fill-missing
//! ```

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sweeper::{
    export_file, process_batch, CleaningOptions, FileOptions, FileReport, FileRequest,
    OutputFormat, Settings, UploadedFile,
};

#[derive(Parser)]
#[command(name = "sweeper", version)]
#[command(about = "Clean CSV/Excel files and convert them to CSV, Excel or PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default: SWEEPER_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Parse, clean and preview one or more files
    Inspect {
        /// Input .csv / .xlsx files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,

        /// Include bar-chart series for the first two numeric columns
        #[arg(long)]
        chart: bool,
    },

    /// Convert a file to CSV, Excel or PDF
    Convert {
        /// Input .csv / .xlsx file
        input: PathBuf,

        /// Target format: csv, excel or pdf
        #[arg(short, long)]
        to: OutputFormat,

        /// Output file (default: input name with the new extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },
}

#[derive(Args)]
struct TransformArgs {
    /// Drop rows that repeat an earlier row
    #[arg(long)]
    remove_duplicates: bool,

    /// Fill missing numeric values with the column mean
    #[arg(long)]
    fill_missing: bool,

    /// Keep only these columns, in this order (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
}

impl TransformArgs {
    fn file_options(&self, visualize: bool) -> FileOptions {
        FileOptions {
            cleaning: CleaningOptions {
                remove_duplicates: self.remove_duplicates,
                fill_missing_numeric: self.fill_missing,
            },
            columns: self.columns.clone(),
            visualize,
        }
    }
}

#[tokio::main]
async fn main() {
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&settings.log_filter);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port } => cmd_serve(settings, port).await,

        Commands::Inspect {
            files,
            transform,
            chart,
        } => cmd_inspect(&files, transform.file_options(chart)),

        Commands::Convert {
            input,
            to,
            output,
            transform,
        } => cmd_convert(&input, to, output.as_deref(), transform.file_options(false)),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_serve(mut settings: Settings, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        settings.port = port;
    }
    sweeper::server::start_server(settings).await?;
    Ok(())
}

fn cmd_inspect(files: &[PathBuf], options: FileOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut requests = Vec::with_capacity(files.len());
    let mut read_failures = 0;

    for path in files {
        match UploadedFile::from_path(path) {
            Ok(file) => requests.push(FileRequest::new(file).with_options(options.clone())),
            Err(e) => {
                read_failures += 1;
                eprintln!("❌ {}: {}", path.display(), e);
            }
        }
    }

    let reports: Vec<FileReport> = process_batch(requests)
        .into_iter()
        .map(FileReport::from)
        .collect();

    let failed = read_failures + reports.iter().filter(|r| r.error.is_some()).count();
    for report in &reports {
        if let Some(ref err) = report.error {
            eprintln!("❌ {}: {}", report.file_name, err);
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);

    if failed > 0 {
        return Err(format!("{} of {} file(s) failed", failed, files.len()).into());
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    options: FileOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting {} to {}", input.display(), format);

    let file = UploadedFile::from_path(input)?;
    let artifact = export_file(&FileRequest::new(file).with_options(options), format)?;

    let path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(&artifact.suggested_file_name),
    };
    fs::write(&path, &artifact.bytes)?;

    eprintln!("💾 Output written to: {} ({})", path.display(), artifact.mime_type);
    Ok(())
}
