use anyhow::{Context, Result};
use clap::Parser;
use testigo::{
    analysis,
    cli::{Cli, OutputFormat},
    csv_output::CombinedTableCsv,
    ingest,
    json_output::JsonReport,
    report,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let ingestion = ingest::ingest_folder(&args.folder)?;
    let analysis = analysis::analyze(&ingestion.records);

    if !args.no_export {
        CombinedTableCsv::write_to(&ingestion.records, &args.export).with_context(|| {
            format!("Failed to write combined table to {}", args.export.display())
        })?;
    }

    match args.format {
        OutputFormat::Text => {
            print!("{}", report::render(&ingestion, &analysis));
        }
        OutputFormat::Json => {
            let folder = args.folder.display().to_string();
            let json = JsonReport::new(&folder, &ingestion, &analysis)
                .to_string_pretty()
                .context("Failed to serialize JSON report")?;
            println!("{json}");
        }
        OutputFormat::Csv => {
            print!("{}", CombinedTableCsv::to_csv(&ingestion.records));
        }
    }

    Ok(())
}
