use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vsearch::{
    analysis,
    cli::{Cli, OutputFormat},
    csv_output::CsvTables,
    json_output,
};

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

    // Fail before loading anything if CSV output has nowhere to go
    if args.format == OutputFormat::Csv && args.output_dir.is_none() {
        anyhow::bail!("--format csv requires --output-dir DIR");
    }

    init_tracing(args.debug);

    let config = args.analysis_config()?;
    let report = analysis::analyze(&config)?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", report.to_report_string(&config.render));
        }
        OutputFormat::Json => {
            println!("{}", json_output::to_json(&report)?);
        }
        OutputFormat::Csv => {
            if let Some(dir) = &args.output_dir {
                let written = CsvTables::new(&report, &config.render).write_to_dir(dir)?;
                for path in written {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
