//! CLI entrypoint for `buildsmith`.

use clap::Parser;

use buildsmith_cli::{Args, CliError, load_settings, logging, run};

fn main() -> Result<(), CliError> {
    logging::init_tracing();
    let args = Args::parse();
    let settings = load_settings(&args)?;
    let mut stderr = std::io::stderr().lock();
    run(&settings, &mut stderr)?;
    Ok(())
}
