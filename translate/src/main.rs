use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use xir_translate::cli::{Args, initialize};
use xir_translate::translate;

fn main() {
    let args = Args::parse();
    xir_core::logging::init(args.verbose);

    let config = match initialize(&args) {
        Ok(Some(config)) => Arc::new(config),
        Ok(None) => return,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    match translate(config) {
        Ok(unit) => info!("{unit}"),
        Err(e) => {
            error!("Translation failed: {e}");
            std::process::exit(1);
        }
    }
}
