use std::process::ExitCode;

use palc::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::Layer, prelude::*};
use treelox::{Loxer, cli::Cli};

fn main() -> ExitCode {
	tracing_subscriber::registry()
		.with(
			Layer::new().with_writer(std::io::stderr).with_filter(
				EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy(),
			),
		)
		.init();

	let mut loxer = Loxer::new();
	match Cli::parse().path {
		Some(path) => match loxer.run_file(&path) {
			Ok(()) => ExitCode::SUCCESS,
			Err(e) => {
				eprintln!("{e}");
				ExitCode::from(e.exit_code())
			}
		},
		None => {
			loxer.run_prompt();
			ExitCode::SUCCESS
		}
	}
}
