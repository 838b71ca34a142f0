use std::path::PathBuf;

use palc::Parser;

#[derive(Parser)]
#[command(name = "treelox", after_long_help = "Runs a Lox script, or starts an interactive session without one.")]
pub struct Cli {
	/// Script to run
	pub path: Option<PathBuf>,
}
