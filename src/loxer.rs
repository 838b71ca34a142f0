use std::{
	fs::read_to_string,
	io::{BufRead, Stdout, Write},
	path::Path,
};

use anyhow::Context;
use tracing::{debug, info};

use crate::{LoxError, interpreter::Interpreter, parser::Parser, resolver::Resolver, scanner::Scanner};

const BANNER: &str = r"  _     _____  __
 | |   / _ \ \/ /
 | |  | | | \  /
 | |__| |_| /  \
 |_____\___/_/\_\

LOX interactive interpreter";

/// Loxer drives source code through scanning, parsing, resolution and
/// evaluation. One Loxer is one session: globals defined by a run stay
/// visible to later runs.
pub struct Loxer<W: Write = Stdout> {
	interpreter: Interpreter<W>,
}

impl Loxer {
	/// A session printing to stdout.
	pub fn new() -> Self { Self::with_output(std::io::stdout()) }
}

impl Default for Loxer {
	fn default() -> Self { Self::new() }
}

impl<W: Write> Loxer<W> {
	/// A session whose `print` statements write to `output`.
	pub fn with_output(output: W) -> Self { Self { interpreter: Interpreter::new(output) } }

	pub fn output(&self) -> &W { self.interpreter.output() }

	/// Run a whole file as one program.
	pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoxError> {
		let path = path.as_ref();
		if !path.exists() {
			return Err(LoxError::FileNotFound(path.to_path_buf()));
		}
		info!(path = %path.display(), "running file");
		let source = read_to_string(path).with_context(|| format!("Failed read source file {}", path.display()))?;
		self.run(&source)
	}

	/// Run the REPL prompt on stdin.
	pub fn run_prompt(&mut self) {
		let stdin = std::io::stdin();
		self.run_prompt_from(stdin.lock());
	}

	/// Run the REPL reading lines from `input` until it ends or a line reads
	/// `exit()`. The banner, prompts and `print` output share the output
	/// sink; errors are reported on stderr and the session carries on.
	pub fn run_prompt_from<R: BufRead>(&mut self, input: R) {
		self.echo(&format!("{BANNER}\n"));
		let mut lines = input.lines();
		loop {
			self.echo("> ");
			let line = match lines.next() {
				Some(Ok(line)) => line,
				Some(Err(e)) => {
					eprintln!("Failed read line: {e}");
					break;
				}
				None => {
					self.echo("\nExited treelox repl\n");
					break;
				}
			};
			let line = line.trim();
			if line == "exit()" {
				break;
			}
			if line.is_empty() {
				continue;
			}
			if let Err(e) = self.run(line) {
				eprintln!("{e}");
			}
		}
	}

	/// Write REPL chrome to the output sink right away.
	fn echo(&mut self, text: &str) {
		let output = self.interpreter.output_mut();
		if let Err(e) = output.write_all(text.as_bytes()).and_then(|()| output.flush()) {
			eprintln!("Failed write prompt: {e}");
		}
	}

	/// Run `source` as one program in this session.
	///
	/// Nothing is evaluated unless scanning, parsing and resolution all
	/// succeed.
	pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
		let tokens = Scanner::new(source).scan_tokens()?;
		let statements = Parser::new(tokens).parse()?;
		debug!(statements = statements.len(), "parsed");
		let locals = Resolver::new().resolve(&statements)?;
		self.interpreter.resolve(locals);
		self.interpreter.interpret(&statements)?;

		Ok(())
	}
}
