use anyhow::Context;
use clap::{Parser, Subcommand};
use typed_vec::{vector, ErrorFormatExt, ResultExt, Vector};

// === Clap === //

#[derive(Debug, Clone, Parser)]
#[command(about = "walks through the typed vector's operations", long_about = None)]
struct CliArgs {
	/// Skip printing element listings.
	#[arg(short = 'q', long = "quiet")]
	quiet: bool,

	#[command(subcommand)]
	command: Option<CliCommand>,
}

#[derive(Debug, Copy, Clone, Subcommand)]
enum CliCommand {
	/// Overwrite an element of a string vector.
	Strings,
	/// Pop every element off an integer vector.
	Ints,
	/// Read fields out of a vector of records.
	Tuples,
	/// Run every scenario in turn.
	All,
}

// === Driver === //

fn main() -> anyhow::Result<()> {
	// Setup debug services
	env_logger::init_from_env(env_logger::Env::new().default_filter_or("INFO"));

	// Parse arguments
	let args = CliArgs::parse();
	let listings = Listings { quiet: args.quiet };

	match args.command.unwrap_or(CliCommand::All) {
		CliCommand::Strings => run_strings(listings)?,
		CliCommand::Ints => run_ints(listings)?,
		CliCommand::Tuples => run_tuples(listings)?,
		CliCommand::All => {
			run_strings(listings).context("string scenario failed")?;
			run_ints(listings).context("integer scenario failed")?;
			run_tuples(listings).context("record scenario failed")?;
		}
	}

	Ok(())
}

#[derive(Debug, Copy, Clone)]
struct Listings {
	quiet: bool,
}

impl Listings {
	fn show(self, f: impl FnOnce()) {
		if !self.quiet {
			f();
		}
	}
}

// === Scenarios === //

fn run_strings(listings: Listings) -> anyhow::Result<()> {
	log::info!("Building a vector of strings...");

	let mut sv = vector![type &str; "Who", "are", "you?"]
		.context("failed to construct the string vector")?;
	listings.show(|| sv.print());

	*sv.at_mut(2)? = "we?";
	listings.show(|| sv.print());

	log::info!(
		"Index 0 still reads {:?} after index 2 became {:?}.",
		sv.at(0)?,
		sv.at(2)?,
	);

	// Probing past the end is reported rather than read.
	let _ = sv.at(sv.len()).log(log::Level::Warn);

	sv.release();
	Ok(())
}

fn run_ints(listings: Listings) -> anyhow::Result<()> {
	log::info!("Building a vector of integers...");

	let mut iv = vector![type i32; 1, 2, 3, 4].context("failed to construct the integer vector")?;
	listings.show(|| iv.print());

	println!("{}", iv.pop()?);

	while !iv.is_empty() {
		let value = iv.pop()?;
		log::info!("Popped {value}; {} element(s) remain.", iv.len());
	}

	if let Err(err) = iv.pop() {
		log::info!("Popping once more fails as expected. {}", err.format_error());
	}

	iv.release();
	Ok(())
}

#[derive(Debug, Copy, Clone)]
struct Tuple {
	x: i32,
	y: i32,
}

fn run_tuples(listings: Listings) -> anyhow::Result<()> {
	log::info!("Building a vector of records...");

	let mut tv: Vector<Tuple> = vector![
		Tuple { x: 0, y: 1 },
		Tuple { x: 4, y: 2 },
		Tuple { x: 5, y: 4 },
	]
	.context("failed to construct the record vector")?;

	// `Tuple` has no `Render` implementation so the listing needs an explicit mapping.
	listings.show(|| tv.print_with(|t| format!("{{ x: {}, y: {} }}", t.x, t.y)));

	println!("{}", tv.at(1)?.x);
	println!("{}", tv.at(2)?.x);

	tv.release();

	// A released vector stays poisoned.
	let _ = tv.at(0).log(log::Level::Warn);
	Ok(())
}
