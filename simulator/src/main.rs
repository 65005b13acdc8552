use anyhow::Context as _;
use rand::{SeedableRng as _, seq::SliceRandom as _};

use cordic::{Function, Pipeline, PipelineSchedule};

mod harness;

mod stimulus;

#[derive(clap::Parser)]
#[command(version, about = "Cycle-accurate simulator for the pipelined CORDIC engine")]
struct Args {
	/// Iterations followed by a pipeline register.
	#[arg(long, global = true, value_delimiter = ',', default_values_t = vec![3, 7, 11, 14, 17])]
	retime: Vec<usize>,

	#[command(subcommand)]
	command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
	/// Streams the vectors in a file through the pipeline and prints each result.
	Run {
		vectors: std::path::PathBuf,
	},

	/// Streams boundary and random vectors through the pipeline and checks each result.
	Verify {
		#[arg(long, default_value_t = 0)]
		seed: u64,

		/// Random vectors per function.
		#[arg(long, default_value_t = 1000)]
		count: usize,
	},
}

fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().filter_or("SIMULATOR_LOG", "info")).init();

	let args: Args = clap::Parser::parse();

	let schedule = PipelineSchedule::from_boundaries(&args.retime).context("invalid --retime")?;
	log::debug!("segments: {:?}", schedule.segments());
	let mut pipeline = Pipeline::new(schedule);

	match args.command {
		Command::Run { vectors } => run(&mut pipeline, &vectors)?,
		Command::Verify { seed, count } => verify(&mut pipeline, seed, count)?,
	}

	println!("{}", pipeline.statistics());

	Ok(())
}

fn run(pipeline: &mut Pipeline, path: &std::path::Path) -> anyhow::Result<()> {
	let source = std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
	let inputs = stimulus::parse(&source).with_context(|| format!("could not parse {}", path.display()))?;
	log::info!("{} vectors", inputs.len());

	harness::drive(pipeline, inputs, |tick, input, result| {
		println!("{tick:>6}  {input}  ->  {result}");
	});

	Ok(())
}

fn verify(pipeline: &mut Pipeline, seed: u64, count: usize) -> anyhow::Result<()> {
	let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

	let mut inputs = stimulus::boundary();
	for function in Function::ALL {
		inputs.extend((0..count).map(|_| stimulus::random(&mut rng, function)));
	}
	inputs.shuffle(&mut rng);

	let report = harness::verify(pipeline, inputs);
	println!("{report}");

	let failures = report.failures();
	if failures > 0 {
		anyhow::bail!("{failures} of {} results are out of tolerance", report.checked());
	}
	log::info!("all {} results are within tolerance", report.checked());

	Ok(())
}
