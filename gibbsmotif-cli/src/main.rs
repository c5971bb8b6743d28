use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use log::error;
use log::info;

use gibbsmotif::abc::Dna;
use gibbsmotif::search::Projection;
use gibbsmotif::search::SearchParams;
use gibbsmotif::sweep::Sweep;
use gibbsmotif::sweep::SweepConfig;
use gibbsmotif_io::table::DegeneratePolicy;

// --- Options -----------------------------------------------------------------

#[derive(Debug, Clone)]
struct InvalidOption(String);

impl std::error::Error for InvalidOption {}

impl std::fmt::Display for InvalidOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid option: {}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Profile {
    Standard,
    Fast,
}

impl FromStr for Profile {
    type Err = InvalidOption;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Profile::Standard),
            "fast" => Ok(Profile::Fast),
            _ => Err(InvalidOption(s.into())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ProjectionArg(Projection);

impl FromStr for ProjectionArg {
    type Err = InvalidOption;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positions" => Ok(ProjectionArg(Projection::Positions)),
            "consensus" => Ok(ProjectionArg(Projection::Consensus)),
            _ => Err(InvalidOption(s.into())),
        }
    }
}

// --- Main --------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Parameters {
    /// sequence file to load, one sequence per line
    #[arg(short, long, required = true)]
    sequences: PathBuf,

    /// output file to write to
    #[arg(short, long, default_value = "AlignmentMotifs.csv")]
    output: PathBuf,

    /// number of threads to use in parallel
    #[arg(short = 'j', long, default_value_t = 1)]
    jobs: usize,

    /// smallest motif width to search
    #[arg(long, required = true)]
    min_width: usize,
    /// largest motif width to search
    #[arg(long, required = true)]
    max_width: usize,
    /// spacing between two consecutive widths
    #[arg(long, default_value_t = 1)]
    step: usize,

    /// run profile setting the number of iterations
    #[arg(long, default_value = "standard")]
    profile: Profile,
    /// number of burn-in iterations, overriding the profile
    #[arg(long)]
    burn_in: Option<usize>,
    /// number of recording iterations, overriding the profile
    #[arg(long)]
    recording: Option<usize>,

    /// what to report for each width (positions or consensus)
    #[arg(long, default_value = "consensus")]
    projection: ProjectionArg,
    /// how to write runs without result (empty or sentinel)
    #[arg(long, default_value = "empty")]
    degenerate: DegeneratePolicy,

    /// seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// log debug messages
    #[arg(short, long)]
    verbose: bool,
    /// disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Parameters {
    fn sweep_config(&self) -> SweepConfig {
        let mut search = match self.profile {
            Profile::Standard => SearchParams::standard(),
            Profile::Fast => SearchParams::fast(),
        };
        search.projection = self.projection.0;
        if let Some(burn_in) = self.burn_in {
            search.burn_in = burn_in;
        }
        if let Some(recording) = self.recording {
            search.recording = recording;
        }

        let mut config = SweepConfig::new(self.jobs, self.min_width, self.max_width);
        config.step = self.step;
        config.search = search;
        config.seed = self.seed;
        config
    }
}

fn run(params: Parameters) -> Result<(), Box<dyn std::error::Error>> {
    info!("Loading sequences from {}", params.sequences.display());
    let sequences = gibbsmotif_io::sequences::open(&params.sequences)
        .and_then(gibbsmotif_io::sequences::read_set::<_, Dna>)?;
    info!(
        "Loaded {} sequences (L={}..{})",
        sequences.len(),
        sequences.min_len(),
        sequences.iter().map(|s| s.len()).max().unwrap_or(0)
    );

    let config = params.sweep_config();
    let sweep = Sweep::new(config, Arc::new(sequences))?;
    let widths = sweep.config().width_count();

    let pbar = if params.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(widths as u64).with_style(ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
        )?)
    };
    let table = sweep.run_with(|result| {
        info!(
            "width {}: best configuration seen {} times over {} updates ({} distinct)",
            result.width, result.best_count, result.updates, result.distinct
        );
        pbar.inc(1);
    })?;
    pbar.finish_and_clear();

    info!(
        "Searched {} widths in {:.3}s (seed {})",
        table.rows.len(),
        table.timing.elapsed.as_secs_f64(),
        table.seed
    );
    let output = File::create(&params.output).map(BufWriter::new)?;
    gibbsmotif_io::table::write(output, &table, params.degenerate)?;
    info!("Results written to {}", params.output.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = Parameters::parse();

    let level = if params.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    run(params).map_err(|e| {
        error!("{}", e);
        e
    })
}
