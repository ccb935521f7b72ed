// CLI for running kernel comparisons from kernel_compare

use clap::{Args, Parser, Subcommand};

// setup command line args

#[derive(Parser)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,
    /// Seed for the deterministic input generator.
    #[clap(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize 3-vectors under every layout backend.
    Normalize(ThreadedSizeArgs),
    /// Element-wise add and dot-product variants.
    Elementwise(SizeArgs),
    /// Min/max reduction variants, including the false-sharing pair.
    MinMax(ThreadedSizeArgs),
    /// Matrix multiply under three loop orders.
    MatMul(DimArgs),
    /// Naive vs tiled transpose.
    Transpose(TransposeArgs),
    /// Parallel midpoint integration with adjacent vs padded slots.
    Integrate(IntegrateArgs),
    /// Conditional sum over sorted vs unsorted input.
    Branch(SizeArgs),
    /// Sweep the default parameter grid across every family.
    All,
}

#[derive(Debug, Args)]
pub struct SizeArgs {
    /// Element counts to run, one comparison per value.
    #[clap(long = "size", default_values_t = [1usize << 18])]
    sizes: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct ThreadedSizeArgs {
    /// Element counts to run, one comparison per value.
    #[clap(long = "size", default_values_t = [1usize << 18])]
    sizes: Vec<usize>,
    #[clap(long)]
    threads: Option<usize>,
}

#[derive(Debug, Args)]
pub struct DimArgs {
    /// Matrix side lengths, one comparison per value.
    #[clap(long = "dim", default_values_t = [512usize])]
    dims: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct TransposeArgs {
    #[clap(long = "dim", default_values_t = [1024usize])]
    dims: Vec<usize>,
    /// Tile side lengths; each must divide the dimension.
    #[clap(long = "tile", default_values_t = [8usize, 16, 32])]
    tiles: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct IntegrateArgs {
    #[clap(long, default_value_t = 10_000_000)]
    steps: usize,
    #[clap(long)]
    threads: Option<usize>,
}

fn run(args: &CliArgs) -> Result<(), kernel_compare::CompareError> {
    let seed = args.seed;
    let default_threads = num_cpus::get();

    match args.command {
        Command::Normalize(ref a) => {
            let threads = a.threads.unwrap_or(default_threads);
            for &size in &a.sizes {
                perf_lab::comparisons::run_normalize(size, seed, threads)?;
            }
        }
        Command::Elementwise(ref a) => {
            for &size in &a.sizes {
                perf_lab::comparisons::run_elementwise(size, seed)?;
            }
        }
        Command::MinMax(ref a) => {
            let threads = a.threads.unwrap_or(default_threads);
            for &size in &a.sizes {
                perf_lab::comparisons::run_min_max(size, seed, threads)?;
            }
        }
        Command::MatMul(ref a) => {
            for &dim in &a.dims {
                perf_lab::comparisons::run_mat_mul(dim, seed)?;
            }
        }
        Command::Transpose(ref a) => {
            for &dim in &a.dims {
                for &tile in &a.tiles {
                    perf_lab::comparisons::run_transpose(dim, tile, seed)?;
                }
            }
        }
        Command::Integrate(ref a) => {
            let threads = a.threads.unwrap_or(default_threads);
            perf_lab::comparisons::run_integrate(a.steps, threads)?;
        }
        Command::Branch(ref a) => {
            for &size in &a.sizes {
                perf_lab::comparisons::run_branch(size, seed)?;
            }
        }
        Command::All => perf_lab::sweep::run_all(seed, default_threads),
    }
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    run(&args).map_err(|e| e.to_string())
}
