use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "RS-ROAD",
    about = "A pseudo-3D road renderer written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Activate GUI - the drive will be shown in real-time in a window
    #[clap(short, long)]
    pub gui: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the parameter file (OPTIONAL: if not set, the default parameters are used)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set seed for the track generation (OPTIONAL: if not set, a random track is generated)
    #[clap(short, long)]
    pub seed: Option<u64>,

    /// Set real-time factor (only relevant in GUI mode)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set time step size in seconds, should be in the range [0.001, 1.0]
    #[clap(short, long, default_value = "0.016")]
    pub timestep_size: f64,

    /// Set number of time steps to drive (only for non-GUI mode)
    #[clap(short, long, default_value = "600")]
    pub no_steps: u64,

    /// Export every n-th frame as PNG file (only for non-GUI mode)
    #[clap(short, long, default_value = "60")]
    pub export_every: u64,

    /// Set directory for the exported files
    #[clap(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Export the generated track geometry as CSV file into the output directory
    #[clap(long)]
    pub export_track: bool,
}
