use clap::Parser;

use crate::core::integrator::Method;
use crate::core::topology::TopologyKind;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Stop after this many simulated seconds (default: run until ctrl-c)
    #[arg(long)]
    pub duration: Option<f32>,

    /// Override oscillator count
    #[arg(long)]
    pub count: Option<usize>,

    /// Override coupling strength K
    #[arg(long)]
    pub coupling: Option<f32>,

    /// Override integrator method
    #[arg(long, value_enum)]
    pub method: Option<Method>,

    /// Override topology kind
    #[arg(long, value_enum)]
    pub topology: Option<TopologyKind>,

    /// Override noise amplitude
    #[arg(long)]
    pub noise: Option<f32>,

    /// Override speed multiplier (simulated seconds per wall second)
    #[arg(long)]
    pub speed: Option<f32>,

    /// Initial phases as a comma/whitespace-separated list
    #[arg(long)]
    pub phases: Option<String>,

    /// Natural frequencies as a comma/whitespace-separated list
    #[arg(long)]
    pub freqs: Option<String>,

    /// Write the recorded (time, r) series as CSV on exit
    #[arg(long)]
    pub csv: Option<String>,
}
