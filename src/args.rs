use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "intake-mover")]
#[clap(version, about)]
pub struct Args {
    /// Directory scanned for incoming files, defaults to TestFiles next to
    /// the program's directory.
    #[clap(long)]
    pub intake_dir: Option<PathBuf>,
    /// Directory holding automation.log, defaults to logs next to the
    /// program's directory.
    #[clap(long)]
    pub log_dir: Option<PathBuf>,
    /// Suppress any progress output if set.
    #[clap(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
