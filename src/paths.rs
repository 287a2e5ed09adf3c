use crate::args::Args;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const INTAKE_DIR_NAME: &str = "TestFiles";
const LOG_DIR_NAME: &str = "logs";

/// Fixed locations used by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub intake_dir: PathBuf,
    pub log_dir: PathBuf,
}

/// The parent of the directory holding the executable.
fn base_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    let exe_dir = exe.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory")
    })?;
    Ok(exe_dir.join(".."))
}

impl Paths {
    pub fn under(base: &Path) -> Self {
        Paths {
            intake_dir: base.join(INTAKE_DIR_NAME),
            log_dir: base.join(LOG_DIR_NAME),
        }
    }

    pub fn from_args(args: &Args) -> io::Result<Self> {
        let (intake_dir, log_dir) = match (&args.intake_dir, &args.log_dir) {
            (Some(intake), Some(log)) => (intake.clone(), log.clone()),
            (intake, log) => {
                let defaults = Self::under(&base_dir()?);
                (
                    intake.clone().unwrap_or(defaults.intake_dir),
                    log.clone().unwrap_or(defaults.log_dir),
                )
            }
        };
        Ok(Paths {
            intake_dir,
            log_dir,
        })
    }

    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.intake_dir)?;
        fs::create_dir_all(&self.log_dir)
    }
}
