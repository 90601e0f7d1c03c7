//! File logging setup.

use std::fs::File;
use std::path::Path;

use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::Result;

/// Send `log` output at `level` and above to a file at `path`, truncating it.
/// Can only succeed once per process.
pub fn init_file_logger(path: impl AsRef<Path>, level: LevelFilter) -> Result<()> {
    let file = File::create(path)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}
