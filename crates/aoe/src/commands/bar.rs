use clap::{Args, Subcommand};
use miette::{miette, Context, IntoDiagnostic, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

use crate::pipeline::build_archive;

#[derive(Subcommand)]
pub enum BarCommands {
    /// Archive a directory into a BAR file
    Create(CreateArgs),
}

impl BarCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            BarCommands::Create(create) => create.handle(),
        }
    }
}

#[derive(Args)]
pub struct CreateArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target BAR file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Write the archive entries as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl CreateArgs {
    pub fn handle(&self) -> Result<()> {
        if !self.directory.is_dir() {
            return Err(miette!("{} is not a directory", self.directory.display()));
        }
        if self.file.exists() && !self.overwrite {
            return Err(miette!("{} already exists", self.file.display()));
        }

        info!("creating {}", &self.file.display());
        let entries = build_archive(&self.directory, &self.file)?;

        if let Some(manifest) = &self.manifest {
            let out = File::create(manifest)
                .into_diagnostic()
                .context(format!("creating {}", manifest.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(out), &entries)
                .into_diagnostic()
                .context(format!("writing {}", manifest.display()))?;
            info!("wrote manifest {}", manifest.display());
        }

        Ok(())
    }
}
