use clap::{Args, Subcommand};
use miette::{miette, Result};
use std::path::PathBuf;
use tracing::info;

use crate::pipeline::convert_document;

#[derive(Subcommand)]
pub enum XmbCommands {
    /// Convert an XML document into an XMB file
    Convert(ConvertArgs),
}

impl XmbCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            XmbCommands::Convert(convert) => convert.handle(),
        }
    }
}

#[derive(Args)]
pub struct ConvertArgs {
    /// An input XML file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// A target XMB file, defaults to the input with `.xmb` appended
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the tree without ALZ4 compression
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ConvertArgs {
    pub fn handle(&self) -> Result<()> {
        let output = self.output.clone().unwrap_or_else(|| {
            let mut output = self.input.clone().into_os_string();
            output.push(".xmb");
            output.into()
        });

        if output.exists() && !self.overwrite {
            return Err(miette!("{} already exists", output.display()));
        }

        info!("converting {} to {}", self.input.display(), output.display());
        convert_document(&self.input, &output, self.raw)
    }
}
