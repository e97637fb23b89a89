use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::info;

use crate::pipeline::{archive_name, pack, PackConfig, DEFAULT_EXTENSIONS};

#[derive(Args)]
pub struct PackArgs {
    /// Directory holding the XML sources
    #[arg(short, long, value_name = "DIR", default_value = "xml_data_source")]
    source: PathBuf,

    /// Directory receiving the XMB files, the archive is created next to it
    #[arg(short, long, value_name = "DIR", default_value = "Data")]
    data: PathBuf,

    /// Archive name suffix, producing Data_<SUFFIX>.bar, or Data.bar when empty
    #[arg(long, default_value = "generated")]
    suffix: String,

    /// Extensions of the source files to convert
    #[arg(short, long, value_delimiter = ',', default_values = DEFAULT_EXTENSIONS)]
    extensions: Vec<String>,
}

impl PackArgs {
    pub fn handle(&self) -> Result<()> {
        let config = PackConfig {
            source: self.source.clone(),
            data: self.data.clone(),
            archive_name: archive_name(&self.suffix),
            extensions: self.extensions.clone(),
        };

        let report = pack(&config)?;

        info!(
            "wrote {} with {} entries from {} sources",
            report.archive.display(),
            report.entries.len(),
            report.converted
        );
        println!(
            "{} Time Cost: {} ms",
            "Finished.".green(),
            report.elapsed.as_millis()
        );

        Ok(())
    }
}
