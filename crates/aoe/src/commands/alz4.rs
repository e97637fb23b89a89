use clap::{Args, Subcommand};
use miette::{miette, Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::PathBuf;
use tracing::info;

#[derive(Subcommand)]
pub enum Alz4Commands {
    /// Compress a file into an ALZ4 frame
    Compress(TransformArgs),
    /// Decompress an ALZ4 frame
    Decompress(TransformArgs),
    /// Show the header of an ALZ4 file
    Info(InfoArgs),
}

impl Alz4Commands {
    pub fn handle(&self) -> Result<()> {
        match self {
            Alz4Commands::Compress(args) => args.compress(),
            Alz4Commands::Decompress(args) => args.decompress(),
            Alz4Commands::Info(args) => args.handle(),
        }
    }
}

#[derive(Args)]
pub struct TransformArgs {
    /// An input file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// A target file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl TransformArgs {
    fn check_target(&self) -> Result<()> {
        if self.output.exists() && !self.overwrite {
            return Err(miette!("{} already exists", self.output.display()));
        }
        Ok(())
    }

    fn read_input(&self) -> Result<Vec<u8>> {
        fs::read(&self.input)
            .into_diagnostic()
            .context(format!("reading {}", self.input.display()))
    }

    pub fn compress(&self) -> Result<()> {
        self.check_target()?;
        let data = self.read_input()?;

        info!("compressing {} bytes into {}", data.len(), self.output.display());
        aoe_alz4::fs::write_file(&self.output, &data)
            .context(format!("writing {}", self.output.display()))?;

        Ok(())
    }

    pub fn decompress(&self) -> Result<()> {
        self.check_target()?;
        let data = aoe_alz4::fs::read_file(&self.input)
            .context(format!("decoding {}", self.input.display()))?;
        info!("decompressed {} bytes into {}", data.len(), self.output.display());
        fs::write(&self.output, data)
            .into_diagnostic()
            .context(format!("writing {}", self.output.display()))?;

        Ok(())
    }
}

#[derive(Args)]
pub struct InfoArgs {
    /// An input ALZ4 file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let file = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        let mut header = [0u8; aoe_alz4::Alz4Header::SIZE];
        BufReader::new(file)
            .read_exact(&mut header)
            .into_diagnostic()
            .context(format!("{} is too short for an alz4 header", self.file.display()))?;

        if !aoe_alz4::is_alz4(&header) {
            println!("{} {}", "❌".red(), "not an alz4 file".red());
            return Ok(());
        }

        let compressed = aoe_alz4::peek_compressed_size(&header[..])?;
        let uncompressed = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let version = u32::from_le_bytes([header[12], header[13], header[14], header[15]]);
        let ratio = if uncompressed == 0 {
            1.0
        } else {
            compressed as f64 / uncompressed as f64
        };

        println!("{}", self.file.display().blue());
        println!("  version:      {}", version);
        println!("  uncompressed: {} bytes", uncompressed);
        println!("  compressed:   {} bytes", compressed);
        println!("  ratio:        {}", format!("{:.1}%", ratio * 100.0).green());

        Ok(())
    }
}
