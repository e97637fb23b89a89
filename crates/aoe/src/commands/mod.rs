pub mod alz4;
pub mod bar;
pub mod pack;
pub mod xmb;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Convert a source directory into XMB files and archive them
    Pack(pack::PackArgs),
    /// Handle XMB files
    Xmb {
        #[command(subcommand)]
        command: xmb::XmbCommands,
    },
    /// Handle ALZ4 files
    Alz4 {
        #[command(subcommand)]
        command: alz4::Alz4Commands,
    },
    /// Handle BAR files
    Bar {
        #[command(subcommand)]
        command: bar::BarCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Pack(pack) => pack.handle(),
            Commands::Xmb { command } => command.handle(),
            Commands::Alz4 { command } => command.handle(),
            Commands::Bar { command } => command.handle(),
        }
    }
}
