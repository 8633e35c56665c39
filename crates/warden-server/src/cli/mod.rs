use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "warden-server")]
#[command(about = "Warden access-control server")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run database migrations
    Migrate,
    /// Run migrations, seed privileges, roles and users once, then exit
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Migrate,
    Seed,
}

impl From<Cli> for RunMode {
    fn from(cli: Cli) -> Self {
        match cli.command {
            None => Self::Server,
            Some(Command::Migrate) => Self::Migrate,
            Some(Command::Seed) => Self::Seed,
        }
    }
}

pub fn parse_args() -> RunMode {
    Cli::parse().into()
}
