use anyhow::Result;
use clap::Parser;

mod cmd;
mod config;
mod writer;

#[derive(Debug, Parser)]
#[clap(version)]
/// Dump the accounts a twitter user follows
enum Cmd {
    Fetch(cmd::Fetch),
    Lookup(cmd::Lookup),
}

fn main() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(run())
}

async fn run() -> Result<()> {
    match Cmd::parse() {
        Cmd::Fetch(cmd) => cmd.run().await,
        Cmd::Lookup(cmd) => cmd.run().await,
    }
}
