use crate::pipeline::workflow::launch;
use anyhow::Result;
use clap::Parser;

mod cache;
mod cli;
mod config;
mod llm;
mod pipeline;
mod server;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let (config, command) = args.into_config();

    match command {
        cli::Command::Serve => server::serve(config).await,
        cli::Command::Generate { topic } => {
            let article = launch(&config, &topic).await?;
            println!("{}", article.render_markdown());
            Ok(())
        }
    }
}
