use anyhow::Result;
use clap::Parser;
use contract_qa::diagram::{self, ArchitectureDiagram, DEFAULT_OUTPUT};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "architecture-diagram",
    about = "Render the contract QA pipeline as a Graphviz diagram"
)]
struct Args {
    /// Output path without extension
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Image format passed to Graphviz
    #[arg(long, default_value = "png", value_parser = ["png", "svg", "pdf"])]
    format: String,

    /// Do not open the rendered image
    #[arg(long)]
    no_show: bool,

    /// Only write the .dot source
    #[arg(long)]
    dot_only: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let pipeline = ArchitectureDiagram::pipeline();
    let rendered = if args.dot_only {
        pipeline.write_dot(&args.output)?
    } else {
        pipeline.render(&args.output, &args.format)?
    };

    println!("Diagram written to {}", rendered.display());
    if !args.no_show && !args.dot_only {
        if let Err(e) = diagram::open(&rendered) {
            log::warn!("{}", e);
        }
    }
    Ok(())
}
