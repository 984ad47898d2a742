use anyhow::Context;
use clap::Parser;
use img_minify::cli::Args;
use img_minify::logger::{self, Verbosity};
use img_minify::{minify_async, summary_line};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));

    let options = args.into_options();
    let output_dir = options.output_dir.clone();

    let processed = minify_async(options)
        .await
        .with_context(|| format!("failed to minify images into {}", output_dir.display()))?;

    println!("{}", summary_line(processed.len()));

    Ok(())
}
