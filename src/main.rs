use anyhow::Result;
use src2prompt::cli::{init_logging, parse_args};
use src2prompt::run_bundle;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, verbosity) = parse_args()?;
    init_logging(verbosity);

    let output = config.output_path.display().to_string();
    let summary = run_bundle(config).await?;

    println!("Added files:");
    for path in &summary.added {
        println!("{path}");
    }
    println!();
    println!("Total files added: {}", summary.added.len());
    println!("Saved to: {output}");

    Ok(())
}
