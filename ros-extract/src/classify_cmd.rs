use anyhow::Result;
use ros_extract::report::render_inference;

use crate::cli::{ClassifyArgs, OutputFormat};
use crate::pipeline::analyze;

pub fn run_classify(args: ClassifyArgs) -> Result<()> {
    let analysis = analyze(&args.snapshot)?;

    match args.format {
        OutputFormat::Text => println!("{}", render_inference(&analysis.inference)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis.inference)?),
    }
    Ok(())
}
