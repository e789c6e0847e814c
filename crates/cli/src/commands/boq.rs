//! BOQ analysis commands.
//!
//! # Usage
//!
//! ```bash
//! mkt boq analyze -i "Two-storey house, concrete frame" -f plan.pdf -f site.dwg
//! mkt boq analyze -i "..." -f plan.pdf --save
//! ```
//!
//! # Environment Variables
//!
//! - `BOQ_API_ENDPOINT` - Analysis workflow URL
//! - `BOQ_TIMEOUT_SECS` - Request timeout in seconds

use std::path::PathBuf;

use clap::Args;

use marketplace_boq::{
    BoqClient, BoqConfig, BoqFile, BoqRequest, default_report_name, format_file_size, write_report,
};

use super::{CommandError, output};

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Project requirements
    #[arg(short, long)]
    pub input: String,

    /// Drawing or document (pdf, png, jpg, jpeg, dwg, dxf); repeatable
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// Save the analysis to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the analysis as boq-analysis-<timestamp>.json
    #[arg(long, conflicts_with = "output")]
    pub save: bool,
}

pub async fn analyze(args: AnalyzeArgs) -> Result<(), CommandError> {
    let config = BoqConfig::from_env()?;

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file = BoqFile::read(path).await?;
        tracing::info!(file = %file.name, size_mb = %format_file_size(file.size()), "attached");
        files.push(file);
    }
    let request = BoqRequest::new(args.input, files)?;

    let report = BoqClient::new(&config)?.analyze(request).await?;

    let target = args
        .output
        .or_else(|| args.save.then(|| PathBuf::from(default_report_name())));
    if let Some(path) = target {
        write_report(&path, &report).await?;
    }

    output::print_json(&report)
}
