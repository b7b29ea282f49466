use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::labels::LabelFormatter;
use crate::logging;

#[derive(Debug, Args, Clone)]
pub struct LabelArgs {
    /// Identifiers to format; reads one per line from stdin when omitted
    pub raw: Vec<String>,
}

pub async fn run(args: LabelArgs, formatter: &LabelFormatter) -> Result<()> {
    if !args.raw.is_empty() {
        for raw in &args.raw {
            println!("{}", formatter.format(raw));
        }
        return Ok(());
    }

    logging::info_simple("label_stdin", "reading identifiers from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read identifiers from stdin")?
    {
        println!("{}", formatter.format(&line));
    }
    Ok(())
}
