//! Normalize command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use serde_json::Value;

use taxon_tree::io::{read_json, write_json};
use taxon_tree::normalize;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, SimpleOutput};

/// Upgrade a legacy taxonomy document to the current schema
#[derive(Debug, Parser)]
pub struct NormalizeCommand {
    /// Document to read
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Where to write the result (defaults to rewriting the input)
    #[arg(value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl NormalizeCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let input = ctx.resolve(&self.input);
        let output = self
            .output
            .as_deref()
            .map_or_else(|| input.clone(), |path| ctx.resolve(path));

        let mut document: Value = read_json(&input, "taxonomy document")?;
        let changed = normalize(&mut document);
        write_json(&output, &document)?;

        print_output(&SimpleOutput::new(format!(
            "Normalized {} ({changed} fields updated) into {}",
            input.display(),
            output.display()
        )))
    }
}
