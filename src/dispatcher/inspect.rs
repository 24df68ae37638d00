use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::formatters;
use crate::importers::{detect_file_kind, FileKind};

pub fn dispatch_inspect(file_path: &Path, json_output: bool) -> Result<()> {
    tracing::info!("Inspecting {}", file_path.display());

    let (kind, headers) = detect_file_kind(file_path)
        .with_context(|| format!("Failed to inspect {}", file_path.display()))?;

    if json_output {
        #[derive(Serialize)]
        struct JsonInspect<'a> {
            file: String,
            kind: FileKind,
            description: &'a str,
            headers: &'a [String],
        }

        println!(
            "{}",
            formatters::to_json(&JsonInspect {
                file: file_path.display().to_string(),
                kind,
                description: kind.describe(),
                headers: &headers,
            })
        );
    } else {
        print!("{}", formatters::format_inspect(file_path, kind, &headers));
    }

    Ok(())
}
