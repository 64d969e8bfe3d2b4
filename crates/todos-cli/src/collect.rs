use crate::output::{plural, print_json, print_warnings};
use anyhow::Context;
use std::path::PathBuf;
use todos_core::{scan, write_todos, FileReadWarning, FolderGroup, ScanOptions};

pub struct CollectArgs {
    pub root: PathBuf,
    pub output: PathBuf,
    pub root_label: Option<String>,
}

pub fn run(args: CollectArgs, json: bool) -> anyhow::Result<()> {
    let mut options = ScanOptions::new();
    // A previous run's output must never be read back in as a note.
    options = options.exclude(&args.output);
    if let Some(label) = args.root_label {
        options = options.with_root_label(label);
    }

    let result = scan(&args.root, &options).context("failed to scan notes")?;
    write_todos(&result, &args.output).context("failed to save todos")?;
    tracing::info!(
        todos = result.total_todos(),
        files = result.files_scanned,
        output = %args.output.display(),
        "collected open todos"
    );

    if json {
        #[derive(serde::Serialize)]
        struct CollectOutput<'a> {
            output: &'a std::path::Path,
            files_scanned: usize,
            files_with_todos: usize,
            total_todos: usize,
            folders: Vec<&'a FolderGroup>,
            warnings: &'a [FileReadWarning],
        }

        return print_json(&CollectOutput {
            output: &args.output,
            files_scanned: result.files_scanned,
            files_with_todos: result.files_with_todos(),
            total_todos: result.total_todos(),
            folders: result.folders().collect(),
            warnings: &result.warnings,
        });
    }

    print_warnings(&result.warnings);

    if result.is_empty() {
        println!(
            "No open todos found in {} ({} scanned). Wrote {}",
            args.root.display(),
            plural(result.files_scanned, "note"),
            args.output.display()
        );
        return Ok(());
    }

    println!(
        "Saved {} from {} ({} scanned) to {}",
        plural(result.total_todos(), "todo"),
        plural(result.files_with_todos(), "note"),
        result.files_scanned,
        args.output.display()
    );
    Ok(())
}
