use serde::Serialize;
use todos_core::FileReadWarning;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_warnings(warnings: &[FileReadWarning]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}

/// `1 todo` / `3 todos`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
