//! Output formatting: table, JSON, YAML.
//!
//! Renders data in the format selected by `--output`. Tables are built by
//! each command with `tabled`; structured formats serialize the underlying
//! data with serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// "changed" in yellow, "in sync" in green (when color is on).
pub fn change_label(changed: bool, color: bool) -> String {
    match (changed, color) {
        (true, true) => "changed".yellow().bold().to_string(),
        (true, false) => "changed".into(),
        (false, true) => "in sync".green().to_string(),
        (false, false) => "in sync".into(),
    }
}

/// Dimmed text for secondary information.
pub fn dim(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single item: `detail_fn` for tables, serde otherwise.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        name: String,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![Item {
            name: "leaf1".into(),
        }]
    }

    #[test]
    fn table_uses_detail_view() {
        let out = render_single(OutputFormat::Table, &items(), |list| {
            let rows: Vec<Row> = list
                .iter()
                .map(|i| Row {
                    name: i.name.clone(),
                })
                .collect();
            render_table(&rows)
        })
        .unwrap();
        assert!(out.contains("Name"));
        assert!(out.contains("leaf1"));
    }

    #[test]
    fn json_serializes_data() {
        let out = render_single(OutputFormat::Json, &items(), |_| String::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "leaf1");
    }

    #[test]
    fn yaml_serializes_data() {
        let out = render_single(OutputFormat::Yaml, &items(), |_| String::new()).unwrap();
        assert!(out.contains("name: leaf1"));
    }

    #[test]
    fn labels_without_color_are_plain() {
        assert_eq!(change_label(true, false), "changed");
        assert_eq!(change_label(false, false), "in sync");
        assert_eq!(dim("x", false), "x");
    }
}
