// Output formatting for CLI

use clap::ValueEnum;
use serde_json::json;
use std::io::Write;

use pathtag::TagMap;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Pretty,
    /// Compact JSON, one object per line
    Json,
    /// tag=value lines
    #[default]
    KeyValue,
    /// Aligned table
    Table,
}

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output the tags of one file
    pub fn output_tags(&self, file: &str, tags: &TagMap, writer: &mut impl Write) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                let value = json!({ "file": file, "tags": tags });
                writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
            }
            OutputFormat::Json => {
                let value = json!({ "file": file, "tags": tags });
                writeln!(writer, "{}", serde_json::to_string(&value)?)?;
            }
            OutputFormat::KeyValue => {
                writeln!(writer, "{}", file)?;
                for (key, values) in tags.iter() {
                    for value in values {
                        writeln!(writer, "{}={}", key, value)?;
                    }
                }
            }
            OutputFormat::Table => {
                self.output_table(file, tags, writer)?;
            }
        }
        Ok(())
    }

    /// Output as table
    fn output_table(&self, file: &str, tags: &TagMap, writer: &mut impl Write) -> anyhow::Result<()> {
        let max_key_len = tags.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

        writeln!(writer, "{}", file)?;
        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        for (key, values) in tags.iter() {
            writeln!(
                writer,
                "{:<width$}{}",
                format!("{}:", key),
                values.join("; "),
                width = max_key_len + 2
            )?;
        }
        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        Ok(())
    }

    /// Print a tag whose values change; `None` when it is removed
    pub fn print_change(&self, key: &str, values: Option<&[String]>) {
        if self.quiet {
            return;
        }
        match values {
            Some(values) => println!("    {}={:?}", key, values),
            None => println!("    {} removed", key),
        }
    }

    /// Print `source --> target` with the arrow in a fixed column
    pub fn print_rename(&self, source: &str, target: &str, column: usize) {
        if !self.quiet {
            println!("{}", rename_line(source, target, column));
        }
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

fn rename_line(source: &str, target: &str, column: usize) -> String {
    format!("{:<column$}--> {}", source, target, column = column)
}
