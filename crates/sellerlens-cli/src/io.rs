//! JSON Lines input and output

use anyhow::{Context, Result};
use sellerlens_core::{ClassificationResult, Review};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One input row: the original fields plus the review parsed from them
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub fields: Map<String, Value>,
    pub review: Review,
}

impl ReviewRecord {
    pub fn from_json_line(line: &str) -> Result<Self> {
        let fields: Map<String, Value> = serde_json::from_str(line)?;
        let review: Review = serde_json::from_value(Value::Object(fields.clone()))?;
        Ok(Self { fields, review })
    }

    /// Input fields extended with `issues` and `final_sentiment`
    pub fn to_output(&self, result: &ClassificationResult) -> Map<String, Value> {
        let mut fields = self.fields.clone();
        fields.insert(
            "issues".to_string(),
            Value::from(result.issues.clone()),
        );
        fields.insert(
            "final_sentiment".to_string(),
            Value::from(result.final_sentiment.as_str()),
        );
        fields
    }
}

/// Open a file, or stdin for "-"
pub fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("failed to open input {}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Create a file, or stdout when no path is given
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Parse every non-empty line; a malformed line aborts with its line number
pub fn read_records(reader: impl BufRead) -> Result<Vec<ReviewRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let record = ReviewRecord::from_json_line(&line)
            .with_context(|| format!("invalid review record on line {}", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Write one JSON object per line
pub fn write_jsonl<T: Serialize>(
    mut writer: impl Write,
    rows: impl IntoIterator<Item = T>,
) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut writer, &row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
