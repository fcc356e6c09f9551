//! Console implementations

use std::io::{self, Write};
use std::sync::RwLock;

use serde_json::Value;

use super::{Console, Emission, Payload};
use crate::error::{LoggerError, Result};
use crate::method::ConsoleMethod;

/// Writes to stdout, or stderr for `warn` and `error`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl StdConsole {
    fn write_payload(out: &mut impl Write, payload: &Payload) -> io::Result<()> {
        match payload {
            Payload::Lines(lines) => {
                for line in lines {
                    writeln!(out, "{}", line)?;
                }
            }
            Payload::Table {
                reporter_name,
                rows,
            } => {
                writeln!(out, "{}", reporter_name)?;
                for line in format_table(rows) {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        out.flush()
    }

    /// Write `emission` to `err` for alert methods, `out` otherwise
    fn route(emission: &Emission, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        if emission.method.is_alert() {
            Self::write_payload(err, &emission.payload)
        } else {
            Self::write_payload(out, &emission.payload)
        }
    }
}

impl Console for StdConsole {
    fn emit(&self, emission: &Emission) -> Result<()> {
        // Best effort: a closed pipe must not take the caller down
        let result = Self::route(
            emission,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        );
        if let Err(e) = result {
            tracing::debug!("Console write failed: {}", e);
        }
        Ok(())
    }
}

/// Lay out values as a plain-text table
///
/// Arrays contribute one row per element, objects one row per entry, and
/// anything else a single row. Object rows get one column per key; other rows
/// land in a `Values` column.
pub fn format_table(values: &[Value]) -> Vec<String> {
    let mut rows: Vec<(String, &Value)> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Value::Array(items) => {
                rows.extend(items.iter().enumerate().map(|(j, v)| (j.to_string(), v)));
            }
            Value::Object(map) => rows.extend(map.iter().map(|(k, v)| (k.clone(), v))),
            other => rows.push((i.to_string(), other)),
        }
    }

    let mut columns: Vec<String> = Vec::new();
    let mut has_values = false;
    for (_, value) in &rows {
        match value {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
            _ => has_values = true,
        }
    }

    let mut header = vec!["(index)".to_string()];
    header.extend(columns.iter().cloned());
    if has_values {
        header.push("Values".to_string());
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|(index, value)| {
            let mut row = vec![index.clone()];
            match value {
                Value::Object(map) => {
                    row.extend(columns.iter().map(|c| map.get(c).map(cell).unwrap_or_default()));
                    if has_values {
                        row.push(String::new());
                    }
                }
                other => {
                    row.extend(columns.iter().map(|_| String::new()));
                    row.push(cell(other));
                }
            }
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(cells.iter())
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    // Trailing empty cells would leave a dangling separator
    let format_row = |row: &[String]| {
        let len = row.iter().rposition(|c| !c.is_empty()).map_or(1, |i| i + 1);
        row[..len]
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![format_row(header.as_slice())];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.extend(cells.iter().map(|row| format_row(row.as_slice())));
    out
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Captures emissions in memory
///
/// Useful for tests and for embedding applications that render log output
/// themselves.
#[derive(Debug)]
pub struct MemoryConsole {
    emissions: RwLock<Vec<Emission>>,
    supported: Vec<ConsoleMethod>,
}

impl Default for MemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConsole {
    /// Console supporting every method
    pub fn new() -> Self {
        Self::with_methods(&ConsoleMethod::ALL)
    }

    /// Console that only provides `methods`
    pub fn with_methods(methods: &[ConsoleMethod]) -> Self {
        Self {
            emissions: RwLock::new(Vec::new()),
            supported: methods.to_vec(),
        }
    }

    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions
            .read()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// All rendered lines sent through `method`
    pub fn lines(&self, method: ConsoleMethod) -> Vec<String> {
        self.emissions()
            .into_iter()
            .filter(|e| e.method == method)
            .flat_map(|e| match e.payload {
                Payload::Lines(lines) => lines,
                Payload::Table { .. } => Vec::new(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.emissions.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut emissions) = self.emissions.write() {
            emissions.clear();
        }
    }
}

impl Console for MemoryConsole {
    fn emit(&self, emission: &Emission) -> Result<()> {
        if !self.supported.contains(&emission.method) {
            return Err(LoggerError::unsupported(emission.method.as_str()));
        }
        if let Ok(mut emissions) = self.emissions.write() {
            emissions.push(emission.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(method: ConsoleMethod, lines: &[&str]) -> Emission {
        Emission {
            method,
            payload: Payload::Lines(lines.iter().map(|l| l.to_string()).collect()),
        }
    }

    #[test]
    fn test_memory_console_captures() {
        let console = MemoryConsole::new();
        console.emit(&lines(ConsoleMethod::Error, &["a", "b"])).unwrap();
        console.emit(&lines(ConsoleMethod::Log, &["c"])).unwrap();

        assert_eq!(console.len(), 2);
        assert_eq!(console.lines(ConsoleMethod::Error), vec!["a", "b"]);
        assert_eq!(console.lines(ConsoleMethod::Log), vec!["c"]);

        console.clear();
        assert!(console.is_empty());
    }

    #[test]
    fn test_memory_console_rejects_missing_method() {
        let console = MemoryConsole::with_methods(&[ConsoleMethod::Log]);
        let err = console.emit(&lines(ConsoleMethod::Table, &["x"])).unwrap_err();
        assert!(matches!(err, LoggerError::UnsupportedMethod { method } if method == "table"));
        assert!(console.is_empty());
    }

    #[test]
    fn test_std_console_writes_table() {
        let mut out = Vec::new();
        StdConsole::write_payload(
            &mut out,
            &Payload::Table {
                reporter_name: "logger".to_string(),
                rows: vec![json!(1)],
            },
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("logger\n(index) | Values\n"));
    }

    #[test]
    fn test_std_console_routes_alerts_to_stderr() {
        for method in ConsoleMethod::ALL {
            let (mut out, mut err) = (Vec::new(), Vec::new());
            StdConsole::route(&lines(method, &["line"]), &mut out, &mut err).unwrap();

            let (written, untouched) = if method.is_alert() {
                (err, out)
            } else {
                (out, err)
            };
            assert_eq!(written, b"line\n", "{}", method);
            assert!(untouched.is_empty(), "{}", method);
        }
    }

    #[test]
    fn test_format_table_mixed_rows_drop_trailing_separator() {
        let table = format_table(&[json!({"a": {"x": 1}, "b": 5})]);
        assert_eq!(
            table,
            vec![
                "(index) | x | Values",
                "--------+---+-------",
                "a       | 1",
                "b       |   | 5",
            ]
        );
    }

    #[test]
    fn test_format_table_scalars() {
        let table = format_table(&[json!("a"), json!(22)]);
        assert_eq!(
            table,
            vec![
                "(index) | Values",
                "--------+-------",
                "0       | a",
                "1       | 22",
            ]
        );
    }

    #[test]
    fn test_format_table_objects() {
        let table = format_table(&[json!([{"id": 1, "name": "disk"}, {"id": 2}])]);
        assert_eq!(
            table,
            vec![
                "(index) | id | name",
                "--------+----+-----",
                "0       | 1  | disk",
                "1       | 2",
            ]
        );
    }
}
