//! One-way history exports: CSV and a printable HTML table.

use std::io;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::history::HistoryEntry;
use crate::time::{millis_to_date_string, millis_to_time_string};

const HEADERS: [&str; 4] = ["Expression", "Result", "Date", "Time"];

#[derive(Serialize)]
struct ExportRow<'a> {
    expression: &'a str,
    result: &'a str,
    date: String,
    time: String,
}

impl<'a> From<&'a HistoryEntry> for ExportRow<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            expression: &entry.expression,
            result: &entry.result,
            date: millis_to_date_string(entry.timestamp),
            time: millis_to_time_string(entry.timestamp),
        }
    }
}

/// CSV with a plain header line and every data field quoted. Entries are
/// written in the order given (history iterates newest first).
pub fn history_to_csv<'a>(
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
) -> Result<String, csv::Error> {
    let mut header = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(HEADERS)?;
    let buf = header.into_inner().map_err(|e| e.into_error())?;

    let mut rows = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buf);
    for entry in entries {
        rows.serialize(ExportRow::from(entry))?;
    }
    let bytes = rows.into_inner().map_err(|e| e.into_error())?;

    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Standalone HTML document with the same columns, suitable for printing.
pub fn history_to_html<'a>(
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
    generated_at: &str,
) -> String {
    let mut rows = String::new();
    for entry in entries {
        rows.push_str(&format!(
            "        <tr>\n          <td class=\"expression\">{}</td>\n          <td class=\"result\">{}</td>\n          <td>{}</td>\n          <td>{}</td>\n        </tr>\n",
            escape_html(&entry.expression),
            escape_html(&entry.result),
            millis_to_date_string(entry.timestamp),
            millis_to_time_string(entry.timestamp),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Calculator History</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 20px; }}
    h1 {{ color: #333; }}
    table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
    th, td {{ padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }}
    th {{ background-color: #f2f2f2; }}
    .expression {{ font-family: monospace; }}
    .result {{ font-weight: bold; }}
  </style>
</head>
<body>
  <h1>Calculator History</h1>
  <p>Generated on: {}</p>
  <table>
    <thead>
      <tr>
        <th>Expression</th>
        <th>Result</th>
        <th>Date</th>
        <th>Time</th>
      </tr>
    </thead>
    <tbody>
{}    </tbody>
  </table>
</body>
</html>
"#,
        escape_html(generated_at),
        rows
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
