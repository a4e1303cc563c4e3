//! Projects records onto field paths and renders the delimited export.

use crate::core::value::Node;
use crate::domain::model::{FieldPath, Record, Row, Table};
use serde_json::Value;

pub const CELL_DELIMITER: char = ',';
const QUOTE: char = '"';

/// Walks `path` from the record root, stopping at the first absent step.
pub fn resolve<'a>(record: &'a Record, path: &FieldPath) -> Node<'a> {
    let mut current = Node::from(&record.data);
    for segment in path.segments() {
        if current.is_absent() {
            break;
        }
        current = current.descend(segment);
    }
    current
}

/// Text for one cell. Absent is empty, numbers and booleans are written
/// as-is, and text (including unflattened containers) is quote-escaped.
pub fn render_cell(node: Node<'_>) -> String {
    match node {
        Node::Absent => String::new(),
        Node::Scalar(Value::String(text)) => escape_text(text),
        Node::Scalar(other) => other.to_string(),
        Node::Map(map) => escape_text(&Value::Object(map.clone()).to_string()),
        Node::Sequence(items) => escape_text(&Value::Array(items.to_vec()).to_string()),
    }
}

/// Doubles quotes, then wraps the cell when it holds a comma or a quote.
pub fn escape_text(text: &str) -> String {
    let doubled = text.replace(QUOTE, "\"\"");
    if doubled.contains(CELL_DELIMITER) || doubled.contains(QUOTE) {
        format!("\"{}\"", doubled)
    } else {
        doubled
    }
}

impl Row {
    pub fn project(record: &Record, paths: &[FieldPath]) -> Self {
        Row(paths
            .iter()
            .map(|path| render_cell(resolve(record, path)))
            .collect())
    }

    pub fn to_line(&self) -> String {
        self.0.join(&CELL_DELIMITER.to_string())
    }
}

impl Table {
    pub fn project(records: &[Record], paths: &[FieldPath]) -> Self {
        Table {
            header: paths.iter().map(|p| p.as_str().to_string()).collect(),
            rows: records.iter().map(|r| Row::project(r, paths)).collect(),
        }
    }

    /// Header line then one line per row, joined by `\n` without a trailing newline.
    pub fn to_delimited(&self) -> String {
        let delimiter = CELL_DELIMITER.to_string();
        std::iter::once(self.header.join(&delimiter))
            .chain(self.rows.iter().map(Row::to_line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Convenience for callers holding raw column strings.
pub fn export_table(records: &[Record], columns: &[String]) -> String {
    let paths: Vec<FieldPath> = columns.iter().map(|c| FieldPath::parse(c)).collect();
    Table::project(records, &paths).to_delimited()
}
