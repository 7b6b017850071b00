use crate::services::loader::SchemaError;

/// A parsed delimited table with a header row
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// A data row with its 1-based source line number
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

impl Table {
    /// Find a column by name, ignoring case and surrounding whitespace
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
    }

    /// Like [`Table::column`] but a missing column is a schema error
    pub fn require_column(&self, table: &str, name: &str) -> Result<usize, SchemaError> {
        self.column(name).ok_or_else(|| SchemaError::MissingColumn {
            table: table.to_string(),
            column: name.to_string(),
        })
    }
}

/// Parse delimited text whose first non-blank line is the header
///
/// Fields may be wrapped in double quotes to carry the delimiter; a doubled
/// quote inside a quoted field is a literal quote. Quoted fields cannot span
/// lines. Every data row must have as many fields as the header.
///
/// # Errors
///
/// Returns `SchemaError::EmptyTable` when there is no header,
/// `SchemaError::Malformed` for an unterminated quote and
/// `SchemaError::RowLength` for rows of the wrong width.
pub fn parse_table(table: &str, text: &str, delimiter: char) -> Result<Table, SchemaError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;
        let fields = split_fields(line, delimiter).ok_or_else(|| SchemaError::Malformed {
            table: table.to_string(),
            line: line_num,
            reason: "unterminated quoted field".to_string(),
        })?;

        match &headers {
            None => headers = Some(fields),
            Some(h) if h.len() != fields.len() => {
                return Err(SchemaError::RowLength {
                    table: table.to_string(),
                    line: line_num,
                    expected: h.len(),
                    found: fields.len(),
                });
            }
            Some(_) => rows.push(Row {
                line: line_num,
                fields,
            }),
        }
    }

    let headers = headers.ok_or_else(|| SchemaError::EmptyTable {
        table: table.to_string(),
    })?;

    Ok(Table { headers, rows })
}

/// Split one line into trimmed fields, or `None` if a quote never closes
fn split_fields(line: &str, delimiter: char) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return None;
    }

    fields.push(current.trim().to_string());
    Some(fields)
}
