//! Quote-aware CSV parsing.
//!
//! A small tokenizer plus a row assembler exposing a lazy sequence of
//! rows. The dialect is the one published catalog sheets actually use:
//!
//! - separator auto-detected between `;` and `,` on the header line;
//! - fields may be wrapped in double quotes; a doubled quote inside a
//!   quoted field decodes to a literal quote; separators and newlines
//!   inside quotes do not split;
//! - a leading UTF-8 BOM is stripped; blank lines are skipped.
//!
//! [`records`] additionally zips rows with the header: when a row has
//! more fields than the header (an unquoted separator in the trailing
//! description column), the surplus is folded back into the last field.

use std::sync::Arc;

/// Detect the separator from the header line: whichever of `;` and `,`
/// occurs more often, comma on a tie.
#[must_use]
pub fn detect_separator(header: &str) -> char {
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { ';' } else { ',' }
}

/// Lazy iterator over CSV rows.
pub struct Rows<'a> {
    rest: &'a str,
    separator: char,
}

/// Parse `text` into rows, detecting the separator from the first line.
#[must_use]
pub fn rows(text: &str) -> Rows<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header = text.lines().next().unwrap_or("");
    Rows {
        rest: text,
        separator: detect_separator(header),
    }
}

impl Rows<'_> {
    /// Consume one record from the input, honoring quoted newlines.
    fn parse_record(&mut self) -> Option<Vec<String>> {
        if self.rest.is_empty() {
            return None;
        }

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = self.rest.char_indices().peekable();

        while let Some((_, ch)) = chars.next() {
            if in_quotes {
                if ch == '"' {
                    if let Some(&(_, '"')) = chars.peek() {
                        // doubled quote decodes to a literal quote
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(ch);
                }
            } else if ch == '"' && field.is_empty() {
                in_quotes = true;
            } else if ch == self.separator {
                fields.push(std::mem::take(&mut field));
            } else if ch == '\n' || ch == '\r' {
                // swallow a \r\n pair
                if ch == '\r' {
                    if let Some(&(_, '\n')) = chars.peek() {
                        chars.next();
                    }
                }
                let consumed = match chars.peek() {
                    Some(&(next_pos, _)) => next_pos,
                    None => self.rest.len(),
                };
                fields.push(field);
                self.rest = self.rest.get(consumed..).unwrap_or("");
                return Some(fields);
            } else {
                field.push(ch);
            }
        }

        fields.push(field);
        self.rest = "";
        Some(fields)
    }
}

impl Iterator for Rows<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.parse_record()?;
            let blank = record.iter().all(|f| f.trim().is_empty());
            if !blank {
                return Some(record);
            }
        }
    }
}

/// A row zipped with its header names.
#[derive(Debug, Clone)]
pub struct Record {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Field value by header name, trimmed. Empty string for missing
    /// columns.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|index| self.values.get(index))
            .map_or("", |value| value.trim())
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Lazy iterator over header-zipped records.
pub struct Records<'a> {
    headers: Arc<[String]>,
    rows: Rows<'a>,
    separator: char,
}

/// Parse `text` into records using the first row as the header.
#[must_use]
pub fn records(text: &str) -> Records<'_> {
    let mut rows = rows(text);
    let separator = rows.separator;
    let headers: Arc<[String]> = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|h| h.trim().to_owned())
        .collect();
    Records {
        headers,
        rows,
        separator,
    }
}

impl Records<'_> {
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let mut values = self.rows.next()?;
        let width = self.headers.len();

        // Fold surplus columns back into the final field.
        if values.len() > width && width > 0 {
            let tail = values.split_off(width - 1);
            values.push(tail.join(&self.separator.to_string()));
        }
        while values.len() < width {
            values.push(String::new());
        }

        Some(Record {
            headers: Arc::clone(&self.headers),
            values,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_separator() {
        assert_eq!(detect_separator("a;b;c"), ';');
        assert_eq!(detect_separator("a,b,c"), ',');
        assert_eq!(detect_separator("a;b,c,d"), ',');
        assert_eq!(detect_separator("plain"), ',');
    }

    #[test]
    fn test_simple_rows() {
        let parsed: Vec<_> = rows("a,b,c\n1,2,3\n").collect();
        assert_eq!(parsed, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_semicolon_rows() {
        let parsed: Vec<_> = rows("a;b\n1;2").collect();
        assert_eq!(parsed, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_doubled_quotes_decode() {
        let parsed: Vec<_> = rows("a,b\n\"say \"\"hola\"\"\",2").collect();
        assert_eq!(parsed[1][0], "say \"hola\"");
    }

    #[test]
    fn test_separator_inside_quotes() {
        let parsed: Vec<_> = rows("a,b\n\"uno, dos\",3").collect();
        assert_eq!(parsed[1], vec!["uno, dos", "3"]);
    }

    #[test]
    fn test_newline_inside_quotes() {
        let parsed: Vec<_> = rows("a,b\n\"linea 1\nlinea 2\",x").collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1][0], "linea 1\nlinea 2");
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let parsed: Vec<_> = rows("\u{feff}a,b\n\n1,2\n   \n").collect();
        assert_eq!(parsed, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_crlf() {
        let parsed: Vec<_> = rows("a,b\r\n1,2\r\n").collect();
        assert_eq!(parsed, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_records_by_header() {
        let mut recs = records("Codigo;Nombre;Precio\nP1;Pan;250");
        let first = recs.next().unwrap();
        assert_eq!(first.get("Codigo"), "P1");
        assert_eq!(first.get("Nombre"), "Pan");
        assert_eq!(first.get("Precio"), "250");
        assert_eq!(first.get("Inexistente"), "");
        assert!(recs.next().is_none());
    }

    #[test]
    fn test_records_fold_surplus_into_last_field() {
        // Unquoted separator in the trailing description column.
        let mut recs = records("Codigo,Descripcion\nP1,rico, sano, integral");
        let first = recs.next().unwrap();
        assert_eq!(first.get("Descripcion"), "rico, sano, integral");
    }

    #[test]
    fn test_records_pad_short_rows() {
        let mut recs = records("a,b,c\n1,2");
        let first = recs.next().unwrap();
        assert_eq!(first.values(), &["1", "2", ""]);
    }

    #[test]
    fn test_rows_are_lazy() {
        // Only the header and the first record are consumed.
        let text = "a,b\n1,2\n3,4\n";
        let mut iter = rows(text);
        assert_eq!(iter.next().unwrap(), vec!["a", "b"]);
        assert_eq!(iter.next().unwrap(), vec!["1", "2"]);
    }
}
