//! Minimal CSV writer for report exports.
//!
//! Output is UTF-8 with a BOM so Arabic headers open correctly in Excel,
//! comma-delimited, one row per entity.

/// UTF-8 byte order mark.
pub const BOM: &str = "\u{feff}";

/// Quotes a field if it contains a delimiter, quote, or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Builds a CSV document from a header row and data rows.
pub fn write_csv(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from(BOM);

    out.push_str(
        &header
            .iter()
            .map(|f| escape(f))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push_str("\r\n");

    for row in rows {
        out.push_str(
            &row.iter()
                .map(|f| escape(f))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push_str("\r\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_bom() {
        let csv = write_csv(&["a"], &[]);
        assert!(csv.starts_with('\u{feff}'));
    }

    #[test]
    fn test_plain_fields_unquoted() {
        let csv = write_csv(&["اسم المرشح", "المحافظة"], &[vec!["أحمد".into(), "القاهرة".into()]]);
        assert!(csv.contains("اسم المرشح,المحافظة\r\n"));
        assert!(csv.contains("أحمد,القاهرة\r\n"));
    }

    #[test]
    fn test_comma_field_quoted() {
        let csv = write_csv(&["h"], &[vec!["a,b".into()]]);
        assert!(csv.contains("\"a,b\"\r\n"));
    }

    #[test]
    fn test_quote_field_doubled() {
        let csv = write_csv(&["h"], &[vec!["say \"hi\"".into()]]);
        assert!(csv.contains("\"say \"\"hi\"\"\"\r\n"));
    }

    #[test]
    fn test_newline_field_quoted() {
        let csv = write_csv(&["h"], &[vec!["line1\nline2".into()]]);
        assert!(csv.contains("\"line1\nline2\"\r\n"));
    }
}
