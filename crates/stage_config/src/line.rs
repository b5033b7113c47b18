/// Classifier for single document lines.
use crate::error::DocumentError;

/// One meaningful line of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// Blank or comment.
    Skip,
    /// `[name]`, with the name trimmed.
    Header(&'a str),
    /// `key = value`, both trimmed and the value unquoted.
    Assign { key: &'a str, value: &'a str },
}

/// Classify one line. `number` is 1-based and only used for errors.
pub fn classify(raw: &str, number: usize) -> Result<Line<'_>, DocumentError> {
    let text = raw.trim();

    if text.is_empty() || text.starts_with('#') || text.starts_with(';') {
        return Ok(Line::Skip);
    }

    if let Some(rest) = text.strip_prefix('[') {
        let Some(name) = rest.strip_suffix(']') else {
            return Err(DocumentError::syntax(number, "unterminated section header"));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(DocumentError::syntax(number, "empty section name"));
        }
        return Ok(Line::Header(name));
    }

    let Some((key, value)) = text.split_once('=') else {
        return Err(DocumentError::syntax(
            number,
            format!("expected `key = value`, got `{text}`"),
        ));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(DocumentError::syntax(number, "empty key"));
    }

    Ok(Line::Assign {
        key,
        value: unquote(value.trim()),
    })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blanks() {
        assert_eq!(classify("", 1).unwrap(), Line::Skip);
        assert_eq!(classify("   # note", 1).unwrap(), Line::Skip);
        assert_eq!(classify("; note", 1).unwrap(), Line::Skip);
    }

    #[test]
    fn test_header() {
        assert_eq!(classify(" [ Main ] ", 1).unwrap(), Line::Header("Main"));
        assert!(classify("[main", 4).is_err());
        assert!(classify("[  ]", 4).is_err());
    }

    #[test]
    fn test_assignment_unquotes_value() {
        assert_eq!(
            classify("pos = \"10 20 0\"", 1).unwrap(),
            Line::Assign {
                key: "pos",
                value: "10 20 0"
            }
        );
        // Only the value is split off; further `=` belong to it.
        assert_eq!(
            classify("note=a=b", 1).unwrap(),
            Line::Assign {
                key: "note",
                value: "a=b"
            }
        );
    }

    #[test]
    fn test_garbage_reports_line() {
        let err = classify("just words", 9).unwrap_err();
        assert!(err.to_string().starts_with("line 9:"));
        assert!(classify(" = value", 2).is_err());
    }
}
