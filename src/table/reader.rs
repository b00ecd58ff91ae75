//! Vector Store Loader
//!
//! Parses a delimited table into a [`Population`]. The first row is the
//! header: identifier column, then one name per feature. Every following
//! non-blank row is one entity. Nothing is returned unless every row parses.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use super::TableConfig;
use crate::error::{Error, FormatError, Result};
use crate::population::{Entity, FeatureVector, Header, Population, MISSING};

/// Load a population from a table file
pub fn load_path<P: AsRef<Path>>(path: P, config: &TableConfig) -> Result<Population> {
    let path = path.as_ref();
    debug!("Opening table {}", path.display());
    let file = File::open(path)?;
    load(BufReader::new(file), config)
}

/// Load a population from any buffered source
pub fn load<R: BufRead>(source: R, config: &TableConfig) -> Result<Population> {
    let mut lines = source.lines();

    let header_line = match lines.next() {
        Some(line) => read_line(line, 1)?,
        None => return Err(FormatError::MissingHeader.into()),
    };
    let header = parse_header(&header_line, config.delimiter)?;
    let width = header.dimension() + 1;

    let mut entities = Vec::new();
    for (offset, line) in lines.enumerate() {
        // header is line 1
        let line_no = offset + 2;
        let line = read_line(line, line_no)?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(config.delimiter).collect();
        if fields.len() != width {
            return Err(FormatError::FieldCount {
                line: line_no,
                expected: width,
                found: fields.len(),
            }
            .into());
        }

        let mut values = Vec::with_capacity(header.dimension());
        for (column, token) in header.features.iter().zip(&fields[1..]) {
            values.push(parse_value(token, &config.missing_token).ok_or_else(|| {
                FormatError::InvalidNumber {
                    line: line_no,
                    column: column.clone(),
                    token: token.to_string(),
                }
            })?);
        }

        entities.push(Entity::new(fields[0], FeatureVector::new(values)));
    }

    info!(
        "Loaded {} entities with {} features",
        entities.len(),
        header.dimension()
    );

    Population::new(header, entities)
}

/// Undecodable text is a malformed table, not an I/O failure
fn read_line(line: io::Result<String>, line_no: usize) -> Result<String> {
    line.map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => FormatError::InvalidEncoding { line: line_no }.into(),
        _ => Error::Io(e),
    })
}

fn parse_header(line: &str, delimiter: char) -> std::result::Result<Header, FormatError> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Err(FormatError::EmptyHeader);
    }

    let mut columns = line.split(delimiter).map(|c| c.trim().to_string());
    let id_column = columns.next().unwrap_or_default();
    if id_column.is_empty() {
        return Err(FormatError::EmptyHeader);
    }
    Ok(Header::new(id_column, columns.collect()))
}

/// Parse one feature token; `None` when it is not a finite float
fn parse_value(token: &str, missing_token: &str) -> Option<f64> {
    let token = token.trim();
    if token == missing_token {
        return Some(MISSING);
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn load_str(input: &str) -> Result<Population> {
        load(Cursor::new(input), &TableConfig::default())
    }

    #[test]
    fn test_load_basic() {
        let pop = load_str("user_id,s1_http_resp,s1_http_rate\nuser_1,1.5,2\nuser_2,-1,3.25\n")
            .unwrap();

        assert_eq!(pop.len(), 2);
        assert_eq!(pop.header().id_column, "user_id");
        assert_eq!(pop.header().features, vec!["s1_http_resp", "s1_http_rate"]);
        assert_eq!(pop.get(0).unwrap().features.as_slice(), &[1.5, 2.0]);
        assert_eq!(pop.get(1).unwrap().features.as_slice(), &[MISSING, 3.25]);
    }

    #[test]
    fn test_missing_token_trimmed() {
        let pop = load_str("id,a,b\nx,  -1 ,2\n").unwrap();
        assert_eq!(pop.get(0).unwrap().features.observed(), 1);
    }

    #[test]
    fn test_custom_missing_token() {
        let config = TableConfig::default().with_missing_token("NA");
        let pop = load(Cursor::new("id,a,b\nx,NA,2\n"), &config).unwrap();
        assert_eq!(pop.get(0).unwrap().features.as_slice(), &[MISSING, 2.0]);
    }

    #[test]
    fn test_missing_header() {
        let err = load_str("").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::MissingHeader)));
    }

    #[test]
    fn test_empty_header() {
        let err = load_str("\nuser_1,1,2\n").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::EmptyHeader)));
    }

    #[test]
    fn test_wrong_field_count() {
        let err = load_str("id,a,b\nx,1,2\ny,1\n").unwrap_err();
        assert!(err.is_format());
        assert!(matches!(
            err,
            Error::Format(FormatError::FieldCount {
                line: 3,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_invalid_number() {
        let err = load_str("id,a,b\nx,1,abc\n").unwrap_err();
        match err {
            Error::Format(FormatError::InvalidNumber {
                line,
                column,
                token,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "b");
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(load_str("id,a\nx,NaN\n").unwrap_err().is_format());
        assert!(load_str("id,a\nx,inf\n").unwrap_err().is_format());
    }

    #[test]
    fn test_duplicate_ids_accepted() {
        let pop = load_str("id,a\ndup,1\ndup,2\n").unwrap();
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.get(0).unwrap().id, "dup");
        assert_eq!(pop.get(1).unwrap().id, "dup");
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let pop = load_str("id,a\r\nx,1\r\n\r\ny,2\r\n").unwrap();
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.get(1).unwrap().features.as_slice(), &[2.0]);
    }

    #[test]
    fn test_identifier_verbatim() {
        let pop = load_str("id,a\n user 1 ,1\n").unwrap();
        assert_eq!(pop.get(0).unwrap().id, " user 1 ");
    }

    #[test]
    fn test_load_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user_id,f1").unwrap();
        writeln!(file, "user_1,0.5").unwrap();

        let pop = load_path(file.path(), &TableConfig::default()).unwrap();
        assert_eq!(pop.len(), 1);
    }

    #[test]
    fn test_load_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(dir.path().join("absent.csv"), &TableConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_blank_id_column_rejected() {
        for input in [",\nx,1\n", " , a,b\nx,1,2\n", ",,\n"] {
            let err = load_str(input).unwrap_err();
            assert!(
                matches!(err, Error::Format(FormatError::EmptyHeader)),
                "{:?}: {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let err = load(Cursor::new(b"id,a\nx,\xff1\n".to_vec()), &TableConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::InvalidEncoding { line: 2 })
        ));

        let err = load(Cursor::new(b"i\xffd,a\n".to_vec()), &TableConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::InvalidEncoding { line: 1 })
        ));
    }
}
