//! Table Writer
//!
//! Renders a population in the format the loader reads back.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::TableConfig;
use crate::error::{Error, Result};
use crate::population::{is_missing, Population};

/// Write a population as a delimited table
pub fn write<W: Write>(population: &Population, config: &TableConfig, out: &mut W) -> Result<()> {
    let header = population.header();
    write!(out, "{}", header.id_column)?;
    for column in &header.features {
        write!(out, "{}{}", config.delimiter, column)?;
    }
    writeln!(out)?;

    for entity in population.iter() {
        write!(out, "{}", entity.id)?;
        for &value in entity.features.iter() {
            if is_missing(value) {
                write!(out, "{}{}", config.delimiter, config.missing_token)?;
            } else {
                write!(out, "{}{}", config.delimiter, render_value(value, config)?)?;
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Render an observed value at the configured precision
///
/// A value that rounds to the missing token or to -1.0 is written in full
/// so it reloads as the same observation. A value whose full form is still
/// the missing token cannot be represented and is rejected.
fn render_value(value: f64, config: &TableConfig) -> Result<String> {
    let rounded = format!("{:.*}", config.precision, value);
    if !reads_as_missing(&rounded, config) {
        return Ok(rounded);
    }

    let full = value.to_string();
    if reads_as_missing(&full, config) {
        return Err(Error::InvalidConfig(format!(
            "value {} is indistinguishable from missing token {:?}",
            value, config.missing_token
        )));
    }
    Ok(full)
}

fn reads_as_missing(token: &str, config: &TableConfig) -> bool {
    let token = token.trim();
    token == config.missing_token || token.parse::<f64>().is_ok_and(is_missing)
}

/// Write a population to a file, replacing any existing one
pub fn save_path<P: AsRef<Path>>(population: &Population, config: &TableConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write(population, config, &mut out)?;
    out.flush()?;

    info!(
        "Saved {} entities x {} features to {}",
        population.len(),
        population.dimension(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{Entity, Header, MISSING};
    use crate::table::{load, load_path};
    use std::io::Cursor;

    fn sample() -> Population {
        let header = Header::new("user_id", vec!["s1_db_lat".into(), "s1_db_err".into()]);
        Population::new(
            header,
            vec![
                Entity::new("user_1", vec![120.123456, MISSING]),
                Entity::new("user_2", vec![0.0, 3.5]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_format() {
        let mut buf = Vec::new();
        write(&sample(), &TableConfig::default(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "user_id,s1_db_lat,s1_db_err\nuser_1,120.1235,-1\nuser_2,0.0000,3.5000\n"
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.tsv");
        let config = TableConfig::default().with_delimiter('\t');

        save_path(&sample(), &config, &path).unwrap();
        let loaded = load_path(&path, &config).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.header(), sample().header());
        assert_eq!(loaded.get(0).unwrap().features.as_slice(), &[120.1235, MISSING]);
    }

    #[test]
    fn test_values_near_sentinel_keep_observation() {
        let header = Header::new("user_id", vec!["a".into(), "b".into(), "c".into()]);
        let pop = Population::new(
            header,
            vec![
                Entity::new("t", vec![-0.99999, 2.0, MISSING]),
                Entity::new("u", vec![-1.00004, -1.2, 0.5]),
            ],
        )
        .unwrap();

        let mut buf = Vec::new();
        write(&pop, &TableConfig::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("t,-0.99999,2.0000,-1\n"), "{}", text);

        let reloaded = load(Cursor::new(text), &TableConfig::default()).unwrap();
        for (before, after) in pop.iter().zip(reloaded.iter()) {
            assert_eq!(before.features.observed(), after.features.observed());
        }
        assert_eq!(reloaded.get(0).unwrap().features[0], -0.99999);
        assert_eq!(reloaded.get(1).unwrap().features[0], -1.00004);
    }

    #[test]
    fn test_zero_precision_avoids_missing_token() {
        let header = Header::new("user_id", vec!["a".into(), "b".into()]);
        let pop = Population::new(header, vec![Entity::new("t", vec![-1.2, 3.4])]).unwrap();
        let config = TableConfig::default().with_precision(0);

        let mut buf = Vec::new();
        write(&pop, &config, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "user_id,a,b\nt,-1.2,3\n");

        let reloaded = load(Cursor::new(text), &config).unwrap();
        assert_eq!(reloaded.get(0).unwrap().features.observed(), 2);
    }

    #[test]
    fn test_value_equal_to_custom_token_rejected() {
        let header = Header::new("user_id", vec!["a".into()]);
        let pop = Population::new(header, vec![Entity::new("t", vec![0.5])]).unwrap();
        let config = TableConfig::default()
            .with_missing_token("0.5")
            .with_precision(1);

        let mut buf = Vec::new();
        let err = write(&pop, &config, &mut buf).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
