//! Plain-text storage of profiles.
//!
//! One profile per line, with samples separated by whitespace and/or commas.
//! Blank lines and lines starting with `#` are skipped.
use crate::Real;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    num::ParseFloatError,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileFileError {
    #[error("IO Error on {path}: {source}")]
    IO {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid sample '{token}' on line {line}: {source}")]
    InvalidSample {
        line: usize,
        token: String,
        source: ParseFloatError,
    },
}

fn parse_line(line_number: usize, line: &str) -> Result<Option<Vec<Real>>, ProfileFileError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Real>()
                .map_err(|source| ProfileFileError::InvalidSample {
                    line: line_number,
                    token: token.to_owned(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Reads every profile from `reader`, line numbers in errors are 1-based.
pub fn read_profiles<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Vec<Real>>, ProfileFileError> {
    let mut profiles = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ProfileFileError::IO {
            path: path.to_owned(),
            source,
        })?;
        if let Some(profile) = parse_line(index + 1, &line)? {
            profiles.push(profile);
        }
    }
    Ok(profiles)
}

pub fn load_profiles(path: &Path) -> Result<Vec<Vec<Real>>, ProfileFileError> {
    let file = File::open(path).map_err(|source| ProfileFileError::IO {
        path: path.to_owned(),
        source,
    })?;
    read_profiles(BufReader::new(file), path)
}

pub fn save_profiles<'a, I>(path: &Path, profiles: I) -> Result<(), ProfileFileError>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = &'a Real>,
{
    let io_error = |source| ProfileFileError::IO {
        path: path.to_owned(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    for profile in profiles {
        let line = profile
            .into_iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}").map_err(io_error)?;
    }
    writer.flush().map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# two profiles\n\n1.0 2.0, 3.0\n  \n4,5,6\n";
        let profiles = read_profiles(Cursor::new(text), Path::new("memory")).unwrap();
        assert_eq!(profiles, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn bad_token_reports_line() {
        let text = "1 2 3\n# comment\n4 five 6\n";
        let err = read_profiles(Cursor::new(text), Path::new("memory")).unwrap_err();
        match err {
            ProfileFileError::InvalidSample { line, token, .. } => {
                assert_eq!(line, 3);
                assert_eq!(token, "five");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.txt");
        let profiles = vec![vec![0.5, -1.25, 3.0], vec![1e-3, 2.0, 7.5]];
        save_profiles(&path, &profiles).unwrap();
        assert_eq!(load_profiles(&path).unwrap(), profiles);
    }

    #[test]
    fn missing_file() {
        let err = load_profiles(Path::new("/nonexistent/profiles.txt")).unwrap_err();
        assert!(matches!(err, ProfileFileError::IO { .. }));
    }
}
