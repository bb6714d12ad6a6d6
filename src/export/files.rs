//! Writing transcripts to disk.
//!
//! One file per series (`<slug>_roteiro.txt`) and one combined file for
//! every generated series (`todas_ideias_geradas.txt`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use super::transcript::{format_bulk, format_series};
use crate::domain::Series;

/// File name of the combined transcript
pub const BULK_FILE_NAME: &str = "todas_ideias_geradas.txt";

/// Suffix appended to every single-series file name
const SERIES_FILE_SUFFIX: &str = "_roteiro.txt";

/// File name for a series transcript.
///
/// ASCII letters and digits are kept (lowercased); anything else becomes
/// `_`, one per UTF-16 code unit.
pub fn series_file_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else {
            slug.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    slug + SERIES_FILE_SUFFIX
}

async fn write_text(dir: &Path, file_name: &str, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = dir.join(file_name);
    fs::write(&path, text)
        .await
        .with_context(|| format!("Failed to write transcript: {}", path.display()))?;

    tracing::debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(path)
}

/// Write the full transcript of one series into `dir`
pub async fn write_series_file(dir: &Path, series: &Series) -> Result<PathBuf> {
    write_text(dir, &series_file_name(&series.title), &format_series(series)).await
}

/// Write the combined transcript of `series` into `dir`
pub async fn write_bulk_file(dir: &Path, series: &[Series]) -> Result<PathBuf> {
    write_text(dir, BULK_FILE_NAME, &format_bulk(series)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Episode;
    use tempfile::TempDir;

    #[test]
    fn test_series_file_name_slug() {
        assert_eq!(
            series_file_name("OS 10 DESASTRES QUE MOLDARAM O DINHEIRO"),
            "os_10_desastres_que_moldaram_o_dinheiro_roteiro.txt"
        );
        assert_eq!(series_file_name("Crise & Pânico!"), "crise___p_nico__roteiro.txt");
        assert_eq!(series_file_name(""), "_roteiro.txt");
    }

    #[test]
    fn test_astral_characters_take_two_underscores() {
        assert_eq!(series_file_name("a📉b"), "a__b_roteiro.txt");
    }

    #[tokio::test]
    async fn test_write_series_file_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("roteiros");
        let series = Series::new("Bolhas", "D").with_episode(Episode::new("T", "H", "N", "K", "L"));

        let path = write_series_file(&dir, &series).await.unwrap();

        assert_eq!(path, dir.join("bolhas_roteiro.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format_series(&series));
    }

    #[tokio::test]
    async fn test_write_bulk_file() {
        let temp = TempDir::new().unwrap();
        let series = vec![Series::new("A", "a"), Series::new("B", "b")];

        let path = write_bulk_file(temp.path(), &series).await.unwrap();

        assert_eq!(path.file_name().unwrap(), BULK_FILE_NAME);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format_bulk(&series));
    }
}
