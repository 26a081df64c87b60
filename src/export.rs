use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Output encodings for the display matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Array-of-columns JSON, the same shape a precomputed-frequencies
    /// consumer expects.
    Json,
    /// Binary PGM (P5) grayscale image.
    Pgm,
}

impl Format {
    /// Pick a format from the output file extension; anything but `.pgm`
    /// falls back to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("pgm") => Self::Pgm,
            _ => Self::Json,
        }
    }
}

pub fn write_matrix(path: &Path, matrix: &[Vec<u8>], format: Format) -> Result<()> {
    let bytes = match format {
        Format::Json => serde_json::to_vec(matrix).context("Failed to encode matrix as JSON")?,
        Format::Pgm => encode_pgm(matrix),
    };
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

/// Encode the matrix as a binary PGM image.
///
/// One pixel per intensity, brightness inverted (louder is darker) and rows
/// flipped so the lowest frequency sits at the bottom of the image.
fn encode_pgm(matrix: &[Vec<u8>]) -> Vec<u8> {
    let width = matrix.len();
    let height = matrix.first().map_or(0, Vec::len);

    let mut out = Vec::with_capacity(width * height + 32);
    // write! to a Vec<u8> cannot fail
    let _ = write!(out, "P5\n{width} {height}\n255\n");

    for row in (0..height).rev() {
        for column in matrix {
            out.push(255 - column[row]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_follows_the_extension() {
        assert_eq!(Format::from_path(&PathBuf::from("out.pgm")), Format::Pgm);
        assert_eq!(Format::from_path(&PathBuf::from("out.json")), Format::Json);
        assert_eq!(Format::from_path(&PathBuf::from("out")), Format::Json);
    }

    #[test]
    fn pgm_header_and_orientation() {
        // Two columns, two bins. Bin 1 (high freq) must come first.
        let matrix = vec![vec![0u8, 255], vec![100, 55]];
        let pgm = encode_pgm(&matrix);

        let header = b"P5\n2 2\n255\n";
        assert_eq!(&pgm[..header.len()], &header[..]);
        // Row order: bin 1 of both columns, then bin 0; values inverted.
        assert_eq!(&pgm[header.len()..], &[0u8, 200, 255, 155][..]);
    }
}
