//! # Export — Writing M_p in Decimal
//!
//! Serializes M_p = 2^p − 1 to a text file in base 10 followed by a newline.
//! This is independent of the LL engine: it shares no state with a running
//! test and either can fail without affecting the other.
//!
//! ## Atomic Writes
//!
//! The digits are written to `<path>.partial` and renamed into place, so the
//! destination either holds the complete number or is left as it was.
//!
//! ## Size Cap
//!
//! 2^p − 1 has exactly ⌊p·log10 2⌋ + 1 decimal digits (2^p is never a power
//! of 10), so oversized requests are refused before any big-integer work.

use rug::Integer;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ExportError;

/// Default cap on exported digits (about 5 MB of text).
pub const DEFAULT_MAX_DIGITS: u64 = 5_000_000;

/// Metadata describing a written decimal file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecimalExport {
    pub exponent: u32,
    pub path: PathBuf,
    /// Exact count of digits written (newline excluded).
    pub digits: u64,
    /// File size in bytes, newline included.
    pub bytes: u64,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
}

/// Decimal digit count of 2^p − 1, from p alone.
pub fn estimate_digits(p: u32) -> u64 {
    if p == 0 {
        return 1;
    }
    (p as f64 * std::f64::consts::LOG10_2) as u64 + 1
}

/// Write M_p to `path` with the default digit cap.
pub fn write_mersenne_decimal(p: u32, path: &Path) -> Result<DecimalExport, ExportError> {
    write_mersenne_decimal_with_limit(p, path, DEFAULT_MAX_DIGITS)
}

/// Write M_p to `path`, refusing numbers with more than `max_digits` digits.
pub fn write_mersenne_decimal_with_limit(
    p: u32,
    path: &Path,
    max_digits: u64,
) -> Result<DecimalExport, ExportError> {
    if p < 1 {
        return Err(ExportError::InvalidExponent { p });
    }
    let estimated = estimate_digits(p);
    if estimated > max_digits {
        return Err(ExportError::TooLarge {
            p,
            digits: estimated,
            limit: max_digits,
        });
    }

    let m = Integer::from(Integer::u_pow_u(2, p)) - 1u32;
    let text = m.to_string_radix(10);

    let partial = partial_path(path);
    if let Err(source) = write_text(&partial, &text) {
        let _ = fs::remove_file(&partial);
        return Err(ExportError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    fs::rename(&partial, path).map_err(|source| {
        let _ = fs::remove_file(&partial);
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let sha256 = sha256_file(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let export = DecimalExport {
        exponent: p,
        path: path.to_path_buf(),
        digits: text.len() as u64,
        bytes: text.len() as u64 + 1,
        sha256,
    };
    info!(p, digits = export.digits, path = %path.display(), "wrote decimal expansion");
    Ok(export)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_os_string();
    s.push(".partial");
    PathBuf::from(s)
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(text.as_bytes())?;
    out.write_all(b"\n")?;
    out.into_inner().map_err(|e| e.into_error())?.sync_all()
}

/// Hex SHA-256 of a file, streamed in 64 KiB chunks.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1 << 16];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
