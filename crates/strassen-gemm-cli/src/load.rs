//! Matrix loading from `.npy` array files and delimited text.
//!
//! `.npy` layout (version 1.x/2.x):
//! - 6-byte magic (`\x93NUMPY`)
//! - 1-byte major, 1-byte minor version
//! - header length (u16 LE for v1, u32 LE for v2+)
//! - ASCII header dict: `{'descr': '<f4', 'fortran_order': False, 'shape': (r, c), }`
//! - raw element data
//!
//! Payloads in `<f8`, `<i4` or `<i8` are coerced to `f32` with a printed
//! notification; anything else is rejected.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use strassen_gemm::Mat;

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Load a matrix from `path`, dispatching on the file extension.
///
/// `.npy` is parsed as a binary array file; `.csv` as comma-separated rows;
/// `.txt` and `.dat` as whitespace-separated rows. Any other extension is
/// probed for the npy magic first and read as text otherwise.
///
/// The matrix must be exactly `expected x expected`; other shapes are
/// rejected.
pub fn load_matrix(path: &Path, expected: usize) -> Result<Mat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let mat = match ext.as_deref() {
        Some("npy") => load_npy(path)?,
        Some("csv") => load_text(path, Some(','))?,
        Some("txt") | Some("dat") => load_text(path, None)?,
        _ => {
            // mirror numpy's loadtxt/load fallback: binary probe, then text
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            if bytes.starts_with(NPY_MAGIC) {
                parse_npy(&bytes).with_context(|| format!("parsing {}", path.display()))?
            } else {
                load_text(path, None)?
            }
        }
    };

    if mat.shape() != (expected, expected) {
        bail!(
            "matrix must be {}x{}, got {}x{}",
            expected,
            expected,
            mat.nrows(),
            mat.ncols()
        );
    }
    Ok(mat)
}

fn load_npy(path: &Path) -> Result<Mat> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_npy(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn parse_npy(bytes: &[u8]) -> Result<Mat> {
    if bytes.len() < 10 || &bytes[..6] != NPY_MAGIC {
        bail!("not an npy file (bad magic)");
    }
    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => {
            let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
            (len, 10)
        }
        2 | 3 => {
            if bytes.len() < 12 {
                bail!("truncated npy header");
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12)
        }
        _ => bail!("unsupported npy version {}", major),
    };
    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        bail!("truncated npy header");
    }
    let header = std::str::from_utf8(&bytes[header_start..data_start])
        .context("npy header is not valid ASCII")?;

    let descr = header_field(header, "descr").context("npy header missing 'descr'")?;
    let fortran = header_field(header, "fortran_order").context("npy header missing 'fortran_order'")?;
    let (rows, cols) = parse_shape(header).context("npy header missing 'shape'")?;

    if fortran != "False" {
        bail!("fortran-order npy arrays are not supported");
    }

    let payload = &bytes[data_start..];
    let data = decode_payload(&descr, payload, rows * cols)?;
    Ok(Mat::from_vec(data, rows, cols))
}

/// Extract a `'key': value` field from the header dict.
fn header_field(header: &str, key: &str) -> Option<String> {
    let pattern = format!("'{}':", key);
    let rest = &header[header.find(&pattern)? + pattern.len()..];
    let rest = rest.trim_start();
    if let Some(stripped) = rest.strip_prefix('\'') {
        // quoted string value
        Some(stripped[..stripped.find('\'')?].to_string())
    } else {
        let end = rest.find([',', '}'])?;
        Some(rest[..end].trim().to_string())
    }
}

fn parse_shape(header: &str) -> Option<(usize, usize)> {
    let open = header.find("'shape':")?;
    let rest = &header[open..];
    let lparen = rest.find('(')?;
    let rparen = rest.find(')')?;
    let dims: Vec<usize> = rest[lparen + 1..rparen]
        .split(',')
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(|d| d.parse().ok())
        .collect::<Option<_>>()?;
    if dims.len() == 2 {
        Some((dims[0], dims[1]))
    } else {
        None
    }
}

fn decode_payload(descr: &str, payload: &[u8], count: usize) -> Result<Vec<f32>> {
    // accept native-order markers for single-byte-agnostic readers
    let descr = descr.trim_start_matches(['<', '=', '|']);
    if descr.starts_with('>') {
        bail!("big-endian npy data is not supported");
    }

    fn chunks<const W: usize>(payload: &[u8], count: usize, ty: &str) -> Result<Vec<[u8; W]>> {
        if payload.len() < count * W {
            bail!("npy payload too short for {} {} elements", count, ty);
        }
        Ok(payload[..count * W]
            .chunks_exact(W)
            .map(|c| c.try_into().expect("chunk width"))
            .collect())
    }

    let data = match descr {
        "f4" => chunks::<4>(payload, count, "f4")?
            .into_iter()
            .map(f32::from_le_bytes)
            .collect(),
        "f8" => {
            println!("  converting dtype from float64 to float32");
            chunks::<8>(payload, count, "f8")?
                .into_iter()
                .map(|c| f64::from_le_bytes(c) as f32)
                .collect()
        }
        "i4" => {
            println!("  converting dtype from int32 to float32");
            chunks::<4>(payload, count, "i4")?
                .into_iter()
                .map(|c| i32::from_le_bytes(c) as f32)
                .collect()
        }
        "i8" => {
            println!("  converting dtype from int64 to float32");
            chunks::<8>(payload, count, "i8")?
                .into_iter()
                .map(|c| i64::from_le_bytes(c) as f32)
                .collect()
        }
        other => bail!("unsupported npy dtype '{}'", other),
    };
    Ok(data)
}

fn load_text(path: &Path, delimiter: Option<char>) -> Result<Mat> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let mut data = Vec::new();
    let mut cols = None;
    let mut rows = 0;
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let values: Vec<f32> = match delimiter {
            Some(d) => line
                .split(d)
                .map(|v| v.trim().parse())
                .collect::<Result<_, _>>(),
            None => line
                .split_whitespace()
                .map(|v| v.parse())
                .collect::<Result<_, _>>(),
        }
        .with_context(|| format!("line {}: invalid number", lineno + 1))?;

        match cols {
            None => cols = Some(values.len()),
            Some(c) if c != values.len() => {
                bail!("line {}: expected {} columns, got {}", lineno + 1, c, values.len())
            }
            _ => {}
        }
        data.extend(values);
        rows += 1;
    }

    let cols = cols.unwrap_or(0);
    if rows == 0 || cols == 0 {
        bail!("{} contains no data", path.display());
    }
    Ok(Mat::from_vec(data, rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_npy(dir: &tempfile::TempDir, name: &str, descr: &str, rows: usize, cols: usize, payload: &[u8]) -> std::path::PathBuf {
        let header = format!(
            "{{'descr': '{}', 'fortran_order': False, 'shape': ({}, {}), }}",
            descr, rows, cols
        );
        // pad so that magic + prefix + header is a multiple of 64, as numpy does
        let mut header = header.into_bytes();
        let unpadded = 10 + header.len() + 1;
        header.extend(std::iter::repeat(b' ').take((64 - unpadded % 64) % 64));
        header.push(b'\n');

        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(NPY_MAGIC).unwrap();
        file.write_all(&[1, 0]).unwrap();
        file.write_all(&(header.len() as u16).to_le_bytes()).unwrap();
        file.write_all(&header).unwrap();
        file.write_all(payload).unwrap();
        path
    }

    #[test]
    fn test_npy_f32_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let values: Vec<f32> = (0..16).map(|i| i as f32 * 0.5).collect();
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let path = write_npy(&dir, "m.npy", "<f4", 4, 4, &payload);

        let mat = load_matrix(&path, 4).unwrap();
        assert_eq!(mat.as_slice(), values.as_slice());
    }

    #[test]
    fn test_npy_f64_coerced() {
        let dir = tempfile::tempdir().unwrap();
        let values: Vec<f64> = (0..16).map(|i| i as f64 - 8.0).collect();
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let path = write_npy(&dir, "m.npy", "<f8", 4, 4, &payload);

        let mat = load_matrix(&path, 4).unwrap();
        assert_eq!(mat[(0, 0)], -8.0);
        assert_eq!(mat[(3, 3)], 7.0);
    }

    #[test]
    fn test_npy_wrong_shape_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let payload: Vec<u8> = (0..8).flat_map(|i| (i as f32).to_le_bytes()).collect();
        let path = write_npy(&dir, "m.npy", "<f4", 2, 4, &payload);

        let err = load_matrix(&path, 4).unwrap_err();
        assert!(err.to_string().contains("must be 4x4"));
    }

    #[test]
    fn test_npy_bad_magic_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.npy");
        fs::write(&path, b"not an npy file at all").unwrap();
        assert!(load_matrix(&path, 4).is_err());
    }

    #[test]
    fn test_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        fs::write(&path, "1.0, 2.0\n3.0, 4.0\n").unwrap();

        let mat = load_matrix(&path, 2).unwrap();
        assert_eq!(mat.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_whitespace_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        fs::write(&path, "1 2 3\n4 5 6\n7 8 9\n").unwrap();

        let mat = load_matrix(&path, 3).unwrap();
        assert_eq!(mat[(2, 1)], 8.0);
    }

    #[test]
    fn test_text_ragged_rows_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        fs::write(&path, "1 2 3\n4 5\n").unwrap();
        assert!(load_matrix(&path, 3).is_err());
    }

    #[test]
    fn test_unknown_extension_probes_magic() {
        let dir = tempfile::tempdir().unwrap();
        let values: Vec<f32> = (0..4).map(|i| i as f32).collect();
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let npy_path = write_npy(&dir, "m.bin", "<f4", 2, 2, &payload);
        assert!(load_matrix(&npy_path, 2).is_ok());

        let text_path = dir.path().join("t.bin");
        fs::write(&text_path, "1 2\n3 4\n").unwrap();
        assert!(load_matrix(&text_path, 2).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_matrix(&dir.path().join("absent.npy"), 4).is_err());
    }
}
