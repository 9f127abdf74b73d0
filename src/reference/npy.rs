// Minimal reader for 2-D NumPy `.npy` arrays.
//
// Supports format versions 1.0-3.0, little-endian float32/float64 in C
// order, which is what `np.save` produces for an embedding matrix.
// Values are returned as f32 in row-major order.

use anyhow::{Context, Result};

const MAGIC: &[u8] = b"\x93NUMPY";

/// A decoded 2-D matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyMatrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dtype {
    F32,
    F64,
}

impl Dtype {
    fn width(self) -> usize {
        match self {
            Dtype::F32 => 4,
            Dtype::F64 => 8,
        }
    }
}

/// Parse an in-memory `.npy` file.
pub fn parse(bytes: &[u8]) -> Result<NpyMatrix> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        anyhow::bail!("Not a NumPy .npy file (bad magic)");
    }

    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                anyhow::bail!("Truncated .npy header");
            }
            (
                u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
                12,
            )
        }
        v => anyhow::bail!("Unsupported .npy format version {v}"),
    };

    let data_start = header_start + header_len;
    let header = bytes
        .get(header_start..data_start)
        .context("Truncated .npy header")?;
    let header = std::str::from_utf8(header).context(".npy header is not valid text")?;

    let dtype = match header_value(header, "descr")? {
        "'<f4'" | "'float32'" => Dtype::F32,
        "'<f8'" | "'float64'" => Dtype::F64,
        other => anyhow::bail!("Unsupported .npy dtype {other} (expected <f4 or <f8)"),
    };

    if header_value(header, "fortran_order")? != "False" {
        anyhow::bail!("Fortran-ordered .npy arrays are not supported");
    }

    let (rows, cols) = parse_shape(header_value(header, "shape")?)?;

    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(dtype.width()))
        .context(".npy shape overflows")?;
    let payload = &bytes[data_start..];
    if payload.len() < expected {
        anyhow::bail!(
            "Truncated .npy payload: {} bytes, expected {} for shape ({rows}, {cols})",
            payload.len(),
            expected
        );
    }

    let data = match dtype {
        Dtype::F32 => payload[..expected]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        Dtype::F64 => payload[..expected]
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32)
            .collect(),
    };

    Ok(NpyMatrix { rows, cols, data })
}

/// Pull the raw value for `key` out of the header's Python dict literal.
fn header_value<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let needle = format!("'{key}':");
    let start = header
        .find(&needle)
        .with_context(|| format!(".npy header missing '{key}'"))?
        + needle.len();
    let rest = header[start..].trim_start();

    // The shape tuple contains commas, so it ends at the closing paren.
    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)
    } else {
        rest.find([',', '}'])
    }
    .with_context(|| format!("Malformed .npy header value for '{key}'"))?;

    Ok(rest[..end].trim())
}

fn parse_shape(raw: &str) -> Result<(usize, usize)> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .with_context(|| format!("Malformed .npy shape {raw}"))?;

    let dims: Vec<usize> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!("Malformed .npy dimension {s}"))
        })
        .collect::<Result<_>>()?;

    match dims.as_slice() {
        [rows, cols] => Ok((*rows, *cols)),
        _ => anyhow::bail!("Expected a 2-D array, got shape {raw}"),
    }
}

/// Encode a row-major f32 matrix as `.npy` (version 1.0).
///
/// Used to write fixtures and exported reference sets.
pub fn encode_f32(rows: usize, cols: usize, data: &[f32]) -> Vec<u8> {
    let mut header =
        format!("{{'descr': '<f4', 'fortran_order': False, 'shape': ({rows}, {cols}), }}");
    // Magic (6) + version (2) + length (2) + header + newline must be 64-byte aligned.
    let unpadded = 10 + header.len() + 1;
    header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
    header.push('\n');

    let mut out = Vec::with_capacity(10 + header.len() + data.len() * 4);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for v in data {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f32_matrix() {
        let bytes = encode_f32(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let m = parse(&bytes).unwrap();
        assert_eq!(m.rows, 2);
        assert_eq!(m.cols, 3);
        assert_eq!(m.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_header_is_aligned() {
        let bytes = encode_f32(1, 1, &[0.5]);
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        assert_eq!((10 + header_len) % 64, 0);
    }

    #[test]
    fn test_parse_f64_matrix() {
        let header = "{'descr': '<f8', 'fortran_order': False, 'shape': (1, 2), }\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&0.25_f64.to_le_bytes());
        bytes.extend_from_slice(&(-1.5_f64).to_le_bytes());

        let m = parse(&bytes).unwrap();
        assert_eq!((m.rows, m.cols), (1, 2));
        assert_eq!(m.data, vec![0.25, -1.5]);
    }

    #[test]
    fn test_rejects_bad_magic() {
        assert!(parse(b"not a numpy file at all").is_err());
    }

    #[test]
    fn test_rejects_one_dimensional() {
        let header = "{'descr': '<f4', 'fortran_order': False, 'shape': (3,), }\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&[0u8; 12]);

        let err = parse(&bytes).unwrap_err();
        assert!(err.to_string().contains("2-D"));
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let mut bytes = encode_f32(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        bytes.truncate(bytes.len() - 4);
        assert!(parse(&bytes).is_err());
    }
}
