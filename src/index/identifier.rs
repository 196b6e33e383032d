use crate::error::HeatmapError;
use crate::index::constants::{IDENTIFIER_VERSION, RESOLUTION_SCALE};
use crate::index::grid::GridKey;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

const PAYLOAD_LEN: usize = 25;

/// Generates a cell identifier from a grid key and the resolution it was built with.
///
/// The identifier is a URL-safe Base64 string encoding a 26-byte binary structure.
///
/// # Binary Format
///
/// | Offset | Size | Field       | Description                                        |
/// |--------|------|-------------|----------------------------------------------------|
/// | 0      | 1    | Version     | Identifier format version (currently 1)            |
/// | 1      | 8    | Lat index   | Latitude bucket index as big-endian `i64`          |
/// | 9      | 8    | Lon index   | Longitude bucket index as big-endian `i64`         |
/// | 17     | 8    | Resolution  | Grid resolution in micro-degrees as big-endian `u64` |
/// | 25     | 1    | Checksum    | Wrapping sum of bytes 0-24                         |
///
/// # Example
/// ```
/// use geoheat::{GridKey, generate_cell_identifier};
///
/// let id = generate_cell_identifier(&GridKey::new(4000, -7300), 0.01);
/// assert!(!id.is_empty());
/// ```
pub fn generate_cell_identifier(key: &GridKey, resolution: f64) -> String {
    let resolution_int = (resolution * RESOLUTION_SCALE).round() as u64;

    let mut binary_data = Vec::with_capacity(PAYLOAD_LEN + 1);
    binary_data.push(IDENTIFIER_VERSION);
    binary_data.extend_from_slice(&key.lat_index.to_be_bytes());
    binary_data.extend_from_slice(&key.lon_index.to_be_bytes());
    binary_data.extend_from_slice(&resolution_int.to_be_bytes());

    let checksum: u8 = binary_data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    binary_data.push(checksum);

    URL_SAFE_NO_PAD.encode(&binary_data)
}

/// Decodes a cell identifier into `(version, key, resolution)`.
///
/// # Errors
///
/// [`HeatmapError::InvalidIdentifier`] when the Base64 is malformed, the payload
/// has the wrong length, the checksum does not match, or the version is unknown.
pub fn decode_cell_identifier(identifier: &str) -> Result<(u8, GridKey, f64), HeatmapError> {
    let binary_data = URL_SAFE_NO_PAD
        .decode(identifier)
        .map_err(|e| HeatmapError::InvalidIdentifier(e.to_string()))?;

    if binary_data.len() != PAYLOAD_LEN + 1 {
        return Err(HeatmapError::InvalidIdentifier(format!(
            "expected {} bytes, got {}",
            PAYLOAD_LEN + 1,
            binary_data.len()
        )));
    }

    let (data, checksum_bytes) = binary_data.split_at(PAYLOAD_LEN);
    let calculated_checksum: u8 = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if calculated_checksum != checksum_bytes[0] {
        return Err(HeatmapError::InvalidIdentifier("checksum mismatch".to_string()));
    }

    let version = data[0];
    if version != IDENTIFIER_VERSION {
        return Err(HeatmapError::InvalidIdentifier(format!(
            "unsupported version {}",
            version
        )));
    }

    let lat_index = i64::from_be_bytes(read_word(&data[1..9])?);
    let lon_index = i64::from_be_bytes(read_word(&data[9..17])?);
    let resolution_int = u64::from_be_bytes(read_word(&data[17..25])?);

    Ok((
        version,
        GridKey::new(lat_index, lon_index),
        resolution_int as f64 / RESOLUTION_SCALE,
    ))
}

fn read_word(bytes: &[u8]) -> Result<[u8; 8], HeatmapError> {
    bytes
        .try_into()
        .map_err(|_| HeatmapError::InvalidIdentifier("truncated field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_matches};

    #[test]
    fn test_generate_and_decode_identifier() -> Result<(), HeatmapError> {
        let key = GridKey::new(4010, -7310);

        let id = generate_cell_identifier(&key, 0.01);
        let (version, decoded, resolution) = decode_cell_identifier(&id)?;

        assert_eq!(version, IDENTIFIER_VERSION);
        assert_eq!(decoded, key);
        assert!((resolution - 0.01).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_distinct_keys_distinct_ids() {
        let a = generate_cell_identifier(&GridKey::new(1, 2), 0.01);
        let b = generate_cell_identifier(&GridKey::new(2, 1), 0.01);
        let c = generate_cell_identifier(&GridKey::new(1, 2), 0.05);

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_identifier() {
        assert_err!(decode_cell_identifier("invalid"));
    }

    #[test]
    fn test_corrupted_checksum() {
        let id = generate_cell_identifier(&GridKey::new(4000, -7300), 0.01);
        let mut bytes = URL_SAFE_NO_PAD.decode(&id).unwrap();
        bytes[3] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(&bytes);

        assert_matches!(
            decode_cell_identifier(&tampered),
            Err(HeatmapError::InvalidIdentifier(_))
        );
    }
}
