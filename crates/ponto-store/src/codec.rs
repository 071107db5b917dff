//! Descriptor blob codec: little-endian f32 sequences.

/// Encode descriptor values as a little-endian f32 blob.
pub(crate) fn encode_descriptor_blob(values: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(std::mem::size_of_val(values));
    for &value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode a stored blob back into descriptor values.
///
/// Lenient on purpose: whatever length is stored comes back (trailing
/// partial element dropped). The matcher skips wrong-length descriptors,
/// so a corrupted row degrades to "never matches" instead of failing the
/// whole scan.
pub(crate) fn decode_descriptor_blob(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let values = vec![0.0, -1.5, 3.25, f32::MIN_POSITIVE];
        let blob = encode_descriptor_blob(&values);
        assert_eq!(blob.len(), 16);
        assert_eq!(decode_descriptor_blob(&blob), values);
    }

    #[test]
    fn test_decode_drops_trailing_partial_element() {
        let mut blob = encode_descriptor_blob(&[1.0, 2.0]);
        blob.push(0xFF);
        assert_eq!(decode_descriptor_blob(&blob), vec![1.0, 2.0]);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_descriptor_blob(&[]).is_empty());
    }
}
