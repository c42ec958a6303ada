use crate::error::{Error, Result};

/// Popcount of every 4-bit value
const ONE_BITS: [u32; 16] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

/// Number of differing bits between two hex hashes of equal length
pub fn hamming_distance(hash1: &str, hash2: &str) -> Result<u32> {
    if hash1.len() != hash2.len() {
        return Err(Error::LengthMismatch {
            left: hash1.len(),
            right: hash2.len(),
        });
    }

    let mut distance = 0;
    for (c1, c2) in hash1.chars().zip(hash2.chars()) {
        let n1 = nibble(c1, hash1)?;
        let n2 = nibble(c2, hash2)?;
        distance += ONE_BITS[(n1 ^ n2) as usize];
    }

    Ok(distance)
}

fn nibble(c: char, hash: &str) -> Result<u32> {
    c.to_digit(16)
        .ok_or_else(|| Error::InvalidHash(hash.to_string()))
}
