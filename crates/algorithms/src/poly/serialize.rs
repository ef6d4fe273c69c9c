//! serialize.rs - 12-bit coefficient packing
//!
//! Two coefficients occupy three bytes, low bits first. An odd trailing
//! coefficient is padded with a zero partner.

/// Packed length of `count` coefficients at 12 bits each
pub const fn packed_len(count: usize) -> usize {
    (count * 12 + 7) / 8
}

/// Pack coefficients below 2^12
pub fn pack12(coeffs: &[u32]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(packed_len(coeffs.len()) + 1);
    for pair in coeffs.chunks(2) {
        let c0 = pair[0] & 0xFFF;
        let c1 = pair.get(1).copied().unwrap_or(0) & 0xFFF;
        packed.push(c0 as u8);
        packed.push(((c0 >> 8) | (c1 << 4)) as u8);
        packed.push((c1 >> 4) as u8);
    }
    packed.truncate(packed_len(coeffs.len()));
    packed
}

/// Unpack as many whole coefficients as `bytes` holds
pub fn unpack12(bytes: &[u8]) -> Vec<u32> {
    let count = bytes.len() * 8 / 12;
    let mut coeffs = Vec::with_capacity(count + 1);
    for group in bytes.chunks(3) {
        let b0 = group[0] as u32;
        let b1 = group.get(1).copied().unwrap_or(0) as u32;
        let b2 = group.get(2).copied().unwrap_or(0) as u32;
        coeffs.push(b0 | ((b1 & 0x0F) << 8));
        coeffs.push((b1 >> 4) | (b2 << 4));
    }
    coeffs.truncate(count);
    coeffs
}
