//! Layout checksum.

/// Compute the 16-bit checksum tmux prefixes to a layout body.
///
/// Each character rotates the accumulator right by one bit and then adds
/// the character's code point, truncated to 16 bits.
#[must_use]
pub fn checksum(text: &str) -> u16 {
    text.chars().fold(0u16, |acc, c| {
        // Truncating the code point is the same as masking the sum.
        #[allow(clippy::cast_possible_truncation)]
        let code = u32::from(c) as u16;
        acc.rotate_right(1).wrapping_add(code)
    })
}
