//! bcrypt's radix-64 encoding.
//!
//! Bits are grouped exactly like base64 (3 bytes to 4 symbols, most
//! significant bits first) but the alphabet differs and no `=` padding is
//! ever written: a trailing 1 byte becomes 2 symbols, 2 bytes become 3.

use crate::error::FormatError;

/// bcrypt's custom base64 alphabet.
pub const ALPHABET: &[u8; 64] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const INVALID: u8 = 0xff;

const DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Number of symbols produced for `len` input bytes.
pub const fn encoded_len(len: usize) -> usize {
    (len * 8 + 5) / 6
}

pub fn encode(input: &[u8]) -> String {
    let mut output = String::with_capacity(encoded_len(input.len()));
    let symbol = |index: u32| ALPHABET[(index & 0x3f) as usize] as char;

    for chunk in input.chunks(3) {
        let b1 = chunk[0] as u32;
        let b2 = chunk.get(1).map(|&b| b as u32).unwrap_or(0);
        let b3 = chunk.get(2).map(|&b| b as u32).unwrap_or(0);

        let triple = (b1 << 16) | (b2 << 8) | b3;

        output.push(symbol(triple >> 18));
        output.push(symbol(triple >> 12));
        if chunk.len() > 1 {
            output.push(symbol(triple >> 6));
        }
        if chunk.len() > 2 {
            output.push(symbol(triple));
        }
    }

    output
}

pub fn decode(input: &str) -> Result<Vec<u8>, FormatError> {
    if input.len() % 4 == 1 {
        return Err(FormatError::TruncatedGroup);
    }

    let mut result = Vec::with_capacity(input.len() * 3 / 4);
    let mut buf = 0u32;
    let mut num_bits = 0;

    for (offset, c) in input.bytes().enumerate() {
        let val = DECODE_TABLE[c as usize];
        if val == INVALID {
            return Err(FormatError::InvalidSymbol {
                symbol: input[offset..].chars().next().unwrap_or(c as char),
                offset,
            });
        }

        buf = (buf << 6) | val as u32;
        num_bits += 6;

        if num_bits >= 8 {
            num_bits -= 8;
            result.push((buf >> num_bits) as u8);
            buf &= (1 << num_bits) - 1;
        }
    }

    Ok(result)
}
