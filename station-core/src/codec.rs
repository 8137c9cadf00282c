// File:    codec.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Maps broadcast text to two-digit codes and back.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Letter/digit codec.
//!
//! `A`..`Z` map to `"01"`..`"26"` and a space maps to `"00"`. This table is a
//! fixed contract with anyone building digit streams by hand, so it must not
//! change.

/// Code emitted for a space and for any character outside the alphabet.
pub const SPACE_CODE: &str = "00";

/// Character produced when a two-digit code has no letter.
pub const UNKNOWN_CHAR: char = '?';

/// Longest message that fits into one default pad row (50 digits).
pub const MAX_MESSAGE_CHARS: usize = 25;

/// Returns the two-digit code for `ch`, or `None` if it is not mapped.
#[must_use]
pub fn code_for(ch: char) -> Option<String> {
    match ch {
        ' ' => Some(SPACE_CODE.to_string()),
        'A'..='Z' => Some(format!("{:02}", u32::from(ch) - u32::from('A') + 1)),
        _ => None,
    }
}

/// Encodes `text` as a digit string, two digits per character.
///
/// Unmapped characters become [`SPACE_CODE`]; run [`sanitize_message`] first
/// to avoid that.
#[must_use]
pub fn encode(text: &str) -> String {
    text.chars()
        .map(|ch| code_for(ch).unwrap_or_else(|| SPACE_CODE.to_string()))
        .collect()
}

/// Decodes a single two-digit code.
#[must_use]
pub fn decode_pair(pair: [u8; 2]) -> char {
    if !pair.iter().all(u8::is_ascii_digit) {
        return UNKNOWN_CHAR;
    }
    match (pair[0] - b'0') * 10 + (pair[1] - b'0') {
        0 => ' ',
        n @ 1..=26 => char::from(b'A' + n - 1),
        _ => UNKNOWN_CHAR,
    }
}

/// Decodes a digit string two digits at a time.
///
/// A trailing single digit is dropped. Codes without a letter decode to
/// [`UNKNOWN_CHAR`].
#[must_use]
pub fn decode(digits: &str) -> String {
    digits
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| decode_pair([pair[0], pair[1]]))
        .collect()
}

/// Cleans user input into something [`encode`] maps losslessly.
///
/// Keeps ASCII letters and spaces, uppercases them and truncates the result
/// to [`MAX_MESSAGE_CHARS`] characters.
#[must_use]
pub fn sanitize_message(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_ascii_alphabetic() || *ch == ' ')
        .map(|ch| ch.to_ascii_uppercase())
        .take(MAX_MESSAGE_CHARS)
        .collect()
}
