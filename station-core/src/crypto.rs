// File:    crypto.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Handles the one-time pad arithmetic, combining message digits and pad digits modulo 10.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! This module contains the one-time pad cipher.
//!
//! The cipher is stateless. It never consumes pad material itself; callers
//! decide what happens to the unused part of a pad.

use log::{debug, error};

use crate::error::{MissionError, Result};

/// Encrypts a digit string with modular addition: `(m + p) mod 10`.
///
/// The pad may be longer than the message; only the overlapping prefix is used.
///
/// # Errors
///
/// Returns [`MissionError::PadTooShort`] if the pad has fewer digits than the
/// message, and [`MissionError::InvalidDigit`] if either input holds a
/// non-digit.
pub fn otp_encrypt(message_digits: &str, pad_digits: &str) -> Result<String> {
    debug!("Encrypting message of length {}", message_digits.len());
    combine(message_digits, pad_digits, |m, p| (m + p) % 10)
}

/// Decrypts a digit string with modular subtraction: `(c - p) mod 10`.
///
/// # Errors
///
/// Same conditions as [`otp_encrypt`].
pub fn otp_decrypt(cipher_digits: &str, pad_digits: &str) -> Result<String> {
    debug!("Decrypting message of length {}", cipher_digits.len());
    combine(cipher_digits, pad_digits, |c, p| (c + 10 - p) % 10)
}

fn combine(input: &str, pad: &str, op: impl Fn(u8, u8) -> u8) -> Result<String> {
    if pad.len() < input.len() {
        error!(
            "Pad is too short for this message: {} < {}",
            pad.len(),
            input.len()
        );
        return Err(MissionError::PadTooShort {
            pad: pad.len(),
            message: input.len(),
        });
    }

    input
        .chars()
        .zip(pad.chars())
        .enumerate()
        .map(|(position, (a, b))| {
            let a = digit_value(a, position)?;
            let b = digit_value(b, position)?;
            Ok(char::from(b'0' + op(a, b)))
        })
        .collect()
}

fn digit_value(ch: char, position: usize) -> Result<u8> {
    ch.to_digit(10)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or(MissionError::InvalidDigit {
            position,
            found: ch,
        })
}
