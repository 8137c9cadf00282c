// File:    pad_generator.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Provides functionality for generating decimal one-time pads and mission identifiers.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use log::debug;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// Characters a mission identifier is drawn from.
pub const MISSION_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default length of a mission identifier.
pub const DEFAULT_ID_LENGTH: usize = 5;

/// Shape of a freshly generated pad.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadLayout {
    /// Number of rows (pages) in the pad.
    pub pages: usize,
    /// Number of digit groups in each row.
    pub groups_per_page: usize,
    /// Number of digits in each group.
    pub group_length: usize,
}

impl Default for PadLayout {
    fn default() -> Self {
        Self {
            pages: 100,
            groups_per_page: 10,
            group_length: 5,
        }
    }
}

impl PadLayout {
    /// Number of pad digits available in one row.
    #[must_use]
    pub const fn digits_per_row(&self) -> usize {
        self.groups_per_page * self.group_length
    }

    /// Generates a pad with this layout.
    #[must_use]
    pub fn generate(&self) -> Vec<String> {
        generate_pad(self.pages, self.groups_per_page, self.group_length)
    }
}

/// Generates a new one-time pad as a list of rows.
///
/// Each row holds `groups_per_page` space-separated groups of `group_length`
/// digits. Digits come from the thread-local CSPRNG, which is reseeded from
/// the operating system.
///
/// # Arguments
///
/// * `pages` - The number of rows in the pad.
/// * `groups_per_page` - The number of digit groups per row.
/// * `group_length` - The number of digits per group.
#[must_use]
pub fn generate_pad(pages: usize, groups_per_page: usize, group_length: usize) -> Vec<String> {
    generate_pad_with(&mut rand::rng(), pages, groups_per_page, group_length)
}

/// Same as [`generate_pad`], drawing digits from the given cryptographic RNG.
pub fn generate_pad_with<R: CryptoRng>(
    rng: &mut R,
    pages: usize,
    groups_per_page: usize,
    group_length: usize,
) -> Vec<String> {
    debug!("Generating one-time pad with {pages} rows of {groups_per_page}x{group_length} digits");
    (0..pages)
        .map(|_| {
            (0..groups_per_page)
                .map(|_| random_digits(rng, group_length))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Generates a random mission identifier of `length` characters from
/// [`MISSION_ID_ALPHABET`].
#[must_use]
pub fn generate_mission_id(length: usize) -> String {
    generate_mission_id_with(&mut rand::rng(), length)
}

/// Same as [`generate_mission_id`], using the given cryptographic RNG.
pub fn generate_mission_id_with<R: CryptoRng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(MISSION_ID_ALPHABET[rng.random_range(0..MISSION_ID_ALPHABET.len())]))
        .collect()
}

/// Number of distinct mission ids of `length` characters, or `None` if it
/// does not fit in a `usize`.
#[must_use]
pub fn mission_id_space(length: usize) -> Option<usize> {
    MISSION_ID_ALPHABET
        .len()
        .checked_pow(u32::try_from(length).ok()?)
}

fn random_digits<R: CryptoRng>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_digits_are_decimal() {
        let digits = random_digits(&mut rand::rng(), 500);
        assert_eq!(digits.len(), 500);
        assert!(digits.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_mission_id_space() {
        assert_eq!(mission_id_space(0), Some(1));
        assert_eq!(mission_id_space(1), Some(36));
        assert_eq!(mission_id_space(2), Some(1296));
        assert_eq!(mission_id_space(64), None);
    }

    #[test]
    fn test_digits_per_row() {
        assert_eq!(PadLayout::default().digits_per_row(), 50);
    }
}
