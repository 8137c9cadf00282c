// File:    broadcast.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Turns a short message into pad-enciphered digits for a broadcast, consuming one pad row.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Broadcast preparation and decode-only helpers.

use log::info;
use serde::Serialize;

use crate::codec;
use crate::crypto;
use crate::error::{MissionError, Result};
use crate::mission::MissionRecord;
use crate::session::SessionContext;
use crate::store::MissionStore;

/// Digits read out per group in a broadcast.
pub const GROUP_LEN: usize = 5;

/// Everything the audio assembler needs for one broadcast.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    /// Plaintext id of the mission the message was sent under.
    pub mission_id: String,
    /// The enciphered message digits.
    pub cipher_digits: String,
    /// The pad row that was used and removed from the mission.
    pub consumed_row: String,
}

impl Transmission {
    /// The cipher digits in groups of [`GROUP_LEN`]; the last may be shorter.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        self.cipher_digits
            .as_bytes()
            .chunks(GROUP_LEN)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .collect()
    }
}

/// Enciphers `message` with the front pad row of `record` and, once that
/// has succeeded, removes the row from the stored mission.
///
/// # Errors
///
/// [`MissionError::NotDecrypted`] for an encrypted record,
/// [`MissionError::MissionNotFound`] if no pad rows are left,
/// [`MissionError::EmptyMessage`] if nothing sendable remains after
/// sanitizing, and [`MissionError::PadTooShort`] if the message does not fit in one row (the
/// row is not consumed in that case).
pub fn prepare_transmission(
    store: &MissionStore,
    record: &mut MissionRecord,
    message: &str,
    session: &SessionContext,
) -> Result<Transmission> {
    let sheet = record.pad().ok_or(MissionError::NotDecrypted)?;
    let mission_id = record.plain_id().unwrap_or_default().to_string();
    let pad_digits = sheet
        .row_digits(0)
        .ok_or_else(|| MissionError::MissionNotFound(format!("{mission_id} has no pad rows left")))?;

    let message = codec::sanitize_message(message);
    if message.trim().is_empty() {
        return Err(MissionError::EmptyMessage);
    }
    let message_digits = codec::encode(&message);
    let cipher_digits = crypto::otp_encrypt(&message_digits, &pad_digits)?;

    let consumed_row = store.consume_row(record, session)?;
    info!(
        "Prepared broadcast for mission {mission_id}: {} cipher digits",
        cipher_digits.len()
    );
    Ok(Transmission {
        mission_id,
        cipher_digits,
        consumed_row,
    })
}

/// Decodes received cipher digits against pad digits without touching any
/// mission.
///
/// Only the overlapping length is used, two digits per character. Pairs that
/// contain non-digits or map to no letter come out as [`codec::UNKNOWN_CHAR`].
#[must_use]
pub fn decode_with_pad(cipher_digits: &str, pad_digits: &str) -> String {
    let cipher = cipher_digits.as_bytes();
    let pad = pad_digits.as_bytes();
    let overlap = cipher.len().min(pad.len());

    cipher[..overlap]
        .chunks_exact(2)
        .zip(pad[..overlap].chunks_exact(2))
        .map(|(c, p)| {
            let pair = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
            crypto::otp_decrypt(&pair(c), &pair(p)).map_or(codec::UNKNOWN_CHAR, |plain| {
                codec::decode(&plain).chars().next().unwrap_or(codec::UNKNOWN_CHAR)
            })
        })
        .collect()
}
