// File:    lib.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The main library crate for station-core, tying together pad generation, the pad cipher, sealing, and mission storage.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # Station Core Library
//!
//! This library manages "missions": records sealed at rest with AES-GCM, each
//! carrying a decimal one-time pad that is consumed one row per broadcast.
//! It covers pad generation, the letter/digit codec, the modulo-10 pad
//! cipher, AEAD sealing of ids and payloads, and the directory-backed store.

/// AEAD sealing of identifiers and payloads.
pub mod aead;
/// Broadcast preparation and decode-only helpers.
pub mod broadcast;
/// Letter to two-digit code mapping.
pub mod codec;
/// One-time pad arithmetic on digit strings.
pub mod crypto;
/// Error taxonomy.
pub mod error;
/// Mission records and their pad payload.
pub mod mission;
/// Utilities for generating new one-time pads and mission ids.
pub mod pad_generator;
/// Session key handling.
pub mod session;
/// Directory-backed mission storage.
pub mod store;

pub use error::{MissionError, Result};
pub use mission::{MissionRecord, PadSheet, Payload, RecordState};
pub use session::SessionContext;
pub use store::{MissionStore, StoreConfig};
