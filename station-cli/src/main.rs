// File:    main.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Command-line front end for creating, listing and consuming encrypted missions.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

#![deny(missing_docs)]
//! A command-line interface for the station mission store.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};
use station_core::broadcast::{self, decode_with_pad};
use station_core::pad_generator::PadLayout;
use station_core::{MissionError, MissionRecord, MissionStore, SessionContext, StoreConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Initialize a mission store and a key\nstation --store ./missions init\nstation keygen --out ./station.key\n\n# Create a mission and show its pad\nstation --store ./missions --key-file ./station.key create\nstation --store ./missions --key-file ./station.key show <ID>\n\n# Encipher a message with the next pad row\nstation --store ./missions --key-file ./station.key broadcast <ID> MEET AT DAWN\n\n# Decode received digits by hand\nstation decode --pad 1234567890 --cipher 1039688005"
)]
struct Cli {
    /// The path to the mission store.
    #[arg(long, global = true, env = "STATION_STORE", default_value = "missions")]
    store: PathBuf,

    /// Base64-encoded session key.
    #[arg(long, global = true, env = "STATION_KEY", hide_env_values = true)]
    key: Option<String>,

    /// File containing the base64-encoded session key. Takes precedence over --key.
    #[arg(long, global = true, value_name = "KEY_FILE")]
    key_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new mission store
    Init {
        /// Number of pad rows per mission
        #[arg(long, default_value_t = PadLayout::default().pages)]
        pages: usize,
        /// Number of digit groups per row
        #[arg(long, default_value_t = PadLayout::default().groups_per_page)]
        groups: usize,
        /// Number of digits per group
        #[arg(long, default_value_t = PadLayout::default().group_length)]
        group_length: usize,
        /// Length of generated mission ids
        #[arg(long, default_value_t = StoreConfig::default().id_length)]
        id_length: usize,
    },
    /// Generate a new 256-bit session key
    Keygen {
        /// Write the key to this file as well as printing it
        #[arg(short, long, value_name = "KEY_FILE")]
        out: Option<PathBuf>,
    },
    /// List the missions readable with the session key
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new mission with a fresh one-time pad
    Create,
    /// Print the remaining pad rows of a mission
    Show {
        /// The mission id
        id: String,
    },
    /// Encipher a message with the next pad row and remove that row
    Broadcast {
        /// The mission id
        id: String,
        /// The message (letters and spaces, at most 25 characters)
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// Print the transmission as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a mission from the store
    Remove {
        /// The mission id
        id: String,
    },
    /// Decode cipher digits against pad digits without a key or store
    Decode {
        /// Pad digits (spaces allowed)
        #[arg(long)]
        pad: String,
        /// Cipher digits (spaces allowed)
        #[arg(long)]
        cipher: String,
    },
}

/// One line of `list --json` output.
#[derive(Serialize)]
struct MissionSummary<'a> {
    id: &'a str,
    rows_remaining: usize,
    file: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Init {
            pages,
            groups,
            group_length,
            id_length,
        } => {
            let config = StoreConfig {
                pad: PadLayout {
                    pages: *pages,
                    groups_per_page: *groups,
                    group_length: *group_length,
                },
                id_length: *id_length,
            };
            MissionStore::init(&cli.store, config).map(|store| {
                println!("Initialized mission store at '{}'", store.dir().display());
            })
        }
        Commands::Keygen { out } => keygen(out.as_deref()),
        Commands::Decode { pad, cipher } => {
            let pad: String = pad.split_whitespace().collect();
            let cipher: String = cipher.split_whitespace().collect();
            println!("{}", decode_with_pad(&cipher, &pad));
            Ok(())
        }
        command => with_store(&cli, |store, session| match command {
            Commands::List { json } => list(store, session, *json),
            Commands::Create => create(store, session),
            Commands::Show { id } => show(store, session, id),
            Commands::Broadcast { id, message, json } => {
                send_broadcast(store, session, id, &message.join(" "), *json)
            }
            Commands::Remove { id } => remove(store, session, id),
            Commands::Init { .. } | Commands::Keygen { .. } | Commands::Decode { .. } => Ok(()),
        }),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn with_store(
    cli: &Cli,
    run: impl FnOnce(&MissionStore, &SessionContext) -> station_core::Result<()>,
) -> station_core::Result<()> {
    let session = load_session(cli)?;
    info!("Using session key {}", fingerprint(&session));
    let store = MissionStore::open(&cli.store).inspect_err(|_| {
        warn!(
            "Mission store '{}' could not be opened. Create it with 'init'.",
            cli.store.display()
        );
    })?;
    run(&store, &session)
}

fn load_session(cli: &Cli) -> station_core::Result<SessionContext> {
    if let Some(path) = &cli.key_file {
        return SessionContext::from_key_file(path);
    }
    let key = cli.key.as_deref().ok_or(MissionError::MissingKey).inspect_err(|_| {
        warn!("A session key is required. Pass --key, --key-file, or set STATION_KEY.");
    })?;
    SessionContext::from_base64(key)
}

/// Short SHA-256 digest of the key, safe to show in logs.
fn fingerprint(session: &SessionContext) -> String {
    let digest = format!("{:x}", Sha256::digest(session.key()));
    digest[..16].to_string()
}

fn keygen(out: Option<&Path>) -> station_core::Result<()> {
    let session = SessionContext::generate()?;
    if let Some(path) = out {
        session.write_key_file(path)?;
    }
    println!("{}", session.to_base64());
    Ok(())
}

fn list(store: &MissionStore, session: &SessionContext, json: bool) -> station_core::Result<()> {
    let missions = store.list(session)?;

    if json {
        let summaries: Vec<MissionSummary<'_>> = missions
            .iter()
            .map(|m| MissionSummary {
                id: m.plain_id().unwrap_or_default(),
                rows_remaining: rows_remaining(m),
                file: store.path_for(m).map(|p| p.display().to_string()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if missions.is_empty() {
        println!("No missions found in store '{}'", store.dir().display());
        return Ok(());
    }
    println!("Missions in store '{}':", store.dir().display());
    println!("{:<10} {:<15}", "ID", "Rows Remaining");
    println!("{:-<26}", "");
    for mission in &missions {
        println!(
            "{:<10} {:<15}",
            mission.plain_id().unwrap_or_default(),
            rows_remaining(mission)
        );
    }
    Ok(())
}

fn create(store: &MissionStore, session: &SessionContext) -> station_core::Result<()> {
    let mission = store.create(session)?;
    println!("{}", mission.plain_id().unwrap_or_default());
    Ok(())
}

fn show(store: &MissionStore, session: &SessionContext, id: &str) -> station_core::Result<()> {
    let mission = store.get(id, session)?;
    if let Some(pad) = mission.pad() {
        for row in pad.rows() {
            println!("{row}");
        }
    }
    Ok(())
}

fn send_broadcast(
    store: &MissionStore,
    session: &SessionContext,
    id: &str,
    message: &str,
    json: bool,
) -> station_core::Result<()> {
    let mut mission = store.get(id, session)?;
    let tx = broadcast::prepare_transmission(store, &mut mission, message, session)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tx)?);
    } else {
        println!("Mission: {}", tx.mission_id);
        println!("Cipher: {}", tx.groups().join(" "));
        println!("Consumed row: {}", tx.consumed_row);
        println!(
            "Pad row removed, {} rows remaining.",
            rows_remaining(&mission)
        );
    }
    Ok(())
}

fn remove(store: &MissionStore, session: &SessionContext, id: &str) -> station_core::Result<()> {
    let mission = store.get(id, session)?;
    if store.remove(&mission)? {
        println!("Removed mission '{id}'");
        Ok(())
    } else {
        Err(MissionError::MissionNotFound(id.to_string()))
    }
}

fn rows_remaining(mission: &MissionRecord) -> usize {
    mission.pad().map_or(0, station_core::PadSheet::len)
}
