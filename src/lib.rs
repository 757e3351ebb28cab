//! # wati-chat-export
//!
//! A CLI tool that exports [WATI](https://wati.io) team-inbox conversations to a CSV file.
//!
//! ## What it does
//!
//! WATI's dashboard pages through conversations with a cursor-based filter
//! endpoint. This tool drives that same endpoint: it fetches pages newest-
//! assignment-first, keeps every conversation assigned after a boundary date
//! you supply, and writes one CSV row per conversation (name, contact number,
//! assignment and last-update dates, concatenated ticket notes).
//!
//! The upstream is only ever **read** — nothing is modified or acknowledged.
//!
//! ## Stopping
//!
//! Pagination ends when a conversation assigned on or before the boundary
//! date is seen (`--stop-policy first-hit`, the default), or after a second
//! such conversation (`second-hit`) for feeds where a single stray old
//! assignment can appear mid-stream. It also ends on an empty page or a
//! missing cursor. If a request fails, the rows collected so far are still
//! written out.
//!
//! ## Usage
//!
//! ```sh
//! # Everything assigned after April 30th, 2025
//! wati-chat-export --date 30-04-2025 --token "$WATI_TOKEN"
//!
//! # Restricted to two topics, into a chosen file
//! wati-chat-export --date 30-04-2025 --topics "Counselor: A,Counselor: B" -o april.csv
//! ```
//!
//! The token and other preferences can be persisted in
//! `~/.config/wati-chat-export/config.toml`.
//!
//! ## Compatibility
//!
//! Tracks WATI's internal (undocumented) conversation-filter payload, `v2`.
//! The response is parsed leniently, so extra fields in newer releases are
//! ignored; if a WATI update renames fields, rows degrade to empty columns
//! rather than failing the run.
