//! # Growlink - Greenhouse Controller Telemetry Ingestion
//!
//! Growlink is a small daemon that ingests the textual telemetry frames a
//! greenhouse sensor controller emits over its UART and persists them as
//! structured records.
//!
//! ## Features
//!
//! - **Robust frame parsing**: byte-at-a-time state machine with bounded
//!   buffers, noise resynchronization, and a table-driven command set.
//! - **Typed records**: each frame becomes an owned [`protocol::Record`]
//!   variant carrying the raw field text.
//! - **Append-only storage**: records land as timestamped JSON lines under a
//!   locked data directory.
//! - **Serial integration**: direct UART access via `serialport`, feature
//!   gated so the parser builds and tests anywhere.
//! - **Async design**: Tokio tasks for the read loop and the storage sink,
//!   connected by a single record channel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use growlink::config::Config;
//! use growlink::server::IngestServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut server = IngestServer::new(config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`protocol`] - Frame accumulation, tokenization, and command dispatch
//! - [`controller`] - Serial link to the sensor controller
//! - [`server`] - Ingest run loop connecting link, parser, and sink
//! - [`storage`] - Record persistence layer
//! - [`config`] - Configuration management
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Ingest Server  │ ← run loop, shutdown, record handoff
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ Frame Protocol  │ ← byte → frame → tokens → Record
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Storage       │ ← JSON-lines persistence
//! └─────────────────┘
//! ```

pub mod config;
pub mod controller;
pub mod logutil;
pub mod metrics;
pub mod protocol;
pub mod server;
pub mod storage;
