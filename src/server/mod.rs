//! # Ingest Server Module
//!
//! Owns the run loop: pull chunks from the controller link, feed them byte by
//! byte through the [`FrameParser`], and hand every completed [`Record`] off
//! by value to the storage task.
//!
//! Concurrency model: the reader loop exclusively owns the link and the
//! parser; the storage task exclusively owns [`Storage`]. The only thing that
//! crosses between them is a completed `Record` moved through an unbounded
//! mpsc channel, so the parser never holds a reference a second task could
//! observe. A second physical link would get its own `FrameParser`; parser
//! state is never shared.

use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::controller::ControllerLink;
use crate::metrics;
use crate::protocol::{FrameParser, Record};
use crate::storage::Storage;

/// The daemon: configuration, sink, and (once connected) the serial link.
pub struct IngestServer {
    config: Config,
    storage: Option<Storage>,
    link: Option<ControllerLink>,
}

impl IngestServer {
    /// Create the server and initialize its storage sink.
    pub async fn new(config: Config) -> Result<Self> {
        let storage = Storage::new(&config.storage.data_dir).await?;
        Ok(IngestServer {
            config,
            storage: Some(storage),
            link: None,
        })
    }

    /// Open the serial link to the controller.
    pub async fn connect_device(&mut self, port: &str) -> Result<()> {
        let link = ControllerLink::open(port, self.config.controller.baud_rate).await?;
        self.link = Some(link);
        Ok(())
    }

    /// Run until ctrl-c. With no device connected the server idles; records
    /// only flow once a link is up.
    pub async fn run(&mut self) -> Result<()> {
        let storage = self
            .storage
            .take()
            .context("server storage already consumed")?;
        let (record_tx, record_rx) = mpsc::unbounded_channel::<Record>();
        let storage_task = tokio::spawn(store_loop(storage, record_rx));

        match self.link.take() {
            Some(mut link) => {
                info!("Ingest loop started");
                let mut parser = FrameParser::new();
                let mut buf = [0u8; 256];
                'ingest: loop {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {
                            info!("Received shutdown signal");
                            break 'ingest;
                        }
                        read = link.read_chunk(&mut buf) => {
                            match read {
                                Ok(0) => {}
                                Ok(n) => {
                                    for record in parser.feed_bytes(&buf[..n]) {
                                        if record_tx.send(record).is_err() {
                                            warn!("storage task gone; stopping ingest");
                                            break 'ingest;
                                        }
                                    }
                                }
                                Err(e) => {
                                    error!("Controller read failed: {}", e);
                                    break 'ingest;
                                }
                            }
                        }
                    }
                }
            }
            None => {
                info!("No controller connected; idling until shutdown");
                tokio::signal::ctrl_c().await?;
                info!("Received shutdown signal");
            }
        }

        // Closing the channel lets the storage task drain and finish.
        drop(record_tx);
        storage_task.await.context("storage task panicked")?;

        let m = metrics::snapshot();
        info!(
            "Shutdown complete: {} frames parsed, {} rejected, {} overflows, {} noise bytes, {} records stored",
            m.frames_parsed, m.frames_rejected, m.buffer_overflows, m.resync_dropped, m.records_stored
        );
        Ok(())
    }

    /// Print storage statistics for the `status` command.
    pub async fn show_status(&self) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .context("server storage already consumed")?;
        let stats = storage.stats().await?;
        let payload = serde_json::json!({
            "station": self.config.station.name,
            "data_dir": self.config.storage.data_dir,
            "measurements": stats.measurements,
            "ph": stats.ph,
            "control": stats.control,
        });
        println!("{}", payload);
        Ok(())
    }
}

/// Storage task body: consume records until the channel closes.
async fn store_loop(mut storage: Storage, mut rx: mpsc::UnboundedReceiver<Record>) {
    while let Some(record) = rx.recv().await {
        match storage.store_record(record).await {
            Ok(stored) => {
                log::debug!("stored {} record", stored.record.kind());
            }
            Err(e) => {
                error!("Failed to store record: {}", e);
            }
        }
    }
}
