//! # Controller Communication Module
//!
//! The serial collaborator that supplies raw bytes to the parser. Handles
//! opening and configuring the UART link to the sensor controller; it knows
//! nothing about frames — chunked reads go straight into
//! [`FrameParser::feed_bytes`](crate::protocol::FrameParser::feed_bytes).
//!
//! Compiled without the `serial` feature the link is a mock that never
//! yields data, which keeps the rest of the daemon testable on machines
//! without a device attached.

use anyhow::Result;
use log::info;
use tokio::time::{sleep, Duration};

#[cfg(feature = "serial")]
use anyhow::anyhow;
#[cfg(feature = "serial")]
use log::debug;
#[cfg(feature = "serial")]
use serialport::SerialPort;

/// A connection to the sensor controller's UART.
pub struct ControllerLink {
    #[allow(dead_code)]
    port_name: String,
    #[allow(dead_code)]
    baud_rate: u32,
    #[cfg(feature = "serial")]
    port: Option<Box<dyn SerialPort>>,
}

impl ControllerLink {
    /// Open and configure the serial port (8N1, short read timeout), toggle
    /// DTR/RTS to wake the controller, and purge any boot noise already
    /// buffered by the OS.
    pub async fn open(port_name: &str, baud_rate: u32) -> Result<Self> {
        info!(
            "Opening controller link on {} at {} baud",
            port_name, baud_rate
        );

        #[cfg(feature = "serial")]
        {
            let mut builder =
                serialport::new(port_name, baud_rate).timeout(Duration::from_millis(500));
            #[cfg(unix)]
            {
                builder = builder
                    .data_bits(serialport::DataBits::Eight)
                    .stop_bits(serialport::StopBits::One)
                    .parity(serialport::Parity::None);
            }
            let mut port = builder
                .open()
                .map_err(|e| anyhow!("Failed to open serial port {}: {}", port_name, e))?;
            let _ = port.write_data_terminal_ready(true);
            let _ = port.write_request_to_send(true);
            // Settle, then drop whatever the controller printed while booting
            sleep(Duration::from_millis(150)).await;
            let mut purge_buf = [0u8; 512];
            if let Ok(available) = port.bytes_to_read() {
                if available > 0 {
                    let _ = port.read(&mut purge_buf);
                }
            }
            debug!("Serial port initialized, boot noise purged");
            Ok(ControllerLink {
                port_name: port_name.to_string(),
                baud_rate,
                port: Some(port),
            })
        }

        #[cfg(not(feature = "serial"))]
        {
            log::warn!("Serial support not compiled in, using mock link");
            Ok(ControllerLink {
                port_name: port_name.to_string(),
                baud_rate,
            })
        }
    }

    /// Read the next chunk of bytes into `buf`. Returns `Ok(0)` when the read
    /// timed out with nothing available; the short sleep keeps an idle link
    /// from spinning.
    pub async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        #[cfg(feature = "serial")]
        {
            if let Some(ref mut port) = self.port {
                match port.read(buf) {
                    Ok(n) if n > 0 => return Ok(n),
                    Ok(_) => {
                        sleep(Duration::from_millis(10)).await;
                        return Ok(0);
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                        return Ok(0);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let _ = buf;
        // Mock link: never produces data
        sleep(Duration::from_millis(100)).await;
        Ok(0)
    }
}
