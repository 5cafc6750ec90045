//! Flip-dot display handle.
//!
//! Owns the pixel buffer and the byte sink the frames are written to.

use crate::bitmap::PixelBuffer;
use crate::protocol::{buffer_packet, format_hex};
use crate::{Error, Result, BAUD_RATE};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, info};

/// Flip-dot display on a serial port.
pub type SerialFlipdot = Flipdot<SerialStream>;

/// Flip-dot display controller.
pub struct Flipdot<W> {
    buffer: PixelBuffer,
    sink: W,
}

impl Flipdot<SerialStream> {
    /// Opens the serial port and creates a dark display.
    pub fn open(port_path: &str, address: u8, rows: usize, columns: usize) -> Result<Self> {
        Self::open_with_baud(port_path, BAUD_RATE, address, rows, columns)
    }

    /// Opens the serial port at a custom baud rate.
    pub fn open_with_baud(
        port_path: &str,
        baud: u32,
        address: u8,
        rows: usize,
        columns: usize,
    ) -> Result<Self> {
        let buffer = PixelBuffer::new(rows, columns, address)?;

        let port = tokio_serial::new(port_path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .open_native_async()
            .map_err(|e| {
                if let tokio_serial::ErrorKind::Io(kind) = &e.kind {
                    if (*kind == std::io::ErrorKind::NotFound
                        || *kind == std::io::ErrorKind::PermissionDenied)
                        && !std::path::Path::new(port_path).exists()
                    {
                        return Error::PortNotFound(port_path.to_string());
                    }
                }
                Error::Serial(e)
            })?;

        info!(
            "Flip-dot opened on {} at {} baud (address {}, {}x{})",
            port_path, baud, address, columns, rows
        );

        Ok(Self::new(buffer, port))
    }
}

impl<W: AsyncWrite + Unpin> Flipdot<W> {
    /// Wraps an existing sink.
    pub fn new(buffer: PixelBuffer, sink: W) -> Self {
        Self { buffer, sink }
    }

    /// Sets a pixel in the local buffer.
    pub fn set(&mut self, x: usize, y: usize, state: bool) -> Result<()> {
        self.buffer.set(x, y, state)
    }

    /// Gets a pixel from the local buffer.
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        self.buffer.get(x, y)
    }

    /// Turns every dot off in the local buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Sets every visible dot in the local buffer.
    pub fn fill(&mut self, state: bool) {
        self.buffer.fill(state);
    }

    /// Returns the pixel buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Builds the frame for the current buffer without sending it.
    pub fn packet(&self) -> Result<Vec<u8>> {
        buffer_packet(&self.buffer)
    }

    /// Sends the current buffer to the display.
    ///
    /// Returns the number of bytes written. The frame is fully built before
    /// anything reaches the sink.
    pub async fn send(&mut self) -> Result<usize> {
        let packet = self.packet()?;

        debug!("Sending frame: {}", format_hex(&packet));

        self.sink.write_all(&packet).await?;
        self.sink.flush().await?;

        debug!("Frame sent ({} bytes)", packet.len());
        Ok(packet.len())
    }

    /// Shuts down the sink and releases it.
    pub async fn stop(mut self) -> Result<()> {
        self.sink.shutdown().await?;
        debug!("Flip-dot sink closed");
        Ok(())
    }

    /// Returns the sink, dropping the buffer.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
