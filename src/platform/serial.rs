//! Serial status link
//!
//! The LCD game answers the `i` command with a status report. Where the
//! report goes is a `SerialLink`: a file standing in for the USB serial port,
//! or the log when no port is configured.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::GameError;
use crate::sim::GameEvent;

/// Outbound text channel
pub trait SerialLink {
    fn send(&mut self, message: &str) -> Result<(), GameError>;
}

/// Writes reports to the log at info level
#[derive(Debug, Default)]
pub struct LogLink;

impl SerialLink for LogLink {
    fn send(&mut self, message: &str) -> Result<(), GameError> {
        for line in message.lines() {
            log::info!("serial: {line}");
        }
        Ok(())
    }
}

/// Writes reports verbatim to any writer
pub struct WriterLink<W: Write> {
    writer: W,
}

impl<W: Write> WriterLink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterLink<BufWriter<File>> {
    /// Append to a file, creating it if needed
    pub fn open(path: &Path) -> Result<Self, GameError> {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| GameError::SerialIo {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Serial output goes to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SerialLink for WriterLink<W> {
    fn send(&mut self, message: &str) -> Result<(), GameError> {
        self.writer.write_all(message.as_bytes())?;
        // Blank line between reports
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Forward the status reports among `events` to the link
pub fn forward_reports(link: &mut dyn SerialLink, events: &[GameEvent]) -> Result<(), GameError> {
    for event in events {
        if let GameEvent::Status(report) = event {
            link.send(report)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_status_events_are_sent() {
        let mut link = WriterLink::new(Vec::new());
        let events = vec![
            GameEvent::CheeseCollected,
            GameEvent::Status("Score: 1\r\n".to_string()),
            GameEvent::TomHit,
        ];
        assert!(forward_reports(&mut link, &events).is_ok());
        assert_eq!(link.into_inner(), b"Score: 1\r\n\n".to_vec());
    }

    #[test]
    fn test_log_link_accepts_reports() {
        let mut link = LogLink;
        assert!(link.send("Paused: False\r\n").is_ok());
    }
}
