//! Line collection from stdin or a file.
//!
//! Lines are read on a background thread and handed to the caller over a
//! bounded channel, so the processing loop can watch a stop flag while the
//! reader is blocked on input.

use crate::input::parser::InputError;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Capacity of the line channel.
const CHANNEL_CAPACITY: usize = 10_000;

/// Where input rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Interpret a command-line argument; `-` means stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    /// Open the source for buffered reading.
    pub fn open(&self) -> Result<Box<dyn BufRead + Send>, InputError> {
        match self {
            InputSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            InputSource::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One raw input line with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub number: usize,
    pub text: String,
}

/// Errors that can occur while controlling the collector.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Collector is already running")]
    AlreadyRunning,
}

/// Reads lines from a source on a background thread.
///
/// The channel closes once the source is exhausted, a read fails, or the
/// collector is stopped. A read error is delivered as the last message.
pub struct RowCollector {
    reader: Option<Box<dyn BufRead + Send>>,
    receiver: Receiver<Result<InputLine, InputError>>,
    sender: Option<Sender<Result<InputLine, InputError>>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RowCollector {
    /// Create a collector over an already opened reader.
    pub fn new(reader: Box<dyn BufRead + Send>) -> Self {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        Self {
            reader: Some(reader),
            receiver,
            sender: Some(sender),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Open a source and create a collector for it.
    pub fn from_source(source: &InputSource) -> Result<Self, InputError> {
        Ok(Self::new(source.open()?))
    }

    /// Start the reader thread.
    pub fn start(&mut self) -> Result<(), CollectorError> {
        let (reader, sender) = match (self.reader.take(), self.sender.take()) {
            (Some(reader), Some(sender)) => (reader, sender),
            _ => return Err(CollectorError::AlreadyRunning),
        };

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        self.handle = Some(thread::spawn(move || {
            for (index, line) in reader.lines().enumerate() {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let message = line
                    .map(|text| InputLine {
                        number: index + 1,
                        text,
                    })
                    .map_err(InputError::from);
                let failed = message.is_err();
                if sender.send(message).is_err() || failed {
                    break;
                }
            }
            running.store(false, Ordering::SeqCst);
        }));

        Ok(())
    }

    /// Ask the reader thread to stop after its current line.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the reader thread is still producing lines.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for input lines.
    pub fn receiver(&self) -> &Receiver<Result<InputLine, InputError>> {
        &self.receiver
    }

    /// Try to receive a line without blocking.
    pub fn try_recv(&self) -> Option<Result<InputLine, InputError>> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the reader thread to finish.
    ///
    /// Only call this once the channel has been drained or the collector
    /// stopped; a stdin reader blocked on input will not return.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("input reader thread panicked");
            }
        }
    }
}
