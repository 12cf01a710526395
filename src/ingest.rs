use std::{
    io::{self, BufRead, ErrorKind},
    process,
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::{debug, error, info};
use thiserror::Error;

use crate::constants::MAX_TOKEN_LEN;
use crate::window::RollingWindow;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("reading input")]
    Read(#[source] io::Error),
    #[error("writing output")]
    Sink(#[source] io::Error),
}

/// Read whitespace separated numbers from `reader` until end of input,
/// pushing each one into `window` as soon as its delimiter arrives and calling
/// `on_push` right after.
///
/// Error policy:
/// - a token that is not a valid `f64` (non UTF-8, or longer than
///   `MAX_TOKEN_LEN`) is dropped, reading goes on
/// - an interrupted read is retried
/// - end of input returns `Ok` with the number of samples pushed; a final
///   token needs no trailing whitespace
/// - any other read error, or an error from `on_push`, stops reading
pub fn ingest<R, F>(mut reader: R, window: &RollingWindow, mut on_push: F) -> Result<u64, IngestError>
where
    R: BufRead,
    F: FnMut(&RollingWindow) -> io::Result<()>,
{
    let mut token = Token::default();
    let mut pushed = 0u64;
    let mut record = |value: f64| -> Result<(), IngestError> {
        window.push(value);
        pushed += 1;
        on_push(window).map_err(IngestError::Sink)
    };

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(IngestError::Read(e)),
        };
        if buf.is_empty() {
            if let Some(value) = token.finish() {
                record(value)?;
            }
            break;
        }

        let len = buf.len();
        for &byte in buf {
            if byte.is_ascii_whitespace() {
                if let Some(value) = token.finish() {
                    record(value)?;
                }
            } else {
                token.feed(byte);
            }
        }
        reader.consume(len);
    }

    Ok(pushed)
}

// Partial token, carried across reads
#[derive(Default)]
struct Token {
    bytes: Vec<u8>,
    overlong: bool,
}

impl Token {
    fn feed(&mut self, byte: u8) {
        if self.bytes.len() < MAX_TOKEN_LEN {
            self.bytes.push(byte);
        } else {
            self.overlong = true;
        }
    }

    fn finish(&mut self) -> Option<f64> {
        if self.bytes.is_empty() {
            return None;
        }
        let value = if self.overlong {
            None
        } else {
            std::str::from_utf8(&self.bytes).ok().and_then(|s| s.parse().ok())
        };
        if value.is_none() {
            debug!("dropping malformed token {:?}", String::from_utf8_lossy(&self.bytes));
        }
        self.bytes.clear();
        self.overlong = false;
        value
    }
}

// Background stdin reader for the interactive mode.
//
// End of input exits the whole process right here with status 0, without
// going back through the refresh loop.
pub fn spawn(window: Arc<RollingWindow>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let stdin = io::stdin();
            match ingest(stdin.lock(), &window, |_| Ok(())) {
                Ok(pushed) => {
                    info!("end of input after {} samples", pushed);
                    process::exit(0);
                }
                Err(e) => {
                    error!("{:#}", anyhow::Error::new(e));
                    process::exit(1);
                }
            }
        })
}
