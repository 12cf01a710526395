mod app;
mod constants;
mod ingest;
mod ui;
mod util;
mod window;

use std::{
    io::{self, IsTerminal, Write},
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use log::{error, info, warn};

use crate::constants::WINDOW_CAPACITY;
use crate::ingest::IngestError;
use crate::window::RollingWindow;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let window = Arc::new(RollingWindow::new(WINDOW_CAPACITY));

    let res = if io::stdout().is_terminal() {
        run_interactive(window)
    } else {
        run_dump(&window)
    };

    if let Err(err) = res {
        error!("{:#}", err);
        process::exit(1);
    }
}

// Sparkline dashboard; stdin is read on its own thread.
fn run_interactive(window: Arc<RollingWindow>) -> anyhow::Result<()> {
    if io::stdin().is_terminal() {
        warn!("stdin is a terminal; pipe numbers in, e.g. `vmstat 1 | awk '{{print $15}}' | ttyspark`");
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::Relaxed))
            .context("installing signal handler")?;
    }

    ingest::spawn(Arc::clone(&window)).context("starting stdin reader")?;
    info!("interactive mode, window of {} samples", window.capacity());

    ui::run(&window, &interrupted).context("running terminal UI")?;
    Ok(())
}

// Plain text: one bracketed dump line per sample, exit at end of input.
fn run_dump(window: &RollingWindow) -> anyhow::Result<()> {
    ctrlc::set_handler(|| process::exit(0)).context("installing signal handler")?;
    info!("stdout is not a terminal, dumping window after every sample");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stdin = io::stdin();

    let res = ingest::ingest(stdin.lock(), window, |w| {
        writeln!(out, "{}", w)?;
        out.flush()
    });

    match res {
        Ok(pushed) => {
            info!("end of input after {} samples", pushed);
            Ok(())
        }
        // Reader went away (`| head`), nothing left to do
        Err(IngestError::Sink(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e.into()),
    }
}
