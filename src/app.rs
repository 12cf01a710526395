use std::time::Instant;

use chrono::{DateTime, Local};

use crate::util::{format_dump, window_stats, Stats};
use crate::window::RollingWindow;

// What the refresh loop draws, rebuilt on every tick
pub struct App {
    pub samples: Vec<f64>,
    pub dump: String,
    pub stats: Stats,
    pub has_data: bool,
    pub refreshed_at: Option<DateTime<Local>>,
    pub last_tick: Instant,
}

impl App {
    pub fn new(capacity: usize) -> App {
        App {
            samples: vec![0.0; capacity],
            dump: String::new(),
            stats: Stats::default(),
            has_data: false,
            refreshed_at: None,
            last_tick: Instant::now(),
        }
    }

    pub fn on_tick(&mut self, window: &RollingWindow) {
        // dump, sparkline and has_data all come from the same locked read
        let (samples, pushes) = window.snapshot_counted();
        self.samples = samples;
        self.dump = format_dump(&self.samples);
        self.stats = window_stats(&self.samples);
        self.has_data = pushes > 0;
        self.refreshed_at = Some(Local::now());
        self.last_tick = Instant::now();
    }
}
