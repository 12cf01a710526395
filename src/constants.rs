pub const TICK_RATE_MS: u64 = 1000;
pub const WINDOW_CAPACITY: usize = 20;
// Bar height resolution handed to the sparkline; it only takes integers
pub const SPARK_RESOLUTION: u64 = 1000;

pub const TITLE: &str = ".: ttyplot :.";
pub const VERSION: &str = concat!("ttyspark ", env!("CARGO_PKG_VERSION"));

// Longer runs of non-whitespace can't be a number; they are dropped whole
pub const MAX_TOKEN_LEN: usize = 128;
