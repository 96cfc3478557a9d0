use crate::codec::DEFAULT_MAX_LINE_LENGTH;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Server settings. The binary builds this from its command line arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Bound of the store actor's request queue.
    pub queue_capacity: usize,
    /// Longest request line accepted before the connection is dropped.
    pub max_line_length: usize,
}

impl Config {
    pub fn new(port: u16) -> Config {
        Config {
            host: DEFAULT_HOST.to_string(),
            port,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}
