pub mod human;
pub mod logger;
pub mod ring_buffer;
