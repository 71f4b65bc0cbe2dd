pub mod adler32;
pub mod api;
pub mod batch;
pub mod common;
pub mod crc32;
pub mod crc32_tables;
pub mod decompress;

pub use adler32::adler32;
pub use api::Decompressor;
pub use crc32::crc32;
