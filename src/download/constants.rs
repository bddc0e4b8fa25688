//! Constants for the download module (chunking, destination naming).

/// Size in bytes of each write to a destination file.
pub const CHUNK_SIZE: usize = 1024;

/// Maximum number of numeric suffixes tried when a file name is taken.
pub const MAX_NAME_ATTEMPTS: u32 = 1000;
