//! Internal utility functions and helpers.
//!
//! This module contains small I/O helpers used throughout the crate.
//! It is an implementation detail and not part of the public API.

use std::io::{self, Read};

/// Size of the scratch buffer used when pulling from a reader.
pub(crate) const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Reads once into `buf`, retrying reads interrupted by a signal.
pub(crate) fn read_retrying<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Fills `buf` from `reader`, stopping early only at end of stream.
///
/// Returns the number of bytes read, which is less than `buf.len()` only
/// if the reader ran dry.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match read_retrying(reader, &mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
