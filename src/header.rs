// Wavcache -- A lossless codec for cached 16-bit sample streams
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>. This file may not be
// copied, modified, or distributed except according to those terms.

//! The 44-byte container header is copied verbatim between encoder and
//! decoder. This crate does not interpret it -- no RIFF/WAVE chunk
//! validation, no sample-rate or channel-count checks. That is an
//! explicit Non-goal; callers who need a validated WAV header should
//! parse bytes 0..44 themselves (e.g. with `hound`) before or after
//! calling into this crate.

use std::io::{self, Read, Write};

/// Size in bytes of the opaque leading header every stream carries.
pub const HEADER_LEN: usize = 44;

/// Copies the leading `HEADER_LEN` bytes from `source` to `sink` without
/// interpreting them.
pub fn copy_header<R: Read + ?Sized, W: Write + ?Sized>(
    source: &mut R,
    sink: &mut W,
) -> io::Result<()> {
    let mut buf = [0u8; HEADER_LEN];
    source.read_exact(&mut buf)?;
    sink.write_all(&buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_exactly_44_bytes_verbatim() {
        let header: Vec<u8> = (0..HEADER_LEN as u8).collect();
        let mut source: &[u8] = &header;
        let mut sink = Vec::new();
        copy_header(&mut source, &mut sink).unwrap();
        assert_eq!(sink, header);
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let header = [0u8; 10];
        let mut source: &[u8] = &header;
        let mut sink = Vec::new();
        assert!(copy_header(&mut source, &mut sink).is_err());
    }
}
