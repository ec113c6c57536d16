// Wavcache -- A lossless codec for cached 16-bit sample streams
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>. This file may not be
// copied, modified, or distributed except according to those terms.

//! `wavcache` is a lossless codec for streams of 16-bit samples framed
//! inside a container whose first 44 bytes are copied verbatim (a
//! WAV-style header). It keeps a small frequency-ordered recency cache
//! synchronised between encoder and decoder; a sample whose position in
//! the cache is small enough is re-emitted as a short cache index using
//! one of three bit-packed layouts, everything else is emitted literally.
//!
//! The four components that make this work each get their own module:
//!
//! - [`cache`] -- the synchronised frequency-ordered cache.
//! - [`packer`] -- the 4-, 6-, and 7-bit index packing layouts.
//! - [`marker`] -- the 16-bit run header tying a run's length, mode, and
//!   packer together.
//! - [`segmenter`] -- the encoder/decoder state machine that divides a
//!   stream into runs and drives the other three.
//!
//! [`header`] is the out-of-scope 44-byte pass-through collaborator;
//! [`encode`] and [`decode`] are thin convenience wrappers composing it
//! with the segmenter for callers working with whole files.

pub mod cache;
pub mod error;
pub mod header;
pub mod marker;
pub mod packer;
pub mod segmenter;

pub use cache::Cache;
pub use error::{CodecResult, Error};
pub use segmenter::{DecodeStats, EncodeStats};

use std::io::{Read, Write};

/// Copies the 44-byte header from `input` to `output`, then encodes the
/// remainder of `input` as 16-bit samples into `output`.
pub fn encode<R: Read, W: Write>(input: &mut R, output: &mut W) -> CodecResult<EncodeStats> {
    header::copy_header(input, output)?;
    segmenter::encode_samples(input, output)
}

/// Copies the 44-byte header from `input` to `output`, then decodes the
/// remainder of `input` back into 16-bit samples written to `output`.
pub fn decode<R: Read, W: Write>(input: &mut R, output: &mut W) -> CodecResult<DecodeStats> {
    header::copy_header(input, output)?;
    segmenter::decode_samples(input, output)
}
