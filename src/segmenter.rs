// Wavcache -- A lossless codec for cached 16-bit sample streams
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>. This file may not be
// copied, modified, or distributed except according to those terms.

//! Drives the encoder and decoder state machines: divides the sample
//! stream into runs, picks a packer per encoded run, and emits or
//! interprets the markers and payloads that tie the cache and the
//! packers together.
//!
//! This is the only module that mutates a [`Cache`] during a session, and
//! it does so identically on the encode and decode sides -- that
//! symmetry is what lets the two sides stay synchronised.

use std::io::{ErrorKind, Read, Write};

use crate::cache::Cache;
use crate::error::{CodecResult, Error};
use crate::marker::{self, Decoded, Marker, Mode};
use crate::packer::{self, PACKERS};

/// Maximum number of samples read into one working chunk. Matches the
/// largest run a marker can express, since a chunk boundary is also a
/// valid run boundary.
const CHUNK_SAMPLES: usize = marker::MAX_COUNT as usize;

/// Largest a literal run is allowed to grow before it is forced to end.
const MAX_LITERAL_RUN: usize = 127;

/// The fallback literal run length used when no packer can encode the
/// next sample and it is not a full miss either (spec.md's "use
/// Packers[7].unpacked_len as the literal chunk size").
const FALLBACK_LITERAL_RUN: usize = 8;

/// Facts about an encode session, returned for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub samples_written: u64,
    pub encoded_runs: u64,
    pub literal_runs: u64,
}

/// Facts about a decode session, returned for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub samples_written: u64,
    pub encoded_runs: u64,
    pub literal_runs: u64,
}

fn read_u16le<R: Read>(r: &mut R) -> CodecResult<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => Error::TruncatedStream,
        _ => Error::Io(e),
    })?;
    Ok(u16::from_le_bytes(buf))
}

fn try_read_u16le<R: Read>(r: &mut R) -> CodecResult<Option<u16>> {
    let mut buf = [0u8; 2];
    let mut filled = 0;
    while filled < 2 {
        match r.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    match filled {
        0 => Ok(None),
        2 => Ok(Some(u16::from_le_bytes(buf))),
        _ => Err(Error::TruncatedStream),
    }
}

fn write_u16le<W: Write>(w: &mut W, v: u16) -> CodecResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_exact_or_truncated<R: Read>(r: &mut R, buf: &mut [u8]) -> CodecResult<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => Error::TruncatedStream,
        _ => Error::Io(e),
    })
}

/// Reads up to `CHUNK_SAMPLES` 16-bit little-endian samples into `buf`,
/// clearing it first. Returns the number read; 0 means the source is
/// exhausted.
fn fill_chunk<R: Read>(source: &mut R, buf: &mut Vec<u16>) -> CodecResult<()> {
    buf.clear();
    for _ in 0..CHUNK_SAMPLES {
        match try_read_u16le(source)? {
            Some(sample) => buf.push(sample),
            None => break,
        }
    }
    Ok(())
}

/// Longest prefix of `samples[pos..]` whose cache index fits under
/// `max_index`, read-only against `cache` (no mutation).
fn hit_prefix_len(samples: &[u16], pos: usize, cache: &Cache, max_index: u32) -> usize {
    let mut k = 0;
    while pos + k < samples.len() {
        match cache.index(samples[pos + k]) {
            Some(idx) if idx as u32 <= max_index => k += 1,
            _ => break,
        }
    }
    k
}

/// Longest prefix of `samples[pos..]` that misses the cache entirely,
/// capped at [`MAX_LITERAL_RUN`].
fn miss_prefix_len(samples: &[u16], pos: usize, cache: &Cache) -> usize {
    let mut m = 0;
    while pos + m < samples.len() && m < MAX_LITERAL_RUN && cache.index(samples[pos + m]).is_none()
    {
        m += 1;
    }
    m
}

/// The outcome of one segmentation decision.
enum Run {
    Encoded { count: usize, encoding_size: u32 },
    Literal { count: usize },
}

/// Picks the next run starting at `pos` in `samples`, per spec.md \S4.4.
fn choose_run(samples: &[u16], pos: usize, cache: &Cache) -> Run {
    let remaining = samples.len() - pos;

    let mut best: Option<(u32, usize, usize)> = None; // (bytes, count, size)
    for spec in &PACKERS {
        let raw_k = hit_prefix_len(samples, pos, cache, spec.max_index);
        let k = raw_k - (raw_k % spec.unpacked_len);
        if k == 0 {
            continue;
        }
        let bytes = (k / spec.unpacked_len) * spec.packed_len;
        let better = match best {
            None => true,
            Some((best_bytes, _, _)) => (bytes as u32) < best_bytes,
        };
        if better {
            best = Some((bytes as u32, k, spec.encoding_size));
        }
    }

    if let Some((_, count, encoding_size)) = best {
        return Run::Encoded { count, encoding_size };
    }

    let m = miss_prefix_len(samples, pos, cache);
    if m > 0 {
        Run::Literal { count: m }
    } else {
        Run::Literal { count: remaining.min(FALLBACK_LITERAL_RUN) }
    }
}

/// Encodes one run starting at `pos`, advancing `cache` and writing to
/// `sink`. Returns the number of samples consumed.
fn emit_run<W: Write>(
    samples: &[u16],
    pos: usize,
    cache: &mut Cache,
    sink: &mut W,
    stats: &mut EncodeStats,
) -> CodecResult<usize> {
    match choose_run(samples, pos, cache) {
        Run::Encoded { count, encoding_size } => {
            let spec = packer::spec_for(encoding_size)?;
            write_u16le(
                sink,
                marker::encode_marker(Marker {
                    mode: Mode::Encoded,
                    count: count as u16,
                    encoding_size,
                })?,
            )?;

            for group_start in (0..count).step_by(spec.unpacked_len) {
                let mut indices = Vec::with_capacity(spec.unpacked_len);
                for j in 0..spec.unpacked_len {
                    let sample = samples[pos + group_start + j];
                    let idx = cache.index(sample).ok_or(Error::InvariantViolation)?;
                    if idx as u32 > spec.max_index {
                        return Err(Error::InvariantViolation);
                    }
                    indices.push(idx as u32);
                    cache.add(sample);
                }
                let packed = packer::pack(&indices, encoding_size)?;
                sink.write_all(&packed)?;
            }

            stats.encoded_runs += 1;
            stats.samples_written += count as u64;
            Ok(count)
        }
        Run::Literal { count } => {
            write_u16le(
                sink,
                marker::encode_marker(Marker { mode: Mode::Literal, count: count as u16, encoding_size: 0 })?,
            )?;
            for j in 0..count {
                let sample = samples[pos + j];
                write_u16le(sink, sample)?;
                cache.add(sample);
            }
            stats.literal_runs += 1;
            stats.samples_written += count as u64;
            Ok(count)
        }
    }
}

/// Encodes a stream of 16-bit samples read from `samples` into `sink`,
/// terminated by a zero marker word.
pub fn encode_samples<R: Read, W: Write>(samples: &mut R, sink: &mut W) -> CodecResult<EncodeStats> {
    let mut cache = Cache::new();
    let mut stats = EncodeStats::default();
    let mut chunk = Vec::with_capacity(CHUNK_SAMPLES);

    loop {
        fill_chunk(samples, &mut chunk)?;
        if chunk.is_empty() {
            break;
        }

        let mut pos = 0;
        while pos < chunk.len() {
            let consumed = emit_run(&chunk, pos, &mut cache, sink, &mut stats)?;
            debug_assert!(consumed > 0, "segmenter must always make forward progress");
            pos += consumed;
        }
    }

    write_u16le(sink, 0)?;
    Ok(stats)
}

/// Decodes a byte stream produced by [`encode_samples`] back into 16-bit
/// samples written to `sink`.
pub fn decode_samples<R: Read, W: Write>(source: &mut R, sink: &mut W) -> CodecResult<DecodeStats> {
    let mut cache = Cache::new();
    let mut stats = DecodeStats::default();

    loop {
        let word = match try_read_u16le(source)? {
            None => break,
            Some(w) => w,
        };

        match marker::decode_marker(word)? {
            Decoded::EndOfStream => break,
            Decoded::Marker(Marker { mode: Mode::Encoded, count, encoding_size }) => {
                let spec = packer::spec_for(encoding_size)?;
                let mut remaining = count as usize;
                while remaining > 0 {
                    let mut packed = vec![0u8; spec.packed_len];
                    read_exact_or_truncated(source, &mut packed)?;
                    let indices = packer::unpack(&packed, encoding_size)?;
                    for idx in indices {
                        if idx as usize >= cache.len() {
                            return Err(Error::CacheOutOfRange);
                        }
                        let sample = cache.at(idx as usize);
                        write_u16le(sink, sample)?;
                        cache.add(sample);
                    }
                    remaining -= spec.unpacked_len;
                }
                stats.encoded_runs += 1;
                stats.samples_written += count as u64;
            }
            Decoded::Marker(Marker { mode: Mode::Literal, count, .. }) => {
                for _ in 0..count {
                    let sample = read_u16le(source)?;
                    write_u16le(sink, sample)?;
                    cache.add(sample);
                }
                stats.literal_runs += 1;
                stats.samples_written += count as u64;
            }
        }
    }

    Ok(stats)
}
