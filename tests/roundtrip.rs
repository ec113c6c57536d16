// Wavcache -- A lossless codec for cached 16-bit sample streams
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>. This file may not be
// copied, modified, or distributed except according to those terms.

//! End-to-end encode/decode round trips over the whole-file entry
//! points: empty bodies, all-literal cache warm-up, packer-boundary
//! splits, and mixed hit/miss runs. Scenarios that pin down a specific
//! segmentation choice also inspect `EncodeStats` and the raw marker
//! sequence, not just round-trip equality -- a segmenter that always
//! fell back to literal runs would still pass a round-trip-only check.

use wavcache::header::HEADER_LEN;
use wavcache::marker::{decode_marker, Decoded, Mode};
use wavcache::packer::spec_for;
use wavcache::EncodeStats;

fn header_bytes() -> Vec<u8> {
    (0..HEADER_LEN as u8).collect()
}

fn samples_to_bytes(samples: &[u16]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        buf.extend_from_slice(&s.to_le_bytes());
    }
    buf
}

fn bytes_to_samples(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

/// One block as it actually appears on the wire: which mode, how many
/// samples, and (for encoded runs) which packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunDesc {
    Literal(u16),
    Encoded(u16, u32),
}

/// Walks the encoded body after the 44-byte header, decoding each marker
/// and skipping its payload, to recover the exact run sequence the
/// segmenter chose.
fn parse_runs(encoded: &[u8]) -> Vec<RunDesc> {
    let mut runs = Vec::new();
    let mut pos = HEADER_LEN;
    loop {
        let word = u16::from_le_bytes([encoded[pos], encoded[pos + 1]]);
        pos += 2;
        match decode_marker(word).expect("invalid marker in encoded output") {
            Decoded::EndOfStream => break,
            Decoded::Marker(m) => match m.mode {
                Mode::Literal => {
                    runs.push(RunDesc::Literal(m.count));
                    pos += m.count as usize * 2;
                }
                Mode::Encoded => {
                    runs.push(RunDesc::Encoded(m.count, m.encoding_size));
                    let spec = spec_for(m.encoding_size).expect("unsupported packer size on wire");
                    let groups = m.count as usize / spec.unpacked_len;
                    pos += groups * spec.packed_len;
                }
            },
        }
    }
    runs
}

struct Roundtrip {
    samples: Vec<u16>,
    stats: EncodeStats,
    encoded: Vec<u8>,
}

fn roundtrip_file(samples: &[u16]) -> Roundtrip {
    let mut input = header_bytes();
    input.extend_from_slice(&samples_to_bytes(samples));

    let mut encoded = Vec::new();
    let mut src: &[u8] = &input;
    let stats = wavcache::encode(&mut src, &mut encoded).expect("encode failed");

    let mut decoded = Vec::new();
    let mut enc_src: &[u8] = &encoded;
    wavcache::decode(&mut enc_src, &mut decoded).expect("decode failed");

    assert_eq!(&decoded[..HEADER_LEN], &header_bytes()[..]);
    Roundtrip { samples: bytes_to_samples(&decoded[HEADER_LEN..]), stats, encoded }
}

#[test]
fn scenario_a_empty_body() {
    let result = roundtrip_file(&[]);
    assert_eq!(result.samples, Vec::<u16>::new());
    assert_eq!(result.stats, EncodeStats::default());
    assert_eq!(parse_runs(&result.encoded), Vec::new());
}

#[test]
fn scenario_b_all_literal_cache_warm_up() {
    let samples = [100u16, 200, 300, 400, 500];
    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples.to_vec());
    assert_eq!(result.stats.literal_runs, 1);
    assert_eq!(result.stats.encoded_runs, 0);
    assert_eq!(result.stats.samples_written, 5);
    assert_eq!(parse_runs(&result.encoded), vec![RunDesc::Literal(5)]);
}

#[test]
fn scenario_c_hit_run_picks_smallest_size() {
    // Warm the cache with six distinct samples so they settle at cache
    // indices 0..=5 in insertion order (no promotions happen: every
    // count is tied at 1). Then hammer indices 0 and 1 -- every index
    // fits the 4-bit packer, which must be preferred over 6- or 7-bit
    // packers for the same run since it packs the same samples into
    // fewer bytes.
    let mut samples: Vec<u16> = (1u16..=6).collect();
    let x = 1u16;
    let y = 2u16;
    samples.extend_from_slice(&[x, x, y, y, x, y, x, y]);

    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples);
    assert_eq!(result.stats.literal_runs, 1);
    assert_eq!(result.stats.encoded_runs, 1);
    assert_eq!(result.stats.samples_written, samples.len() as u64);
    assert_eq!(
        parse_runs(&result.encoded),
        vec![RunDesc::Literal(6), RunDesc::Encoded(8, 4)],
        "the 8-sample hit run must be packed with the 4-bit packer, not 6- or 7-bit"
    );
}

#[test]
fn scenario_d_packer_boundary_forces_split() {
    // Warm the cache with 120 distinct samples (cache indices 0..120 in
    // insertion order), so `w` ends up at index 5 (fits 4 bits) and `z`
    // at index 119 (needs 7 bits, too wide for 4 or 6 bits). The
    // segmenter must therefore split the hit run in two: the 4-bit
    // packer is cheaper for the `w` group even though the 7-bit packer
    // could also represent it, and only the 7-bit packer can represent
    // the `z` group at all.
    let mut samples: Vec<u16> = (0u16..120).collect();
    let w = 5u16;
    let z = 119u16;
    samples.extend_from_slice(&[w, w, w, w, z, z, z, z, z, z, z, z]);

    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples);
    assert_eq!(result.stats.literal_runs, 1);
    assert_eq!(result.stats.encoded_runs, 2);
    assert_eq!(result.stats.samples_written, samples.len() as u64);
    assert_eq!(
        parse_runs(&result.encoded),
        vec![
            RunDesc::Literal(120),
            RunDesc::Encoded(4, 4),
            RunDesc::Encoded(8, 7),
        ],
        "the w-run must use the 4-bit packer and the z-run must split off into the 7-bit packer"
    );
}

#[test]
fn scenario_e_mixed_hit_and_miss() {
    let mut samples: Vec<u16> = vec![10, 11, 12];
    samples.extend_from_slice(&[9001, 9002]);
    samples.extend_from_slice(&[10, 11, 12, 10, 11, 12, 10]);
    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples);
    assert_eq!(result.stats.samples_written, samples.len() as u64);
    assert!(result.stats.encoded_runs > 0, "some of the repeated 10/11/12 tail must be cache-encoded");
}

#[test]
fn scenario_f_fallback_literal_guarantees_progress() {
    // A long run of samples that are never repeated forces every run to
    // fall back to a literal block via the `m == 0` fallback path or the
    // miss-prefix path.
    let samples: Vec<u16> = (1000u16..1064).collect();
    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples);
    assert_eq!(result.stats.encoded_runs, 0);
    assert_eq!(result.stats.samples_written, samples.len() as u64);
}

#[test]
fn large_stream_with_repetition_roundtrips() {
    let mut samples = Vec::new();
    for i in 0..20_000u32 {
        samples.push((i % 503) as u16);
    }
    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples);
    assert_eq!(result.stats.samples_written, samples.len() as u64);
}

#[test]
fn all_zero_samples_roundtrip() {
    let samples = vec![0u16; 4096];
    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples);
    assert!(result.stats.encoded_runs > 0, "4096 repeats of the same sample must be cache-encoded");
}

#[test]
fn cache_capacity_boundary_roundtrips() {
    // More distinct values than the cache can hold, forcing eviction,
    // followed by samples that were evicted re-entering as misses.
    let mut samples: Vec<u16> = (0u16..1500).collect();
    samples.extend_from_slice(&[0, 1, 2, 1499, 1498]);
    let result = roundtrip_file(&samples);
    assert_eq!(result.samples, samples);
    assert_eq!(result.stats.samples_written, samples.len() as u64);
}
