// Wavcache -- A lossless codec for cached 16-bit sample streams
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>. This file may not be
// copied, modified, or distributed except according to those terms.

fn main() {
    use std::env;
    use std::fs;
    use std::io;

    let in_path = env::args().nth(1).expect("usage: encode <in.wav> <out.cache>");
    let out_path = env::args().nth(2).expect("usage: encode <in.wav> <out.cache>");

    let input = fs::File::open(&in_path).expect("failed to open input file");
    let mut reader = io::BufReader::new(input);

    let output = fs::File::create(&out_path).expect("failed to create output file");
    let mut writer = io::BufWriter::new(output);

    let stats = wavcache::encode(&mut reader, &mut writer).expect("encode failed");
    io::Write::flush(&mut writer).expect("failed to flush output");

    eprintln!(
        "samples_written={} encoded_runs={} literal_runs={}",
        stats.samples_written, stats.encoded_runs, stats.literal_runs
    );
}
