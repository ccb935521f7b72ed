//! Standalone probe for sequential vs strided traversal, meant to be
//! run under perf to watch cache-miss counters.

use std::time::Instant;

const DATA_SIZE: usize = 64 * 1024 * 1024;
const STRIDES: usize = 16;

fn main() {
    env_logger::init();

    let data = vec![1u8; DATA_SIZE];
    assert!(data.len().is_multiple_of(STRIDES));

    let start = Instant::now();
    let mut sum = 0f64;
    for &num in &data {
        sum += num as f64;
    }
    log::info!("Sum: {sum}");
    log::info!("Time to add numbers linear: {:?}", start.elapsed());

    // Walk the same buffer as STRIDES interleaved columns, so each
    // iteration touches locations a large fixed stride apart.
    let column = data.len() / STRIDES;
    let start = Instant::now();
    let mut sum = 0f64;
    for i in 0..column {
        for j in 0..STRIDES {
            sum += data[j * column + i] as f64;
        }
    }
    log::info!("Sum: {sum}");
    log::info!("Time to add numbers strided: {:?}", start.elapsed());
}

// See stats on cache miss percentage, instruction throughput, etc.:
//  sudo perf stat -B -e cache-references,cache-misses,cycles,instructions,branches ./target/release/stride_probe
// or
//  sudo perf stat -d ./target/release/stride_probe
