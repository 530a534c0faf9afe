//! Proxy benchmark: Measure write throughput through a `FileProxy`.
//!
//! Target: < 2µs per styled line

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fileproxy::{AnsiDecoder, Console, ConsoleConfig, FileProxy};
use std::io::{self, Write};

/// Build `lines` lines of log-like output, every other one colored.
fn create_log(lines: usize) -> String {
    let mut log = String::new();
    for i in 0..lines {
        if i % 2 == 0 {
            log.push_str(&format!("\x1b[32mINFO\x1b[0m request {i} took 12ms\n"));
        } else {
            log.push_str(&format!("\x1b[1;31mWARN\x1b[0m retry {i} of 3\n"));
        }
    }
    log
}

fn plain_console() -> Console<io::Sink> {
    Console::with_config(
        io::sink(),
        ConsoleConfig {
            width: Some(80),
            ..ConsoleConfig::default()
        },
    )
}

fn decode_styled_lines(c: &mut Criterion) {
    let log = create_log(100);

    c.bench_function("decode_100_lines", |b| {
        b.iter(|| {
            let mut decoder = AnsiDecoder::new();
            decoder.decode(black_box(&log))
        })
    });
}

fn proxy_whole_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("proxy_write");

    for lines in [1, 10, 100] {
        let log = create_log(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &log, |b, log| {
            let mut console = plain_console();
            let mut proxy = FileProxy::new(&mut console, io::sink());
            b.iter(|| proxy.write_text(black_box(log)))
        });
    }

    group.finish();
}

fn proxy_fragmented_writes(c: &mut Criterion) {
    let log = create_log(20);
    let fragments: Vec<&[u8]> = log.as_bytes().chunks(7).collect();

    c.bench_function("proxy_write_7_byte_fragments", |b| {
        let mut console = plain_console();
        let mut proxy = FileProxy::new(&mut console, io::sink());
        b.iter(|| {
            for fragment in &fragments {
                proxy.write_all(black_box(fragment)).unwrap();
            }
        })
    });
}

fn proxy_pending_flush(c: &mut Criterion) {
    c.bench_function("proxy_flush_pending", |b| {
        let mut console = plain_console();
        let mut proxy = FileProxy::new(&mut console, io::sink());
        b.iter(|| {
            proxy.write_text(black_box("progress: 42%")).unwrap();
            proxy.flush_pending().unwrap();
        })
    });
}

criterion_group!(
    benches,
    decode_styled_lines,
    proxy_whole_writes,
    proxy_fragmented_writes,
    proxy_pending_flush,
);

criterion_main!(benches);
