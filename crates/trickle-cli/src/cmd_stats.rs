/// Implementation of `trickle stats`.
///
/// Pushes the whole file through a [`ZlibStream`], discarding the decoded
/// windows, and prints what the stream counted on the way.
///
/// # Example output
///
/// ```text
/// File:       /tmp/data.z
/// Compressed: 30412 bytes
/// Decoded:    100000 bytes  (ratio 3.29)
///
/// Engine steps           27
/// Windows delivered       4
/// Decoded delivered  100000
/// ```
use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use trickle_stream::{MinizEngine, StreamError, StreamSizes, StreamStats, ZlibStream};

use crate::StatsArgs;
use crate::source::{explain, open_compressed};

/// JSON shape for `--json`.
#[derive(Serialize)]
struct Report<'a> {
    file: &'a str,
    compressed_bytes: usize,
    decoded_bytes: usize,
    ratio: f64,
    engine_steps: u64,
    compressed_consumed: usize,
    decoded_produced: usize,
    decoded_delivered: usize,
    windows_delivered: u64,
}

#[allow(clippy::cast_precision_loss)]
fn ratio(decoded: usize, compressed: usize) -> f64 {
    if compressed == 0 {
        0.0
    } else {
        decoded as f64 / compressed as f64
    }
}

fn discard(_: &mut (), _: &[u8]) -> Result<(), StreamError> {
    Ok(())
}

/// Run the `trickle stats` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the stream fails to
/// decode, or the report cannot be serialised.
pub fn run(args: &StatsArgs) -> Result<()> {
    if args.chunk == 0 {
        bail!("--chunk must be non-zero");
    }

    let (mut file, compressed_len) = open_compressed(&args.file)?;
    let sizes = StreamSizes::new(compressed_len, args.decoded_size);
    let mut ctx: Box<ZlibStream<()>> =
        Box::new(ZlibStream::new_push(MinizEngine::new(), sizes, discard, ())?);

    let mut buf = vec![0u8; args.chunk];
    loop {
        let n = file.read(&mut buf).context("cannot read compressed input")?;
        if n == 0 {
            break;
        }
        ctx.write_compressed(&buf[..n])
            .map_err(|err| explain(err, None))
            .with_context(|| format!("failed to inflate {}", args.file.display()))?;
    }
    if !ctx.is_done() {
        bail!(
            "input ended with {} compressed bytes still expected",
            ctx.remaining_compressed()
        );
    }

    let stats = ctx.stats();
    let path = args.file.display().to_string();
    if args.json {
        let report = Report {
            file: &path,
            compressed_bytes: compressed_len,
            decoded_bytes: args.decoded_size,
            ratio: ratio(args.decoded_size, compressed_len),
            engine_steps: stats.engine_steps,
            compressed_consumed: stats.compressed_consumed,
            decoded_produced: stats.decoded_produced,
            decoded_delivered: stats.decoded_delivered,
            windows_delivered: stats.windows_delivered,
        };
        serde_json::to_writer_pretty(io::stdout().lock(), &report)
            .context("cannot write JSON report")?;
        println!();
    } else {
        print_table(&path, compressed_len, args.decoded_size, &stats);
    }
    Ok(())
}

fn print_table(path: &str, compressed: usize, decoded: usize, stats: &StreamStats) {
    println!("File:       {path}");
    println!("Compressed: {compressed} bytes");
    println!(
        "Decoded:    {decoded} bytes  (ratio {:.2})",
        ratio(decoded, compressed)
    );
    println!();
    println!("{:<22}{:>6}", "Engine steps", stats.engine_steps);
    println!("{:<22}{:>6}", "Windows delivered", stats.windows_delivered);
    println!("{:<22}{:>6}", "Decoded delivered", stats.decoded_delivered);
}
