/// Implementation of `trickle inflate`.
///
/// Streams a zlib file through a [`ZlibStream`] and writes the decoded
/// bytes to stdout or `-o <file>`.
///
/// # Modes
///
/// ```text
/// ┌──────┬──────────────────────────────────────────────────────────────────┐
/// │ Mode │ Data flow                                                        │
/// ├──────┼──────────────────────────────────────────────────────────────────┤
/// │ pull │ read_uncompressed(--read) ──► input request reads --chunk bytes  │
/// │ push │ file chunks (--chunk) ──► write_compressed ──► window delivery   │
/// └──────┴──────────────────────────────────────────────────────────────────┘
/// ```
///
/// In pull mode a chunk is also capped at the stream's leftover capacity,
/// since the engine may stop partway through it.
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};

use anyhow::{Context, Result, bail};
use tracing::info;
use trickle_stream::{MinizEngine, StreamSizes, ZlibStream};

use crate::source::{FileSource, WindowSink, deliver_to_writer, explain, feed_from_file, open_compressed};
use crate::{InflateArgs, ModeArg};

/// Run the `trickle inflate` command.
///
/// # Errors
///
/// Returns an error if a flag is zero, a file cannot be opened, read or
/// written, or the stream is corrupt or disagrees with `--decoded-size`.
pub fn run(args: &InflateArgs) -> Result<()> {
    if args.chunk == 0 || args.read == 0 {
        bail!("--chunk and --read must be non-zero");
    }

    let (file, compressed_len) = open_compressed(&args.file)?;
    let sizes = StreamSizes::new(compressed_len, args.decoded_size);

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let written = match args.mode {
        ModeArg::Pull => pull(file, sizes, args, out)?,
        ModeArg::Push => push(file, sizes, args.chunk, out)?,
    };

    info!(
        compressed = compressed_len,
        decoded = written,
        mode = ?args.mode,
        "inflate complete"
    );
    Ok(())
}

// ── Pull ──────────────────────────────────────────────────────────────────────

fn pull(file: File, sizes: StreamSizes, args: &InflateArgs, mut out: Box<dyn Write>) -> Result<usize> {
    let mut ctx: Box<ZlibStream<FileSource>> = Box::new(ZlibStream::new_pull(
        MinizEngine::new(),
        sizes,
        feed_from_file,
        FileSource::new(file, args.chunk),
    )?);

    let mut buf = vec![0u8; args.read];
    let mut written = 0;
    while ctx.remaining_decoded() > 0 {
        let n = args.read.min(ctx.remaining_decoded());
        if let Err(err) = ctx.read_uncompressed(&mut buf[..n]) {
            return Err(explain(err, ctx.user_mut().error.take()))
                .with_context(|| format!("failed to inflate {}", args.file.display()));
        }
        out.write_all(&buf[..n]).context("cannot write decoded output")?;
        written += n;
    }

    if !ctx.is_done() {
        bail!(
            "all {written} decoded bytes read but the stream did not finish ({} compressed bytes still expected)",
            ctx.remaining_compressed()
        );
    }
    out.flush().context("cannot flush decoded output")?;
    Ok(written)
}

// ── Push ──────────────────────────────────────────────────────────────────────

fn push(mut file: File, sizes: StreamSizes, chunk: usize, out: Box<dyn Write>) -> Result<usize> {
    let mut ctx: Box<ZlibStream<WindowSink>> = Box::new(ZlibStream::new_push(
        MinizEngine::new(),
        sizes,
        deliver_to_writer,
        WindowSink::new(out),
    )?);

    let mut buf = vec![0u8; chunk];
    loop {
        let n = file.read(&mut buf).context("cannot read compressed input")?;
        if n == 0 {
            break;
        }
        if let Err(err) = ctx.write_compressed(&buf[..n]) {
            return Err(explain(err, ctx.user_mut().error.take())).context("failed to inflate");
        }
    }

    if !ctx.is_done() {
        bail!(
            "input ended with {} compressed bytes still expected",
            ctx.remaining_compressed()
        );
    }

    let sink = ctx.user_mut();
    sink.flush().context("cannot flush decoded output")?;
    Ok(sink.written)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("trickle-cli-{}-{name}", std::process::id()))
    }

    fn args(file: PathBuf, decoded_size: usize, mode: ModeArg, output: PathBuf) -> InflateArgs {
        InflateArgs {
            file,
            decoded_size,
            mode,
            chunk: 1,
            read: 1000,
            output: Some(output),
        }
    }

    fn payload() -> Vec<u8> {
        (0..32_768u32).map(|i| (i * 7 % 251) as u8).collect()
    }

    #[test]
    fn window_multiple_inflates_in_both_modes() {
        let data = payload();
        let input = temp_path("ok.z");
        fs::write(&input, miniz_oxide::deflate::compress_to_vec_zlib(&data, 6)).unwrap();

        for mode in [ModeArg::Pull, ModeArg::Push] {
            let output = temp_path(&format!("ok-{mode:?}.out"));
            run(&args(input.clone(), data.len(), mode, output.clone())).unwrap();
            assert_eq!(fs::read(&output).unwrap(), data, "{mode:?}");
            fs::remove_file(output).ok();
        }
        fs::remove_file(input).ok();
    }

    #[test]
    fn corrupt_trailer_fails_in_both_modes() {
        let data = payload();
        let mut compressed = miniz_oxide::deflate::compress_to_vec_zlib(&data, 6);
        let last = compressed.len() - 1;
        compressed[last] ^= 0xFF;
        let input = temp_path("corrupt.z");
        fs::write(&input, compressed).unwrap();

        for mode in [ModeArg::Pull, ModeArg::Push] {
            let output = temp_path(&format!("corrupt-{mode:?}.out"));
            assert!(run(&args(input.clone(), data.len(), mode, output.clone())).is_err(), "{mode:?}");
            fs::remove_file(output).ok();
        }
        fs::remove_file(input).ok();
    }
}
