use crate::router::LineSink;
use crate::types::ShellError;
use bytes::BytesMut;
use log::{debug, warn};
use std::ffi::OsStr;
use std::io::{self, ErrorKind, Read};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};

const CHANNEL_CAPACITY: usize = 64;
const READ_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Run `program` to completion, forwarding each line it prints to the
/// matching sink as soon as it arrives.
///
/// `argv0` is what the child sees as its own name; `args` follow it verbatim.
pub fn run<I, S>(
    program: &Path,
    argv0: &str,
    args: I,
    stdout: &mut dyn LineSink,
    stderr: &mut dyn LineSink,
) -> Result<ExitStatus, ShellError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut child = Command::new(program)
        .arg0(argv0)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ShellError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;
    debug!("spawned {} as pid {}", program.display(), child.id());

    let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
    let mut readers = Vec::with_capacity(2);
    if let Some(out) = child.stdout.take() {
        readers.push(spawn_reader(out, Stream::Stdout, tx.clone()));
    }
    if let Some(err) = child.stderr.take() {
        readers.push(spawn_reader(err, Stream::Stderr, tx.clone()));
    }
    drop(tx);

    // Keep draining after a sink error so the child never blocks on a full pipe.
    let mut forwarded: io::Result<()> = Ok(());
    for (stream, line) in rx {
        let sink: &mut dyn LineSink = match stream {
            Stream::Stdout => &mut *stdout,
            Stream::Stderr => &mut *stderr,
        };
        if let Err(e) = sink.write_line(&line) {
            if forwarded.is_ok() {
                forwarded = Err(e);
            }
        }
    }

    for reader in readers {
        match reader.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("reading child output failed: {}", e),
            Err(_) => warn!("child output reader panicked"),
        }
    }

    let status = child.wait()?;
    debug!("{} exited with {}", program.display(), status);
    forwarded?;
    Ok(status)
}

fn spawn_reader<R>(reader: R, stream: Stream, tx: SyncSender<(Stream, String)>) -> JoinHandle<io::Result<()>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || pump(reader, stream, &tx))
}

/// Split a byte stream into lines. A trailing fragment without a newline is
/// still delivered when the stream closes.
fn pump<R: Read>(mut reader: R, stream: Stream, tx: &SyncSender<(Stream, String)>) -> io::Result<()> {
    let mut pending = BytesMut::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        pending.extend_from_slice(&chunk[..n]);
        while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
            let line = pending.split_to(pos + 1);
            if tx.send((stream, decode(&line[..pos]))).is_err() {
                return Ok(());
            }
        }
    }
    if !pending.is_empty() {
        let _ = tx.send((stream, decode(&pending)));
    }
    Ok(())
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lines(input: &[u8]) -> Vec<String> {
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
        pump(Cursor::new(input.to_vec()), Stream::Stdout, &tx).unwrap();
        drop(tx);
        rx.into_iter().map(|(_, line)| line).collect()
    }

    #[test]
    fn splits_on_newlines() {
        assert_eq!(lines(b"one\ntwo\n"), vec!["one", "two"]);
    }

    #[test]
    fn keeps_blank_lines() {
        assert_eq!(lines(b"a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn delivers_unterminated_tail() {
        assert_eq!(lines(b"one\ntail"), vec!["one", "tail"]);
        assert!(lines(b"").is_empty());
    }

    #[test]
    fn decodes_invalid_utf8_lossily() {
        assert_eq!(lines(b"a\xffb\n"), vec!["a\u{fffd}b"]);
    }
}
