use std::io::{self, Write};

/// Writes `text` to stdout, treating a closed pipe (`churnpilot ... | head`)
/// as success.
pub fn write_stdout(text: &str, trailing_newline: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    tolerate_broken_pipe(write_text(&mut stdout, text, trailing_newline))
}

fn write_text(writer: &mut impl Write, text: &str, trailing_newline: bool) -> io::Result<()> {
    writer.write_all(text.as_bytes())?;
    if trailing_newline {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
