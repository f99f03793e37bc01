use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Prints text one character at a time.
#[derive(Debug, Clone, Copy)]
pub struct Typewriter {
    delay: Duration,
}

impl Typewriter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Print a line to stdout.
    pub fn line(&self, text: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_line(&mut out, text)
    }

    /// Write `text` and a newline, pausing after each character unless the
    /// delay is zero.
    pub fn write_line<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        if self.delay.is_zero() {
            writeln!(out, "{text}")?;
            return out.flush();
        }
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            out.flush()?;
            if !ch.is_whitespace() {
                thread::sleep(self.delay);
            }
        }
        writeln!(out)?;
        out.flush()
    }
}
