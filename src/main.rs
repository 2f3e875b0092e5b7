use std::io::{self, BufRead, Write};

use log::warn;
use vireon_os::{System, CLEAR_MARKER};

/// Prints one `exec` result, turning the clear marker into ANSI.
fn emit(out: &str) {
    if out.is_empty() {
        return;
    }
    let out = out.replace(CLEAR_MARKER, "\x1b[2J\x1b[H");
    if out.ends_with('\n') {
        println!("{}", out);
    } else {
        println!("{}\n", out);
    }
}

/// Next input line without its terminator. Bytes that are not UTF-8 are
/// replaced rather than rejected; `None` only at end of input.
fn read_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn main() {
    env_logger::init();

    let seed = std::env::var("VIREON_SEED")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok());
    let mut system = match seed {
        Some(s) => System::with_seed(s),
        None => System::new(),
    };

    emit(&system.start());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut buf = Vec::new();
    while system.is_running() {
        print!("{}", system.prompt());
        let _ = io::stdout().flush();
        match read_line(&mut input, &mut buf) {
            Ok(Some(line)) => emit(&system.exec(&line)),
            Ok(None) => {
                println!();
                break;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("stdin: {}", e);
                println!();
                break;
            }
        }
    }
}
