//! The toy applications. Each one is either a single rendered view or a short
//! prompt that consumes the next input line.

use crate::kernel::SystemLog;
use crate::ui::{ascii_border, loading_bar};
use crate::vfs::Vfs;
use rand::Rng;
use thiserror::Error;

pub const NOTES_FILE: &str = "notes.txt";

const VIDEOS: [&str; 5] = [
    "Funny Cats",
    "Coding Tutorial",
    "VireonOS Demo",
    "ASCII Music",
    "Retro DOS",
];

/// An app waiting for its next line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppPrompt {
    WriteFile(String),
    EnvChoice,
    Guess(u32),
    Calculator,
    Notes,
    Youtube,
}

impl AppPrompt {
    pub fn prompt(&self) -> &'static str {
        match self {
            AppPrompt::WriteFile(_) => "Enter text (single line will be saved): ",
            AppPrompt::EnvChoice => "Select number: ",
            AppPrompt::Guess(_) => "Guess number (1-20): ",
            AppPrompt::Calculator => "> ",
            AppPrompt::Notes => "",
            AppPrompt::Youtube => "Choose: ",
        }
    }

    /// Blank input is meaningful text for these; everywhere else it re-prompts.
    pub fn takes_blank_lines(&self) -> bool {
        matches!(self, AppPrompt::WriteFile(_) | AppPrompt::Notes)
    }
}

pub fn start_guess<R: Rng>(rng: &mut R) -> AppPrompt {
    AppPrompt::Guess(rng.gen_range(1..=20))
}

pub fn guess(secret: u32, line: &str, log: &mut SystemLog) -> String {
    if line.trim().parse::<u32>().ok() == Some(secret) {
        log.append("guessGame: user guessed correctly");
        "Correct! You win!".into()
    } else {
        log.append("guessGame: user guessed wrong");
        format!("Wrong! The number was {}", secret)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Error: expected num1 operator num2")]
    Parse,
    #[error("Error: division by zero")]
    DivisionByZero,
    #[error("Unknown operator")]
    UnknownOperator,
}

fn split_expr(expr: &str) -> Result<(&str, &str, &str), CalcError> {
    let parts: Vec<&str> = expr.split_whitespace().collect();
    if let [a, op, b] = parts.as_slice() {
        return Ok((*a, *op, *b));
    }
    let expr = expr.trim();
    // skip a leading sign on the first operand
    let pos = expr
        .char_indices()
        .skip(1)
        .find(|(_, c)| matches!(c, '+' | '-' | '*' | '/' | '%' | '^'))
        .map(|(i, _)| i)
        .ok_or(CalcError::Parse)?;
    Ok((&expr[..pos], &expr[pos..pos + 1], &expr[pos + 1..]))
}

pub fn calculate(expr: &str) -> Result<f64, CalcError> {
    let (a, op, b) = split_expr(expr)?;
    let a: f64 = a.trim().parse().map_err(|_| CalcError::Parse)?;
    let b: f64 = b.trim().parse().map_err(|_| CalcError::Parse)?;
    match op {
        "+" => Ok(a + b),
        "-" => Ok(a - b),
        "*" => Ok(a * b),
        "/" if b == 0.0 => Err(CalcError::DivisionByZero),
        "/" => Ok(a / b),
        _ => Err(CalcError::UnknownOperator),
    }
}

pub fn calculator(line: &str) -> String {
    match calculate(line) {
        Ok(res) => format!("Result: {}", res),
        Err(e) => e.to_string(),
    }
}

/// One notes line. `None` means the user typed the terminating `.`.
pub fn note_line(line: &str, fs: &mut Vfs, log: &mut SystemLog) -> Option<String> {
    if line.trim_end() == "." {
        return None;
    }
    fs.append(NOTES_FILE, &format!("{}\n", line));
    log.append("Note added");
    Some(String::new())
}

pub fn paint<R: Rng>(rng: &mut R) -> String {
    let mut out = ascii_border("PAINT - ASCII CANVAS", 48);
    for _ in 0..8 {
        let row: String = (0..40)
            .map(|_| if rng.gen_ratio(1, 3) { '#' } else { ' ' })
            .collect();
        out.push_str(&format!("| {} |\n", row));
    }
    out.push_str(&ascii_border("END PAINT", 48));
    out
}

pub fn music_player<R: Rng>(rng: &mut R, log: &mut SystemLog) -> String {
    let mut out = ascii_border("MUSICPLAYER", 48);
    out.push_str(" Now playing: 'Synthetic Waves' [demo]\n\n");
    for _ in 0..12 {
        let wave: String = (0..30)
            .map(|j| match (rng.gen_ratio(1, 3), j % 2) {
                (true, 1) => '+',
                (true, _) => '~',
                _ => ' ',
            })
            .collect();
        out.push_str(&format!("   {}\n", wave));
    }
    out.push_str(&ascii_border("END MUSIC", 48));
    log.append("musicPlayer: played Synthetic Waves");
    out
}

pub fn youtube_menu() -> String {
    let mut out = ascii_border("YOUTUBE ASCII BETA", 64);
    out.push_str("Select demo video (1-5):\n");
    for (i, v) in VIDEOS.iter().enumerate() {
        out.push_str(&format!("{}) {}\n", i + 1, v));
    }
    out
}

pub fn youtube_play<R: Rng>(line: &str, rng: &mut R) -> String {
    let title = line
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| VIDEOS.get(i));
    let Some(title) = title else {
        return "Invalid".into();
    };
    let mut out = loading_bar("Preparing video", 24);
    out.push_str(&format!("Playing video: {}\n", title));
    for f in 0..15 {
        let frame: String = (0..40)
            .map(|_| if rng.gen_ratio(1, 3) { '*' } else { ' ' })
            .collect();
        out.push_str(&format!("Frame {}: [{}]\n", f + 1, frame));
    }
    out.push_str("Video ended.\n");
    out
}
