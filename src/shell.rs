use crate::error::{ShellError, ShellResult};
use crate::kernel::{CURRENT_USER, HOSTNAME};

/// How a verb takes its argument.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arity {
    /// Exact match, nothing may follow.
    Bare,
    /// Rest of the line, original casing kept. Required.
    Text,
    /// A single integer. Required.
    Index,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arg<'a> {
    None,
    Text(&'a str),
    Index(usize),
}

impl<'a> Arg<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Arg::Text(t) => *t,
            _ => "",
        }
    }
    pub fn index(&self) -> usize {
        match self {
            Arg::Index(n) => *n,
            _ => 0,
        }
    }
}

pub struct CommandSpec<V> {
    pub name: &'static str,
    pub arity: Arity,
    pub verb: V,
    pub usage: &'static str,
    pub category: Option<&'static str>,
    pub summary: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Invocation<'a, V> {
    pub verb: V,
    pub arg: Arg<'a>,
}

/// Looks the first word up (case-insensitively) and checks the argument
/// against the verb's arity.
pub fn parse<'a, V: Copy>(
    table: &[CommandSpec<V>],
    line: &'a str,
) -> ShellResult<Invocation<'a, V>> {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (trimmed, ""),
    };
    let name = head.to_lowercase();
    let spec = table
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| ShellError::UnknownCommand(trimmed.into()))?;
    let arg = match spec.arity {
        Arity::Bare if rest.is_empty() => Arg::None,
        Arity::Bare => return Err(ShellError::UnknownCommand(trimmed.into())),
        Arity::Text if rest.is_empty() => return Err(ShellError::Usage(spec.usage)),
        Arity::Text => Arg::Text(rest),
        // negative numbers parse but land on 0, which no 1-based index accepts
        Arity::Index => rest
            .parse::<i64>()
            .map(|n| Arg::Index(usize::try_from(n).unwrap_or(0)))
            .map_err(|_| ShellError::Usage(spec.usage))?,
    };
    Ok(Invocation {
        verb: spec.verb,
        arg,
    })
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verb {
    Help,
    Ver,
    Whoami,
    Uptime,
    Neofetch,
    Fastfetch,
    Ls,
    Cat,
    Touch,
    Write,
    Ps,
    Htop,
    Logs,
    Guess,
    Calculator,
    Paint,
    MusicPlayer,
    Notes,
    Installer,
    EnvChange,
    WsmApps,
    WsmCmds,
    Browser,
    Youtube,
    Wsm,
    DrawWsm,
    DrawDesktop,
    Bookmarks,
    History,
    Cls,
    Exit,
}

const fn cmd(
    name: &'static str,
    arity: Arity,
    verb: Verb,
    category: Option<&'static str>,
    summary: &'static str,
) -> CommandSpec<Verb> {
    CommandSpec {
        name,
        arity,
        verb,
        usage: "",
        category,
        summary,
    }
}

const fn with_arg(
    name: &'static str,
    verb: Verb,
    usage: &'static str,
    summary: &'static str,
) -> CommandSpec<Verb> {
    CommandSpec {
        name,
        arity: Arity::Text,
        verb,
        usage,
        category: Some("Files"),
        summary,
    }
}

const SYS: Option<&str> = Some("System");
const PROC: Option<&str> = Some("Processes");
const APPS: Option<&str> = Some("Apps");
const MAINT: Option<&str> = Some("Maintenance");

pub static COMMANDS: &[CommandSpec<Verb>] = &[
    cmd("help", Arity::Bare, Verb::Help, SYS, "Show help"),
    cmd("ver", Arity::Bare, Verb::Ver, SYS, "Version info"),
    cmd("whoami", Arity::Bare, Verb::Whoami, SYS, "Current user"),
    cmd("uptime", Arity::Bare, Verb::Uptime, SYS, "System uptime"),
    cmd("neofetch", Arity::Bare, Verb::Neofetch, SYS, "Full info"),
    cmd("fastfetch", Arity::Bare, Verb::Fastfetch, SYS, "Short info"),
    cmd("ls", Arity::Bare, Verb::Ls, Some("Files"), "List files"),
    with_arg("cat", Verb::Cat, "cat FILE", "Show file"),
    with_arg("touch", Verb::Touch, "touch FILE", "Create file"),
    with_arg("write", Verb::Write, "write FILE", "Write to file"),
    cmd("ps", Arity::Bare, Verb::Ps, PROC, "Process list (htop)"),
    cmd("htop", Arity::Bare, Verb::Htop, PROC, "Detailed htop view"),
    cmd("browser", Arity::Bare, Verb::Browser, APPS, "Open browser"),
    cmd("youtube", Arity::Bare, Verb::Youtube, APPS, "YouTube ascii"),
    cmd("paint", Arity::Bare, Verb::Paint, APPS, "Paint"),
    cmd("musicplayer", Arity::Bare, Verb::MusicPlayer, APPS, "Music player"),
    cmd("notes", Arity::Bare, Verb::Notes, APPS, "Notes"),
    cmd("calculator", Arity::Bare, Verb::Calculator, APPS, "Calculator"),
    cmd("guess", Arity::Bare, Verb::Guess, APPS, "Guess the number"),
    cmd("bookmarks", Arity::Bare, Verb::Bookmarks, APPS, "Browser bookmarks"),
    cmd("history", Arity::Bare, Verb::History, APPS, "Browser history"),
    cmd("installer", Arity::Bare, Verb::Installer, MAINT, "Run installer"),
    cmd("envchange", Arity::Bare, Verb::EnvChange, MAINT, "Change environment"),
    cmd("wsm_apps", Arity::Bare, Verb::WsmApps, MAINT, "Installed applications"),
    cmd("wsm_cmds", Arity::Bare, Verb::WsmCmds, MAINT, "Commands panel"),
    cmd("wsm", Arity::Bare, Verb::Wsm, MAINT, "WSM panel"),
    cmd("wsmpanel", Arity::Bare, Verb::Wsm, None, ""),
    cmd("drawwsm", Arity::Bare, Verb::DrawWsm, MAINT, "Apps and commands"),
    cmd("drawdesktop", Arity::Bare, Verb::DrawDesktop, MAINT, "Desktop layout"),
    cmd("logs", Arity::Bare, Verb::Logs, MAINT, "Show logs"),
    cmd("cls", Arity::Bare, Verb::Cls, MAINT, "Clear screen"),
    cmd("exit", Arity::Bare, Verb::Exit, MAINT, "Shutdown"),
];

/// Renders the categorised reference for any command table.
pub fn reference<V>(table: &[CommandSpec<V>]) -> String {
    let mut categories: Vec<&str> = Vec::new();
    for c in table.iter().filter_map(|c| c.category) {
        if !categories.contains(&c) {
            categories.push(c);
        }
    }
    let mut out = String::new();
    for category in categories {
        out.push_str(&format!("[{}]\n", category));
        for c in table.iter().filter(|c| c.category == Some(category)) {
            let label = if c.usage.is_empty() { c.name } else { c.usage };
            out.push_str(&format!("  {:<16} - {}\n", label, c.summary));
        }
        out.push('\n');
    }
    out
}

pub fn prompt() -> String {
    format!("{}@{}> ", CURRENT_USER, HOSTNAME)
}
