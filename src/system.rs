use crate::{
    apps::{self, AppPrompt},
    browser::{BrowserSession, BrowserShell, Flow},
    environment::EnvironmentSelector,
    installer::{Installed, InstallerWizard},
    kernel::{Kernel, LogEntry, CURRENT_USER, KERNEL_VERSION, OS_NAME},
    neofetch::{self, FetchInfo},
    process,
    shell::{self, parse, Invocation, Verb, COMMANDS},
    ui::{ascii_border, banner},
};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

/// Front-ends replace this marker with their own clear-screen action.
pub const CLEAR_MARKER: &str = "\x1b[CLEAR]";

/// Which loop the next input line belongs to.
enum Mode {
    Shell,
    Installer {
        wizard: InstallerWizard,
        at_boot: bool,
    },
    Browser(BrowserShell),
    App(AppPrompt),
    Halted,
}

#[derive(Serialize)]
struct SessionSnapshot<'a> {
    files: BTreeMap<String, String>,
    installed: &'a Installed,
    current_environment: Option<&'a str>,
    browser: &'a BrowserSession,
    log: &'a [LogEntry],
    uptime: String,
}

#[wasm_bindgen]
pub struct System {
    kernel: Kernel,
    installed: Installed,
    environment: EnvironmentSelector,
    browser: BrowserSession,
    mode: Mode,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl System {
    #[wasm_bindgen(constructor)]
    pub fn new() -> System {
        Self::boot(None)
    }

    /// Same as `new`, with a fixed seed for every random view.
    #[wasm_bindgen]
    pub fn with_seed(seed: u64) -> System {
        Self::boot(Some(seed))
    }

    /// Banner plus the mandatory first installer run.
    #[wasm_bindgen]
    pub fn start(&mut self) -> String {
        let mut out = banner();
        out.push('\n');
        let (intro, mode) = self.start_installer(true);
        self.mode = mode;
        out.push_str(&intro);
        out
    }

    #[wasm_bindgen]
    pub fn prompt(&self) -> String {
        match &self.mode {
            Mode::Shell => shell::prompt(),
            Mode::Installer { wizard, .. } => wizard.prompt().into(),
            Mode::Browser(sh) => sh.prompt(&self.browser),
            Mode::App(p) => p.prompt().into(),
            Mode::Halted => String::new(),
        }
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        !matches!(self.mode, Mode::Halted)
    }

    #[wasm_bindgen]
    pub fn exec(&mut self, line: &str) -> String {
        let blank_ok = matches!(&self.mode, Mode::App(p) if p.takes_blank_lines());
        if line.trim().is_empty() && !blank_ok {
            return String::new();
        }
        let mode = std::mem::replace(&mut self.mode, Mode::Shell);
        let (out, next) = match mode {
            Mode::Shell => self.dispatch(line),
            Mode::Installer { mut wizard, at_boot } => {
                let mut out = wizard.step(line, &mut self.installed, &mut self.kernel.log);
                if wizard.is_done() {
                    self.environment.retain_installed(&self.installed);
                    if at_boot {
                        out.push('\n');
                        out.push_str(&commands_table());
                    }
                    (out, Mode::Shell)
                } else {
                    (out, Mode::Installer { wizard, at_boot })
                }
            }
            Mode::Browser(mut sh) => match sh.handle(line, &mut self.browser, &mut self.kernel) {
                Flow::Continue(out) => (out, Mode::Browser(sh)),
                Flow::Exit(out) => (out, Mode::Shell),
            },
            Mode::App(prompt) => self.answer(prompt, line),
            Mode::Halted => (String::new(), Mode::Halted),
        };
        self.mode = next;
        out
    }

    /// JSON view of every store, for front-ends and tests.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> String {
        let snap = SessionSnapshot {
            files: self.kernel.fs.snapshot(),
            installed: &self.installed,
            current_environment: self.environment.current(),
            browser: &self.browser,
            log: self.kernel.log.list(),
            uptime: self.kernel.uptime(),
        };
        serde_json::to_string(&snap).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

fn commands_table() -> String {
    let mut out = ascii_border("COMMANDS REFERENCE", 72);
    out.push_str(&shell::reference(COMMANDS));
    out.push_str(&ascii_border("END COMMANDS", 72));
    out
}

impl System {
    fn boot(seed: Option<u64>) -> System {
        System {
            kernel: Kernel::boot(seed),
            installed: Installed::default(),
            environment: EnvironmentSelector::default(),
            browser: BrowserSession::default(),
            mode: Mode::Shell,
        }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
    pub fn installed(&self) -> &Installed {
        &self.installed
    }
    pub fn environment(&self) -> &EnvironmentSelector {
        &self.environment
    }
    pub fn browser(&self) -> &BrowserSession {
        &self.browser
    }

    fn start_installer(&mut self, at_boot: bool) -> (String, Mode) {
        let (wizard, out) = InstallerWizard::start(&mut self.installed, &mut self.kernel.log);
        self.environment.retain_installed(&self.installed);
        (out, Mode::Installer { wizard, at_boot })
    }

    fn fetch_info(&self) -> FetchInfo<'_> {
        FetchInfo {
            environment: self.environment.display(),
            uptime: self.kernel.uptime(),
            installed: &self.installed,
        }
    }

    fn dispatch(&mut self, line: &str) -> (String, Mode) {
        let Invocation { verb, arg } = match parse(COMMANDS, line) {
            Ok(inv) => inv,
            Err(e) => {
                warn!("{}", e);
                return (e.to_string(), Mode::Shell);
            }
        };
        debug!("dispatch {:?}", verb);
        let k = &mut self.kernel;
        let out = match verb {
            Verb::Help => commands_table(),
            Verb::WsmCmds => ascii_border("WSM - Commands", 60) + &commands_table(),
            Verb::Ver => format!("{} | {}", OS_NAME, KERNEL_VERSION),
            Verb::Whoami => CURRENT_USER.to_string(),
            Verb::Uptime => k.uptime(),
            Verb::Neofetch => neofetch::format_neofetch(&self.fetch_info()),
            Verb::Fastfetch => neofetch::fastfetch(&self.fetch_info()),
            Verb::Ls => {
                let mut out = String::from("Files:\n");
                for name in k.fs.list() {
                    out.push_str(&format!(" - {}\n", name));
                }
                out
            }
            Verb::Cat => match k.fs.read(arg.text()) {
                Ok(data) => data.to_string(),
                Err(e) => e.to_string(),
            },
            Verb::Touch => match k.fs.create(arg.text(), &mut k.log) {
                Ok(()) => format!("Created file: {}", arg.text()),
                Err(e) => e.to_string(),
            },
            Verb::Write => {
                return (String::new(), Mode::App(AppPrompt::WriteFile(arg.text().into())))
            }
            Verb::Ps => process::monitor(&k.proc, &mut k.rng, false),
            Verb::Htop => process::monitor(&k.proc, &mut k.rng, true),
            Verb::Logs => {
                let mut out = String::from("--- System Logs ---\n");
                for entry in k.log.list() {
                    out.push_str(&entry.render());
                    out.push('\n');
                }
                out
            }
            Verb::Guess => return (String::new(), Mode::App(apps::start_guess(&mut k.rng))),
            Verb::Calculator => {
                return (
                    "Calculator - enter: num1 operator num2".into(),
                    Mode::App(AppPrompt::Calculator),
                )
            }
            Verb::Notes => {
                return (
                    "Notes - enter lines. Single '.' on a line to finish.".into(),
                    Mode::App(AppPrompt::Notes),
                )
            }
            Verb::Paint => apps::paint(&mut k.rng),
            Verb::MusicPlayer => apps::music_player(&mut k.rng, &mut k.log),
            Verb::Youtube => return (apps::youtube_menu(), Mode::App(AppPrompt::Youtube)),
            Verb::Installer => return self.start_installer(false),
            Verb::EnvChange => {
                return (
                    EnvironmentSelector::list(&self.installed),
                    Mode::App(AppPrompt::EnvChoice),
                )
            }
            Verb::WsmApps => neofetch::wsm_apps(&self.installed),
            Verb::DrawWsm => self.draw_wsm(),
            Verb::Wsm => commands_table() + &self.draw_wsm(),
            Verb::DrawDesktop => neofetch::desktop(&self.fetch_info()),
            Verb::Browser => {
                let (sh, out) = BrowserShell::enter(&mut self.browser, &mut k.log);
                return (out, Mode::Browser(sh));
            }
            Verb::Bookmarks => self.browser.show_bookmarks(),
            Verb::History => self.browser.show_history(),
            Verb::Cls => CLEAR_MARKER.to_string(),
            Verb::Exit => {
                k.log.append("Shutdown requested");
                info!("shutdown requested after {}", k.uptime());
                return (format!("Shutting down {}...", OS_NAME), Mode::Halted);
            }
        };
        (out, Mode::Shell)
    }

    fn draw_wsm(&self) -> String {
        ascii_border("WSM PANEL - APPS & COMMANDS", 60)
            + &neofetch::wsm_apps(&self.installed)
            + &commands_table()
    }

    /// Feeds `line` to the app that asked for it.
    fn answer(&mut self, prompt: AppPrompt, line: &str) -> (String, Mode) {
        let k = &mut self.kernel;
        let out = match prompt {
            AppPrompt::WriteFile(name) => {
                k.fs.write(&name, line, &mut k.log);
                "Saved.".to_string()
            }
            AppPrompt::EnvChoice => {
                match self.environment.select_line(line, &self.installed, &mut k.log) {
                    Ok(env) => format!("Environment set to {}", env),
                    Err(e) => {
                        warn!("envchange: {}", e);
                        e.to_string()
                    }
                }
            }
            AppPrompt::Guess(secret) => apps::guess(secret, line, &mut k.log),
            AppPrompt::Calculator => apps::calculator(line),
            AppPrompt::Notes => {
                return match apps::note_line(line, &mut k.fs, &mut k.log) {
                    Some(out) => (out, Mode::App(AppPrompt::Notes)),
                    None => (
                        format!("Notes saved to {}", apps::NOTES_FILE),
                        Mode::Shell,
                    ),
                }
            }
            AppPrompt::Youtube => apps::youtube_play(line, &mut k.rng),
        };
        (out, Mode::Shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booted(script: &[&str]) -> System {
        let mut sys = System::with_seed(1);
        sys.start();
        for line in script {
            sys.exec(line);
        }
        sys
    }

    #[test]
    fn boot_runs_installer_then_shell() {
        let mut sys = System::with_seed(1);
        let intro = sys.start();
        assert!(intro.contains("VIREON INSTALLER"));
        assert!(sys.prompt().starts_with("Select program number"));
        sys.exec("0");
        sys.exec("0");
        let done = sys.exec("n");
        assert!(done.contains("COMMANDS REFERENCE"));
        assert_eq!(sys.prompt(), "admin@vireon> ");
    }

    #[test]
    fn blank_lines_reprompt() {
        let mut sys = booted(&["0", "0", "n"]);
        assert_eq!(sys.exec("   "), "");
        assert_eq!(sys.prompt(), "admin@vireon> ");
    }

    #[test]
    fn touch_is_strict_write_is_upsert() {
        let mut sys = booted(&["0", "0", "n"]);
        assert_eq!(sys.exec("touch Draft.md"), "Created file: Draft.md");
        assert_eq!(sys.exec("touch Draft.md"), "File already exists: Draft.md");
        sys.exec("write Draft.md");
        assert_eq!(sys.prompt(), "Enter text (single line will be saved): ");
        assert_eq!(sys.exec("Hello World"), "Saved.");
        assert_eq!(sys.exec("cat Draft.md"), "Hello World");
        sys.exec("write fresh.txt");
        sys.exec("");
        assert_eq!(sys.exec("cat fresh.txt"), "");
        assert_eq!(sys.exec("cat missing"), "File not found: missing");
        assert!(sys.exec("ls").contains(" - Draft.md\n - about.txt\n - fresh.txt\n"));
    }

    #[test]
    fn unknown_commands_recover() {
        let mut sys = booted(&["0", "0", "n"]);
        let out = sys.exec("format c:");
        assert!(out.starts_with("Unknown command: format c:"));
        assert!(sys.is_running());
        assert_eq!(sys.exec("cat"), "usage: cat FILE");
    }

    #[test]
    fn envchange_flow() {
        let mut sys = booted(&["0", "1", "2", "0", "n"]);
        let listing = sys.exec("envchange");
        assert!(listing.contains(" 2) GUI_Advanced"));
        assert_eq!(sys.exec("2"), "Environment set to GUI_Advanced");
        sys.exec("envchange");
        assert_eq!(
            sys.exec("9"),
            "Invalid choice or no environments installed."
        );
        assert_eq!(sys.environment().current(), Some("GUI_Advanced"));
        assert!(sys.exec("fastfetch").contains("Env: GUI_Advanced"));
    }

    #[test]
    fn rerunning_installer_clears_environment() {
        let mut sys = booted(&["0", "1", "0", "n", "envchange", "1"]);
        assert_eq!(sys.environment().current(), Some("GUI_Basic"));
        sys.exec("installer");
        assert_eq!(sys.environment().current(), None);
        for line in ["4", "0", "0", "y"] {
            sys.exec(line);
        }
        assert_eq!(sys.installed().programs(), ["Calculator"]);
        assert!(sys.installed().environments().is_empty());
        assert_eq!(sys.prompt(), "admin@vireon> ");
    }

    #[test]
    fn browser_state_survives_reentry() {
        let mut sys = booted(&["0", "0", "n", "browser"]);
        assert!(sys.prompt().contains("[Tab 1/1] vireonos.com/home"));
        sys.exec("newtab github.com");
        sys.exec("bookmark");
        assert!(sys.exec("exit").contains("CLOSING BROWSER"));
        assert_eq!(sys.prompt(), "admin@vireon> ");
        assert!(sys.exec("bookmarks").contains(" 1) github.com"));
        assert!(sys.exec("history").contains(" 2) github.com"));
        sys.exec("browser");
        assert_eq!(sys.browser().tabs().len(), 2);
        assert!(sys.prompt().starts_with("[Tab 2/2]"));
    }

    #[test]
    fn browser_download_lands_in_filesystem() {
        let mut sys = booted(&["0", "0", "n", "browser", "download", "quit"]);
        let files = sys.kernel().fs.list();
        assert_eq!(files.iter().filter(|f| f.starts_with("dl_")).count(), 1);
        assert!(sys.exec("logs").contains("Downloaded vireonos.com/home -> dl_"));
    }

    #[test]
    fn notes_mode_consumes_until_dot() {
        let mut sys = booted(&["0", "0", "n", "notes", "buy milk", "", "."]);
        assert_eq!(sys.prompt(), "admin@vireon> ");
        assert_eq!(
            sys.exec("cat notes.txt"),
            "Initial notes...\nbuy milk\n\n"
        );
    }

    #[test]
    fn exit_halts_and_logs_once() {
        let mut sys = booted(&["0", "0", "n"]);
        assert_eq!(sys.exec("exit"), "Shutting down VireonOS Beta...");
        assert!(!sys.is_running());
        assert_eq!(sys.exec("whoami"), "");
        assert_eq!(sys.kernel().log.count_matching("Shutdown requested"), 1);
    }

    #[test]
    fn snapshot_is_json() {
        let sys = booted(&["4", "0", "0", "n"]);
        let v: serde_json::Value = serde_json::from_str(&sys.snapshot()).unwrap();
        assert_eq!(v["installed"]["programs"][0], "Calculator");
        assert_eq!(v["current_environment"], serde_json::Value::Null);
        assert_eq!(v["browser"]["active"], serde_json::Value::Null);
        assert!(v["files"]["readme.txt"].is_string());
    }

    #[test]
    fn views_render() {
        let mut sys = booted(&["4", "0", "0", "n"]);
        assert_eq!(sys.exec("ver"), "VireonOS Beta | Vireon Kernel Beta");
        assert!(sys.exec("ps").contains("| kernel "));
        assert!(sys.exec("htop").contains("Started by: root"));
        assert!(sys.exec("wsm_apps").contains("   1) Calculator"));
        assert!(sys.exec("wsmpanel").contains("WSM PANEL - APPS & COMMANDS"));
        assert!(sys.exec("drawdesktop").contains("Apps: Calculator"));
        assert!(sys.exec("neofetch").contains("Environment: (none)"));
        assert_eq!(sys.exec("cls"), CLEAR_MARKER);
        assert!(sys.exec("paint").contains("END PAINT"));
        sys.exec("calculator");
        assert_eq!(sys.exec("8 / 2"), "Result: 4");
        sys.exec("youtube");
        assert_eq!(sys.exec("7"), "Invalid");
        sys.exec("guess");
        assert!(sys.prompt().starts_with("Guess number"));
        sys.exec("21");
        assert_eq!(sys.prompt(), "admin@vireon> ");
    }
}
