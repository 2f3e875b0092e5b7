use crate::error::{ShellError, ShellResult};
use crate::kernel::SystemLog;
use crate::ui::{ascii_border, loading_bar, small_logo};
use log::info;
use serde::Serialize;

pub const PROGRAM_CATALOG: [&str; 9] = [
    "TextEditor",
    "WebBrowser",
    "MusicPlayer",
    "Calculator",
    "Paint",
    "Notes",
    "SystemMonitor",
    "MiniGames",
    "DevKit",
];

pub const ENVIRONMENT_CATALOG: [&str; 4] =
    ["GUI_Basic", "GUI_Advanced", "Desktop_3D", "RetroConsole"];

/// What the wizard has put on the machine. Both lists are duplicate-free and
/// only ever hold catalog names.
#[derive(Default, Clone, Serialize)]
pub struct Installed {
    programs: Vec<String>,
    environments: Vec<String>,
}

impl Installed {
    pub fn programs(&self) -> &[String] {
        &self.programs
    }
    pub fn environments(&self) -> &[String] {
        &self.environments
    }
    pub fn clear(&mut self) {
        self.programs.clear();
        self.environments.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    SelectingPrograms,
    SelectingEnvironments,
    ConfirmingServices,
    Done,
}

#[derive(Clone, Copy)]
enum Kind {
    Program,
    Environment,
}

impl Kind {
    fn catalog(self) -> &'static [&'static str] {
        match self {
            Kind::Program => &PROGRAM_CATALOG,
            Kind::Environment => &ENVIRONMENT_CATALOG,
        }
    }
    fn slot(self, installed: &mut Installed) -> &mut Vec<String> {
        match self {
            Kind::Program => &mut installed.programs,
            Kind::Environment => &mut installed.environments,
        }
    }
    fn bar_label(self, name: &str) -> (String, usize) {
        match self {
            Kind::Program => (format!("Installing {}", name), 28),
            Kind::Environment => (format!("Installing env {}", name), 24),
        }
    }
    fn log_line(self, name: &str) -> String {
        match self {
            Kind::Program => format!("Installed program: {}", name),
            Kind::Environment => format!("Installed environment: {}", name),
        }
    }
}

fn menu(title: &str, catalog: &[&str]) -> String {
    let mut out = format!("{}:\n", title);
    for (i, item) in catalog.iter().enumerate() {
        out.push_str(&format!(" {:2}) {}\n", i + 1, item));
    }
    out.push_str("  0) finish selection\n");
    out
}

/// Outcome of one catalog pick that did not end the selection step.
fn pick(
    kind: Kind,
    choice: usize,
    installed: &mut Installed,
    log: &mut SystemLog,
) -> ShellResult<String> {
    let name = *kind
        .catalog()
        .get(choice.wrapping_sub(1))
        .ok_or(ShellError::InvalidIndex("selection"))?;
    let slot = kind.slot(installed);
    if slot.iter().any(|p| p == name) {
        return Ok(format!("{} already installed.", name));
    }
    let (label, len) = kind.bar_label(name);
    slot.push(name.to_string());
    log.append(&kind.log_line(name));
    info!("{}", kind.log_line(name));
    Ok(format!("{}{} installed.\n", loading_bar(&label, len), name))
}

/// Program/environment installation wizard, fed one input line at a time.
pub struct InstallerWizard {
    state: WizardState,
}

impl InstallerWizard {
    /// Starts a fresh run. Previous selections are wiped; runs never accumulate.
    pub fn start(installed: &mut Installed, log: &mut SystemLog) -> (Self, String) {
        log.append("Installer launched");
        installed.clear();
        let mut out = ascii_border("VIREON INSTALLER", 60);
        out.push_str(small_logo("installer"));
        out.push_str(&menu("Available Programs", &PROGRAM_CATALOG));
        (
            InstallerWizard {
                state: WizardState::SelectingPrograms,
            },
            out,
        )
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == WizardState::Done
    }

    pub fn prompt(&self) -> &'static str {
        match self.state {
            WizardState::SelectingPrograms => "Select program number to install (0 to finish): ",
            WizardState::SelectingEnvironments => {
                "Select environment number to install (0 to finish): "
            }
            WizardState::ConfirmingServices => "Auto-configure startup services? (y/n): ",
            WizardState::Done => "",
        }
    }

    pub fn step(&mut self, line: &str, installed: &mut Installed, log: &mut SystemLog) -> String {
        match self.state {
            WizardState::SelectingPrograms => {
                self.select(Kind::Program, line, installed, log, |w| {
                    w.state = WizardState::SelectingEnvironments;
                    menu("\nAvailable Environments", &ENVIRONMENT_CATALOG)
                })
            }
            WizardState::SelectingEnvironments => {
                self.select(Kind::Environment, line, installed, log, |w| {
                    w.state = WizardState::ConfirmingServices;
                    String::new()
                })
            }
            WizardState::ConfirmingServices => {
                let mut out = String::new();
                let yes = line
                    .trim()
                    .chars()
                    .next()
                    .is_some_and(|c| c.eq_ignore_ascii_case(&'y'));
                if yes {
                    out.push_str(&loading_bar("Configuring services", 20));
                    log.append("Services configured");
                    out.push_str("Services configured.\n\n");
                }
                out.push_str(&self.finish(installed, log));
                out
            }
            WizardState::Done => String::new(),
        }
    }

    fn select(
        &mut self,
        kind: Kind,
        line: &str,
        installed: &mut Installed,
        log: &mut SystemLog,
        on_finish: impl FnOnce(&mut Self) -> String,
    ) -> String {
        match line.trim().parse::<usize>() {
            Ok(0) => on_finish(self),
            Ok(n) => pick(kind, n, installed, log).unwrap_or_else(|e| e.to_string()),
            Err(_) => ShellError::InvalidIndex("selection").to_string(),
        }
    }

    fn finish(&mut self, installed: &Installed, log: &mut SystemLog) -> String {
        self.state = WizardState::Done;
        let mut out = String::from("Installation finished. Installed items:\n");
        for item in installed.programs.iter().chain(installed.environments.iter()) {
            out.push_str(&format!(" - {}\n", item));
        }
        log.append("Installer finished");
        out
    }
}
