use crate::{process::ProcessTable, vfs::Vfs};
use chrono::{DateTime, Local};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

pub const OS_NAME: &str = "VireonOS Beta";
pub const KERNEL_VERSION: &str = "Vireon Kernel Beta";
pub const CURRENT_USER: &str = "admin";
pub const HOSTNAME: &str = "vireon";

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Append-only event record. Grows for the whole session; nothing trims it.
#[derive(Default)]
pub struct SystemLog {
    entries: Vec<LogEntry>,
}

impl SystemLog {
    pub fn append(&mut self, msg: &str) {
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            message: msg.to_string(),
        });
    }
    pub fn list(&self) -> &[LogEntry] {
        &self.entries
    }
    pub fn count_matching(&self, msg: &str) -> usize {
        self.entries.iter().filter(|e| e.message == msg).count()
    }
}

/// Session context shared by every command: clock, RNG, log and the two
/// fixed stores set up at boot.
pub struct Kernel {
    pub boot_time: DateTime<Local>,
    pub fs: Vfs,
    pub proc: ProcessTable,
    pub log: SystemLog,
    pub rng: StdRng,
}

impl Kernel {
    pub fn boot(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut kernel = Kernel {
            boot_time: Local::now(),
            fs: Vfs::new(),
            proc: ProcessTable::new(),
            log: SystemLog::default(),
            rng,
        };
        kernel.fs.init();
        kernel.log.append("Filesystem initialized");
        kernel.proc.init();
        kernel.log.append("Processes initialized");
        kernel.log.append("System booted");
        kernel.log.append("Kernel initialized");
        info!("{} booted ({} processes)", OS_NAME, kernel.proc.names().len());
        kernel
    }

    pub fn uptime(&self) -> String {
        format_uptime((Local::now() - self.boot_time).num_seconds())
    }
}

pub fn format_uptime(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}m {}s", secs / 60, secs % 60)
}
