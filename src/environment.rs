use crate::error::{ShellError, ShellResult};
use crate::installer::Installed;
use crate::kernel::SystemLog;

/// The single active environment. Either unset or one of the installed
/// environments.
#[derive(Default)]
pub struct EnvironmentSelector {
    current: Option<String>,
}

impl EnvironmentSelector {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn display(&self) -> &str {
        self.current().unwrap_or("(none)")
    }

    pub fn list(installed: &Installed) -> String {
        let mut out = String::from("Available Environments:\n");
        for (i, env) in installed.environments().iter().enumerate() {
            out.push_str(&format!(" {}) {}\n", i + 1, env));
        }
        out
    }

    /// `index` is 1-based.
    pub fn select(
        &mut self,
        index: usize,
        installed: &Installed,
        log: &mut SystemLog,
    ) -> ShellResult<&str> {
        let env = installed
            .environments()
            .get(index.wrapping_sub(1))
            .ok_or(ShellError::InvalidChoice)?;
        log.append(&format!("Environment changed to {}", env));
        Ok(self.current.insert(env.clone()).as_str())
    }

    pub fn select_line(
        &mut self,
        line: &str,
        installed: &Installed,
        log: &mut SystemLog,
    ) -> ShellResult<&str> {
        let index = line
            .trim()
            .parse::<usize>()
            .map_err(|_| ShellError::InvalidChoice)?;
        self.select(index, installed, log)
    }

    /// Drops the current environment if it is no longer installed.
    pub fn retain_installed(&mut self, installed: &Installed) {
        if let Some(cur) = &self.current {
            if !installed.environments().contains(cur) {
                self.current = None;
            }
        }
    }
}
