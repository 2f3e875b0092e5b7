use crate::error::{ShellError, ShellResult};
use crate::kernel::SystemLog;
use std::collections::BTreeMap;

/// Flat name -> content store. No directories, no deletion.
#[derive(Default)]
pub struct Vfs {
    files: BTreeMap<String, String>,
}

impl Vfs {
    pub fn new() -> Self {
        Vfs {
            files: BTreeMap::new(),
        }
    }

    pub fn init(&mut self) {
        self.files.clear();
        self.files.insert(
            "readme.txt".into(),
            "VireonOS Beta\nThis is a simulated OS environment.\n".into(),
        );
        self.files.insert(
            "about.txt".into(),
            "VireonOS Beta - Combined demo executable.\nContact: fake@vireonos.dev\n".into(),
        );
        self.files
            .insert("notes.txt".into(), "Initial notes...\n".into());
    }

    /// Names in alphabetical order.
    pub fn list(&self) -> Vec<&str> {
        self.files.keys().map(|s| s.as_str()).collect()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn read(&self, name: &str) -> ShellResult<&str> {
        self.files
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| ShellError::NotFound(name.into()))
    }

    /// Create-only: an existing file is left untouched.
    pub fn create(&mut self, name: &str, log: &mut SystemLog) -> ShellResult<()> {
        if self.files.contains_key(name) {
            return Err(ShellError::AlreadyExists(name.into()));
        }
        self.files.insert(name.into(), String::new());
        log.append(&format!("File created: {}", name));
        Ok(())
    }

    /// Upsert, unlike `create`.
    pub fn write(&mut self, name: &str, content: &str, log: &mut SystemLog) {
        self.files.insert(name.into(), content.into());
        log.append(&format!("File written: {}", name));
    }

    /// Silent insert for callers that log their own event.
    pub fn put(&mut self, name: &str, content: &str) {
        self.files.insert(name.into(), content.into());
    }

    pub fn append(&mut self, name: &str, content: &str) {
        self.files.entry(name.into()).or_default().push_str(content);
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.files.clone()
    }
}
