use crate::error::{ShellError, ShellResult};
use crate::kernel::{Kernel, SystemLog};
use crate::shell::{parse, reference, Arg, Arity, CommandSpec};
use crate::ui::{ascii_border, loading_bar, small_logo};
use crate::vfs::Vfs;
use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

pub const HOME_SENTINEL: &str = "home://start";
pub const HOME_URL: &str = "vireonos.com/home";
const SEARCH_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub title: String,
    pub url: String,
}

fn resolve(url: &str) -> &str {
    if url == HOME_SENTINEL {
        HOME_URL
    } else {
        url
    }
}

/// Page body picked by substring of the url.
pub fn render_page(url: &str) -> String {
    let mut out = ascii_border(&format!("PAGE: {}", url), 64);
    if url.contains("vireonos.com") {
        out.push_str(small_logo("vireon"));
        out.push_str("Welcome to VireonOS official ASCII page!\n");
        out.push_str("- Projects: VireonOS, VireonTools, VireonArt\n");
        out.push_str("- Follow the fake dev announcements.\n");
    } else if url.contains("github.com") {
        out.push_str("GitHub - Fake Repositories:\n");
        out.push_str(" - fireon/vireonos\n - guest/demo\n - tools/ascii-suite\n");
    } else if url.contains("youtube") || url.contains("video") {
        out.push_str("YouTube Beta - Video Player (ASCII)\n");
        out.push_str("Use the 'youtube' command from the main shell to watch a demo.\n");
    } else if url.contains("example.com") {
        out.push_str("Example Page\nLorem ipsum dolor sit amet, ascii content demo.\n");
    } else if url.contains("search.fake") {
        out.push_str("Search engine placeholder page.\n");
    } else {
        out.push_str(&format!("Generic page for: {}\n", url));
        out.push_str("[ASCII CONTENT FOLLOWS]\n");
        for i in 0..6 {
            out.push_str(&format!(" ~~~ {}\n", "~".repeat(40 - i * 2)));
        }
    }
    out
}

pub fn search_results(term: &str) -> Vec<String> {
    (1..=SEARCH_RESULTS)
        .map(|i| format!("https://search.fake/{}/result{}", term, i))
        .collect()
}

fn numbered(title: &str, items: &[String]) -> String {
    let mut out = format!("{}:\n", title);
    if items.is_empty() {
        out.push_str(" (none)\n");
    }
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!(" {}) {}\n", i + 1, item));
    }
    out
}

fn unique_download_name<R: Rng>(fs: &Vfs, rng: &mut R) -> String {
    let start = rng.gen_range(0..9999u32);
    (0..9999u32)
        .map(|k| (start + k) % 9999)
        .chain(9999..)
        .map(|n| format!("dl_{}.bin", n))
        .find(|name| !fs.exists(name))
        .unwrap_or_default()
}

/// Tabs, history and bookmarks. Lives for the whole run, so leaving and
/// re-entering the browser keeps everything.
///
/// `active` is `None` exactly when there are no tabs to point at; every
/// mutation below keeps it inside `tabs`.
#[derive(Default, Serialize)]
pub struct BrowserSession {
    tabs: Vec<Tab>,
    active: Option<usize>,
    history: Vec<String>,
    bookmarks: Vec<String>,
}

impl BrowserSession {
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|i| self.tabs.get(i))
    }
    pub fn history(&self) -> &[String] {
        &self.history
    }
    pub fn bookmarks(&self) -> &[String] {
        &self.bookmarks
    }

    fn active_url(&self) -> ShellResult<String> {
        self.active_tab()
            .map(|t| t.url.clone())
            .ok_or(ShellError::NoActiveTab)
    }

    fn push_tab(&mut self, url: &str) -> String {
        self.tabs.push(Tab {
            title: url.into(),
            url: url.into(),
        });
        self.active = Some(self.tabs.len() - 1);
        format!("New tab opened: {}\n", url)
    }

    /// Points the active tab (or a fresh one) at `url` and renders it.
    fn navigate(&mut self, url: &str, log: &mut SystemLog) -> String {
        let mut out = String::new();
        if self.active_tab().is_none() {
            out.push_str(&self.push_tab(url));
        }
        if let Some(tab) = self.active.and_then(|i| self.tabs.get_mut(i)) {
            tab.url = url.into();
            tab.title = url.into();
        }
        self.history.push(url.into());
        log.append(&format!("Browser opened: {}", url));
        out.push_str(&render_page(url));
        out
    }

    pub fn open(&mut self, url: &str, log: &mut SystemLog) -> String {
        self.navigate(resolve(url), log)
    }

    pub fn new_tab(&mut self, url: &str, log: &mut SystemLog) -> String {
        let mut out = self.push_tab(url);
        out.push_str(&self.open(url, log));
        out
    }

    /// `n` is 1-based. Closing the active tab, or one before it, selects the
    /// tab just before the closed slot.
    pub fn close_tab(&mut self, n: usize) -> ShellResult<String> {
        let idx = n
            .checked_sub(1)
            .filter(|&i| i < self.tabs.len())
            .ok_or(ShellError::InvalidIndex("tab index"))?;
        let closed = self.tabs.remove(idx);
        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(a) if idx <= a => Some(idx.saturating_sub(1)),
            other => other,
        };
        Ok(format!("Closing tab {}: {}\n", n, closed.url))
    }

    pub fn switch(&mut self, n: usize, log: &mut SystemLog) -> ShellResult<String> {
        let idx = n
            .checked_sub(1)
            .filter(|&i| i < self.tabs.len())
            .ok_or(ShellError::InvalidIndex("tab index"))?;
        self.active = Some(idx);
        let url = self.tabs[idx].url.clone();
        let mut out = format!("Switched to tab {}\n", n);
        out.push_str(&self.open(&url, log));
        Ok(out)
    }

    pub fn list_tabs(&self) -> String {
        let mut out = String::from("Open Tabs:\n");
        for (i, t) in self.tabs.iter().enumerate() {
            out.push_str(&format!(" {:2}) {:<30} {}\n", i + 1, t.title, t.url));
        }
        out
    }

    pub fn bookmark(&mut self, log: &mut SystemLog) -> ShellResult<String> {
        let url = self.active_url()?;
        log.append(&format!("Browser bookmark added: {}", url));
        let out = format!("Bookmarked: {}\n", url);
        self.bookmarks.push(url);
        Ok(out)
    }

    pub fn show_bookmarks(&self) -> String {
        numbered("Bookmarks", &self.bookmarks)
    }

    pub fn show_history(&self) -> String {
        numbered("History (most recent last)", &self.history)
    }

    /// Drops the current entry and opens the one before it, which records it
    /// again as the new top.
    pub fn back(&mut self, log: &mut SystemLog) -> ShellResult<String> {
        if self.history.len() < 2 {
            return Err(ShellError::InsufficientHistory);
        }
        self.history.pop();
        let prev = self.history.last().cloned().unwrap_or_default();
        Ok(self.open(&prev, log))
    }

    pub fn refresh(&mut self, log: &mut SystemLog) -> ShellResult<String> {
        let url = self.active_url()?;
        let mut out = format!("Refreshing {}\n", url);
        out.push_str(&loading_bar("Refresh", 24));
        out.push_str(&self.open(&url, log));
        Ok(out)
    }

    pub fn view_source(&self) -> ShellResult<String> {
        let url = self.active_url()?;
        let mut out = ascii_border("VIEW SOURCE", 64);
        out.push_str(&format!("<!-- Fake HTML source for {} -->\n", url));
        out.push_str(
            "<html>\n <head><title>Demo</title></head>\n <body>\n  <h1>Welcome</h1>\n  <p>This is an ASCII demo page</p>\n </body>\n</html>\n",
        );
        Ok(out)
    }

    /// Saves a fake binary under a name no existing file uses.
    pub fn download<R: Rng>(
        &self,
        fs: &mut Vfs,
        rng: &mut R,
        log: &mut SystemLog,
    ) -> ShellResult<String> {
        let url = self.active_url()?;
        let mut out = format!("Starting download for: {}\n", url);
        out.push_str(&loading_bar("Downloading", 34));
        let filename = unique_download_name(fs, rng);
        fs.put(&filename, "FAKE-BINARY-DATA");
        log.append(&format!("Downloaded {} -> {}", url, filename));
        out.push_str(&format!("Saved to {}\n", filename));
        Ok(out)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum BrowserVerb {
    Open,
    NewTab,
    CloseTab,
    Switch,
    Tabs,
    Bookmark,
    Bookmarks,
    History,
    Search,
    Back,
    ViewSource,
    Download,
    Refresh,
    Help,
    Exit,
}

const fn bcmd(
    name: &'static str,
    arity: Arity,
    verb: BrowserVerb,
    usage: &'static str,
    summary: &'static str,
) -> CommandSpec<BrowserVerb> {
    CommandSpec {
        name,
        arity,
        verb,
        usage,
        category: Some("Browser"),
        summary,
    }
}

static BROWSER_COMMANDS: &[CommandSpec<BrowserVerb>] = &[
    bcmd("open", Arity::Text, BrowserVerb::Open, "open URL", "Open url in current tab"),
    bcmd("newtab", Arity::Text, BrowserVerb::NewTab, "newtab URL", "Open url in new tab"),
    bcmd("closetab", Arity::Index, BrowserVerb::CloseTab, "closetab N", "Close tab N"),
    bcmd("switch", Arity::Index, BrowserVerb::Switch, "switch N", "Switch to tab N"),
    bcmd("tabs", Arity::Bare, BrowserVerb::Tabs, "", "List tabs"),
    bcmd("back", Arity::Bare, BrowserVerb::Back, "", "Previous page"),
    bcmd("refresh", Arity::Bare, BrowserVerb::Refresh, "", "Reload page"),
    bcmd("bookmark", Arity::Bare, BrowserVerb::Bookmark, "", "Bookmark page"),
    bcmd("bookmarks", Arity::Bare, BrowserVerb::Bookmarks, "", "List bookmarks"),
    bcmd("history", Arity::Bare, BrowserVerb::History, "", "List history"),
    bcmd("search", Arity::Text, BrowserVerb::Search, "search TERM", "Search the web"),
    bcmd("viewsource", Arity::Bare, BrowserVerb::ViewSource, "", "Show page source"),
    bcmd("download", Arity::Bare, BrowserVerb::Download, "", "Download page"),
    bcmd("help", Arity::Bare, BrowserVerb::Help, "", "This list"),
    bcmd("exit", Arity::Bare, BrowserVerb::Exit, "", "Leave browser"),
    CommandSpec {
        name: "quit",
        arity: Arity::Bare,
        verb: BrowserVerb::Exit,
        usage: "",
        category: None,
        summary: "",
    },
];

pub enum Flow {
    Continue(String),
    Exit(String),
}

/// The `browser>` sub-shell. Its only own state is a pending search whose
/// result number is still to be picked.
#[derive(Default)]
pub struct BrowserShell {
    pending_results: Option<Vec<String>>,
}

impl BrowserShell {
    pub fn enter(session: &mut BrowserSession, log: &mut SystemLog) -> (Self, String) {
        let mut out = ascii_border("ASCII BROWSER - Session", 64);
        out.push_str(small_logo("browser"));
        if session.tabs.is_empty() {
            out.push_str(&session.new_tab(HOME_SENTINEL, log));
        }
        (BrowserShell::default(), out)
    }

    pub fn prompt(&self, session: &BrowserSession) -> String {
        if self.pending_results.is_some() {
            return "Open result number? (0 = none): ".into();
        }
        match (session.active, session.active_tab()) {
            (Some(i), Some(tab)) => format!(
                "[Tab {}/{}] {} - {}\nbrowser> ",
                i + 1,
                session.tabs.len(),
                tab.title,
                tab.url
            ),
            _ => "browser> ".into(),
        }
    }

    pub fn handle(&mut self, line: &str, session: &mut BrowserSession, kernel: &mut Kernel) -> Flow {
        if let Some(results) = self.pending_results.take() {
            let url = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| results.get(i));
            return Flow::Continue(match url {
                Some(u) => session.open(u, &mut kernel.log),
                None => String::new(),
            });
        }
        let inv = match parse(BROWSER_COMMANDS, line) {
            Ok(inv) => inv,
            Err(ShellError::UnknownCommand(_)) => {
                return Flow::Continue("Unknown browser command. Type 'help'.".into())
            }
            Err(e) => return Flow::Continue(e.to_string()),
        };
        debug!("browser: {:?}", inv.verb);
        let arg: Arg = inv.arg;
        let result = match inv.verb {
            BrowserVerb::Exit => return Flow::Exit(ascii_border("CLOSING BROWSER", 64)),
            BrowserVerb::Help => Ok(reference(BROWSER_COMMANDS)),
            BrowserVerb::Open => Ok(session.open(arg.text(), &mut kernel.log)),
            BrowserVerb::NewTab => Ok(session.new_tab(arg.text(), &mut kernel.log)),
            BrowserVerb::CloseTab => session.close_tab(arg.index()),
            BrowserVerb::Switch => session.switch(arg.index(), &mut kernel.log),
            BrowserVerb::Tabs => Ok(session.list_tabs()),
            BrowserVerb::Bookmark => session.bookmark(&mut kernel.log),
            BrowserVerb::Bookmarks => Ok(session.show_bookmarks()),
            BrowserVerb::History => Ok(session.show_history()),
            BrowserVerb::Back => session.back(&mut kernel.log),
            BrowserVerb::Refresh => session.refresh(&mut kernel.log),
            BrowserVerb::ViewSource => session.view_source(),
            BrowserVerb::Download => {
                session.download(&mut kernel.fs, &mut kernel.rng, &mut kernel.log)
            }
            BrowserVerb::Search => {
                let results = search_results(arg.text());
                let mut out = format!("Search results for: {}\n", arg.text());
                for (i, r) in results.iter().enumerate() {
                    out.push_str(&format!(" {}) {}\n", i + 1, r));
                }
                self.pending_results = Some(results);
                Ok(out)
            }
        };
        Flow::Continue(result.unwrap_or_else(|e| {
            warn!("browser: {}", e);
            e.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (BrowserSession, SystemLog) {
        (BrowserSession::default(), SystemLog::default())
    }

    #[test]
    fn two_new_tabs_then_close_second() {
        let (mut b, mut log) = session();
        b.new_tab("A", &mut log);
        b.new_tab("B", &mut log);
        assert_eq!(b.tabs().len(), 2);
        assert_eq!(b.active_index(), Some(1));
        b.close_tab(2).unwrap();
        assert_eq!(b.tabs().len(), 1);
        assert_eq!(b.active_index(), Some(0));
        assert_eq!(b.active_tab().unwrap().url, "A");
    }

    #[test]
    fn close_out_of_range_changes_nothing() {
        let (mut b, mut log) = session();
        b.new_tab("A", &mut log);
        for n in [0, 2, 99] {
            assert_eq!(b.close_tab(n), Err(ShellError::InvalidIndex("tab index")));
        }
        assert_eq!(b.tabs().len(), 1);
        assert_eq!(b.active_index(), Some(0));
    }

    #[test]
    fn closing_last_tab_clears_active() {
        let (mut b, mut log) = session();
        b.new_tab("A", &mut log);
        b.close_tab(1).unwrap();
        assert_eq!(b.active_index(), None);
        assert_eq!(b.bookmark(&mut log), Err(ShellError::NoActiveTab));
        assert_eq!(b.refresh(&mut log), Err(ShellError::NoActiveTab));
    }

    #[test]
    fn closing_tab_before_active_selects_previous_slot() {
        let (mut b, mut log) = session();
        b.new_tab("A", &mut log);
        b.new_tab("B", &mut log);
        b.new_tab("C", &mut log);
        b.close_tab(2).unwrap();
        assert_eq!(b.active_index(), Some(0));
        assert_eq!(b.active_tab().unwrap().url, "A");
        b.switch(2, &mut log).unwrap();
        b.close_tab(1).unwrap();
        assert_eq!(b.active_index(), Some(0));
        assert_eq!(b.active_tab().unwrap().url, "C");
    }

    #[test]
    fn closing_tab_after_active_leaves_it() {
        let (mut b, mut log) = session();
        b.new_tab("A", &mut log);
        b.new_tab("B", &mut log);
        b.switch(1, &mut log).unwrap();
        b.close_tab(2).unwrap();
        assert_eq!(b.active_index(), Some(0));
        assert_eq!(b.active_tab().unwrap().url, "A");
    }

    #[test]
    fn each_navigation_adds_one_history_entry() {
        let (mut b, mut log) = session();
        b.open("example.com", &mut log);
        b.new_tab("github.com/x", &mut log);
        b.refresh(&mut log).unwrap();
        b.open("example.com", &mut log);
        b.refresh(&mut log).unwrap();
        assert_eq!(b.history().len(), 5);
        assert_eq!(b.tabs().len(), 2);
    }

    #[test]
    fn open_rewrites_active_tab_and_resolves_home() {
        let (mut b, mut log) = session();
        b.new_tab(HOME_SENTINEL, &mut log);
        assert_eq!(b.active_tab().unwrap().url, HOME_URL);
        let page = b.open("github.com/fireon", &mut log);
        assert!(page.contains("GitHub - Fake Repositories"));
        assert_eq!(b.tabs().len(), 1);
        assert_eq!(b.active_tab().unwrap().title, "github.com/fireon");
        assert_eq!(b.history(), [HOME_URL, "github.com/fireon"]);
    }

    #[test]
    fn back_needs_two_entries() {
        let (mut b, mut log) = session();
        b.open("a.com", &mut log);
        assert_eq!(b.back(&mut log), Err(ShellError::InsufficientHistory));
        assert_eq!(b.history().len(), 1);
        assert_eq!(b.active_tab().unwrap().url, "a.com");
        b.open("b.com", &mut log);
        b.open("c.com", &mut log);
        b.back(&mut log).unwrap();
        assert_eq!(b.active_tab().unwrap().url, "b.com");
        assert_eq!(b.history(), ["a.com", "b.com", "b.com"]);
        b.back(&mut log).unwrap();
        assert_eq!(b.active_tab().unwrap().url, "b.com");
        assert_eq!(b.history(), ["a.com", "b.com", "b.com"]);
    }

    #[test]
    fn bookmarks_keep_duplicates() {
        let (mut b, mut log) = session();
        b.open("a.com", &mut log);
        b.bookmark(&mut log).unwrap();
        b.bookmark(&mut log).unwrap();
        assert_eq!(b.bookmarks(), ["a.com", "a.com"]);
        assert!(b.show_bookmarks().contains(" 2) a.com"));
    }

    #[test]
    fn empty_views_say_none() {
        let (b, _) = session();
        assert!(b.show_history().contains("(none)"));
        assert!(b.show_bookmarks().contains("(none)"));
    }

    #[test]
    fn page_classification() {
        assert!(render_page(HOME_URL).contains("Welcome to VireonOS"));
        assert!(render_page("m.youtube.com").contains("YouTube Beta"));
        assert!(render_page("https://search.fake/x/result1").contains("placeholder"));
        assert!(render_page("www.example.com").contains("Lorem ipsum"));
        assert!(render_page("rust-lang.org").contains("Generic page for: rust-lang.org"));
    }

    #[test]
    fn download_names_never_collide() {
        use rand::{rngs::StdRng, SeedableRng};
        let (mut b, mut log) = session();
        let mut fs = Vfs::new();
        let mut rng = StdRng::seed_from_u64(42);
        b.open("example.com", &mut log);
        for _ in 0..50 {
            b.download(&mut fs, &mut rng, &mut log).unwrap();
        }
        let names = fs.list();
        assert_eq!(names.len(), 50);
        assert!(names.iter().all(|n| n.starts_with("dl_") && n.ends_with(".bin")));
        assert_eq!(fs.read(names[0]), Ok("FAKE-BINARY-DATA"));
    }

    #[test]
    fn shell_search_then_pick() {
        let mut kernel = Kernel::boot(Some(5));
        let mut b = BrowserSession::default();
        let (mut sh, intro) = BrowserShell::enter(&mut b, &mut kernel.log);
        assert!(intro.contains("New tab opened: home://start"));
        assert!(matches!(
            sh.handle("search Rust", &mut b, &mut kernel),
            Flow::Continue(_)
        ));
        assert!(sh.prompt(&b).starts_with("Open result number?"));
        sh.handle("3", &mut b, &mut kernel);
        assert_eq!(
            b.active_tab().unwrap().url,
            "https://search.fake/Rust/result3"
        );
        sh.handle("search x", &mut b, &mut kernel);
        sh.handle("0", &mut b, &mut kernel);
        assert_eq!(b.history().len(), 2);
        assert!(sh.prompt(&b).ends_with("browser> "));
    }

    #[test]
    fn shell_reports_errors_inline() {
        let mut kernel = Kernel::boot(Some(5));
        let mut b = BrowserSession::default();
        let (mut sh, _) = BrowserShell::enter(&mut b, &mut kernel.log);
        let text = |f: Flow| match f {
            Flow::Continue(s) | Flow::Exit(s) => s,
        };
        assert_eq!(text(sh.handle("closetab 9", &mut b, &mut kernel)), "Invalid tab index");
        assert_eq!(text(sh.handle("switch x", &mut b, &mut kernel)), "usage: switch N");
        assert_eq!(text(sh.handle("closetab -1", &mut b, &mut kernel)), "Invalid tab index");
        assert_eq!(text(sh.handle("switch -3", &mut b, &mut kernel)), "Invalid tab index");
        assert_eq!(b.tabs().len(), 1);
        assert_eq!(text(sh.handle("back", &mut b, &mut kernel)), "No history");
        assert_eq!(
            text(sh.handle("fly", &mut b, &mut kernel)),
            "Unknown browser command. Type 'help'."
        );
        assert!(matches!(sh.handle("QUIT", &mut b, &mut kernel), Flow::Exit(_)));
    }
}
