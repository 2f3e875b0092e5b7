use rand::Rng;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ProcState {
    Running,
    Sleeping,
}

impl ProcState {
    fn label(self) -> &'static str {
        match self {
            ProcState::Running => "running",
            ProcState::Sleeping => "sleeping",
        }
    }
}

/// Fixed set of simulated processes, filled once at boot.
pub struct ProcessTable {
    names: Vec<String>,
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable {
    pub fn new() -> Self {
        ProcessTable { names: Vec::new() }
    }

    pub fn init(&mut self) {
        self.names.clear();
        for name in [
            "kernel",
            "vireonshell",
            "logger",
            "installer",
            "netif",
            "audio",
            "gfx",
        ] {
            self.names.push(name.into());
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Display-only row; regenerated on every monitor call and never stored.
pub struct ProcStat<'a> {
    pub pid: u32,
    pub name: &'a str,
    pub cpu: u32,
    pub mem: u32,
    pub threads: u32,
    pub state: ProcState,
}

pub fn sample<'a, R: Rng>(table: &'a ProcessTable, rng: &mut R) -> Vec<ProcStat<'a>> {
    table
        .names()
        .iter()
        .enumerate()
        .map(|(i, name)| ProcStat {
            pid: 1000 + i as u32 * 3 + rng.gen_range(0..50),
            name: name.as_str(),
            cpu: rng.gen_range(0..100),
            mem: rng.gen_range(0..100),
            threads: rng.gen_range(1..=12),
            state: if rng.gen_bool(0.5) {
                ProcState::Running
            } else {
                ProcState::Sleeping
            },
        })
        .collect()
}

const RULE: &str = "+------------------------------------------------------------+";

/// `ps` / `htop` view. Verbose adds a fake command line and uptime per row.
pub fn monitor<R: Rng>(table: &ProcessTable, rng: &mut R, verbose: bool) -> String {
    let mut out = format!("{}\n", RULE);
    out.push_str("|               VireonOS Process Monitor (htop)             |\n");
    out.push_str(&format!("{}\n", RULE));
    out.push_str("| PID  | NAME         | CPU% | MEM% | THREADS | STATE       |\n");
    out.push_str(&format!("{}\n", RULE));
    for p in sample(table, rng) {
        out.push_str(&format!(
            "| {:<4} | {:<12} | {:>3}% | {:>3}% | {:>6} | {:<10} |\n",
            p.pid,
            p.name,
            p.cpu,
            p.mem,
            p.threads,
            p.state.label()
        ));
        if verbose {
            out.push_str(&format!("    CMD: /bin/{} --service\n", p.name));
            out.push_str(&format!(
                "    Uptime: {}s  Started by: root\n",
                rng.gen_range(0..360)
            ));
        }
    }
    out.push_str(RULE);
    out
}
