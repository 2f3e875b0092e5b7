use crate::installer::Installed;
use crate::kernel::{CURRENT_USER, KERNEL_VERSION, OS_NAME};
use crate::ui::{ascii_border, small_logo};
use wasm_bindgen::prelude::*;

pub struct NeofetchLogo {
    pub lines: Vec<&'static str>,
}

/// Each environment gets its own art; anything else falls back to the
/// plain Vireon mark.
pub fn get_logo(env: &str) -> NeofetchLogo {
    if env.contains("RetroConsole") {
        NeofetchLogo {
            lines: vec![
                " ________________ ",
                "|  ____________  |",
                "| |C:\\>_       | |",
                "| |            | |",
                "| |____________| |",
                "|________________|",
                "   _|________|_   ",
            ],
        }
    } else if env.contains("Desktop_3D") {
        NeofetchLogo {
            lines: vec![
                "     +--------+",
                "    /        /|",
                "   +--------+ |",
                "   | VIREON | |",
                "   |   3D   | +",
                "   |        |/ ",
                "   +--------+  ",
            ],
        }
    } else if env.contains("GUI") {
        NeofetchLogo {
            lines: vec![
                " +-----------------+",
                " | [_] VireonOS [x]|",
                " |-----------------|",
                " |  /\\/\\  /\\/\\     |",
                " |  \\  /  \\  /     |",
                " |   \\/    \\/      |",
                " +-----------------+",
            ],
        }
    } else {
        NeofetchLogo {
            lines: vec![
                "  \\\\        //",
                "   \\\\      // ",
                "    \\\\    //  ",
                "     \\\\  //   ",
                "      \\\\//    ",
                "       \\/     ",
            ],
        }
    }
}

#[wasm_bindgen]
pub fn neofetch_logo(env: &str) -> String {
    get_logo(env).lines.join("\n")
}

/// Everything the info views print about the running session.
pub struct FetchInfo<'a> {
    pub environment: &'a str,
    pub uptime: String,
    pub installed: &'a Installed,
}

pub fn fastfetch(info: &FetchInfo) -> String {
    format!(
        "{} | {} | User: {} | Env: {} | Uptime: {}",
        OS_NAME, KERNEL_VERSION, CURRENT_USER, info.environment, info.uptime
    )
}

/// Logo on the left, system facts on the right.
pub fn format_neofetch(info: &FetchInfo) -> String {
    let logo = get_logo(info.environment);

    let mut info_lines = vec![
        format!("{}@vireon", CURRENT_USER),
        "─────────────".to_string(),
        format!("OS: {}", OS_NAME),
        format!("Kernel: {}", KERNEL_VERSION),
        format!("User: {}", CURRENT_USER),
        format!("Environment: {}", info.environment),
        format!("Uptime: {}", info.uptime),
        "Installed Programs:".to_string(),
    ];
    for chunk in info.installed.programs().chunks(4) {
        info_lines.push(format!("   {}", chunk.join("  ")));
    }
    info_lines.push("Installed Environments:".to_string());
    info_lines.push(format!("   {}", info.installed.environments().join("  ")));

    let max_logo_width = logo.lines.iter().map(|l| l.len()).max().unwrap_or(0);
    let mut output = ascii_border("EXTENDED SYSTEM INFO", 60);
    for i in 0..logo.lines.len().max(info_lines.len()) {
        let logo_line = logo.lines.get(i).copied().unwrap_or("");
        let info_line = info_lines.get(i).map(String::as_str).unwrap_or("");
        let padding = " ".repeat(max_logo_width - logo_line.len() + 3);
        output.push_str(&format!("{}{}{}\n", logo_line, padding, info_line));
    }
    output.push_str(&ascii_border("END EXTENDED INFO", 60));
    output
}

pub fn wsm_apps(installed: &Installed) -> String {
    let mut out = ascii_border("WSM - Applications", 60);
    out.push_str(small_logo("vireon"));
    out.push_str("Installed Applications:\n");
    if installed.programs().is_empty() {
        out.push_str(" (none)\n");
    }
    for (i, p) in installed.programs().iter().enumerate() {
        out.push_str(&format!("  {:2}) {}\n", i + 1, p));
    }
    out
}

pub fn desktop(info: &FetchInfo) -> String {
    let mut out = ascii_border("VireonOS Desktop", 72);
    out.push_str("[ Desktop layout - Apps | Commands | Status ]\n");
    out.push_str(&format!(
        "  Apps: {}\n",
        info.installed.programs().join(" | ")
    ));
    out.push_str(&format!(
        "  Status: User={} | Uptime={} | Env={}\n",
        CURRENT_USER, info.uptime, info.environment
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::InstallerWizard;
    use crate::kernel::SystemLog;

    fn installed() -> Installed {
        let mut installed = Installed::default();
        let mut log = SystemLog::default();
        let (mut w, _) = InstallerWizard::start(&mut installed, &mut log);
        for line in ["1", "2", "3", "4", "5", "0", "4", "0", "n"] {
            w.step(line, &mut installed, &mut log);
        }
        installed
    }

    #[test]
    fn neofetch_wraps_programs_four_per_line() {
        let installed = installed();
        let info = FetchInfo {
            environment: "RetroConsole",
            uptime: "0m 1s".into(),
            installed: &installed,
        };
        let text = format_neofetch(&info);
        assert!(text.contains("TextEditor  WebBrowser  MusicPlayer  Calculator\n"));
        assert!(text.contains("   Paint\n"));
        assert!(text.contains("Environment: RetroConsole"));
        assert!(text.contains("C:\\>_"));
    }

    #[test]
    fn fastfetch_one_line() {
        let installed = Installed::default();
        let info = FetchInfo {
            environment: "(none)",
            uptime: "1m 2s".into(),
            installed: &installed,
        };
        assert_eq!(
            fastfetch(&info),
            "VireonOS Beta | Vireon Kernel Beta | User: admin | Env: (none) | Uptime: 1m 2s"
        );
        assert!(wsm_apps(&installed).contains(" (none)"));
    }

    #[test]
    fn desktop_lists_apps() {
        let installed = installed();
        let info = FetchInfo {
            environment: "Desktop_3D",
            uptime: "0m 0s".into(),
            installed: &installed,
        };
        assert!(desktop(&info).contains("  Apps: TextEditor | WebBrowser | MusicPlayer | Calculator | Paint\n"));
    }
}
