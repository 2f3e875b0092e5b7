//! Text helpers shared by the views: boxed titles, finished loading bars and
//! the small logos. Pure string builders, no console access.

pub fn ascii_border(title: &str, width: usize) -> String {
    let rule = format!("+{}+", "=".repeat(width));
    let pad = width.saturating_sub(title.len() + 1);
    format!("{}\n| {}{}|\n{}\n", rule, title, " ".repeat(pad), rule)
}

/// Loading bars are shown already complete; the line-driven front-ends have
/// nothing to animate between two inputs.
pub fn loading_bar(label: &str, length: usize) -> String {
    format!("{}: [{}]\n", label, "#".repeat(length))
}

pub fn small_logo(id: &str) -> &'static str {
    match id {
        "installer" => " /'.,-__..-._ INSTALL _.-__-,.'\\\n",
        "browser" => "  {.} <::> BROWSER <::> {.}\n",
        "vireon" => " /\\/\\ VIREON  /\\/\\\n",
        _ => " ./.'; Vireon logo ;'\\. \n",
    }
}

pub fn banner() -> String {
    [
        "   /.';;[-_()((  VIREON   ))()_-];';.\\",
        "  /'.,-__..--..  OS BETA  ..--..__-,.'\\",
        "   __      __.__                         ____  _____",
        "  /  \\    /  \\  |__ _____    ____       /  _ \\/  _  \\",
        "  \\   \\/\\/   /  |  \\\\__  \\  /    \\     /  /_\\  \\  /_\\  \\",
        "   \\        /|   Y  \\/ __ \\|   |  \\   /    |    \\  |    \\",
        "    \\__/\\  / |___|  (____  /___|  /   \\____|__  /__|__  /",
        "         \\/       \\/     \\/     \\/            \\/      \\/",
        "",
        "    ###########################################",
        "    #   VireonOS Beta - System Simulation     #",
        "    #      Not a real OS - for demo only      #",
        "    ###########################################",
        "",
    ]
    .join("\n")
}
