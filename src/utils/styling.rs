//! Terminal styling for the pipeline steps

use std::path::Path;

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static DICE: Emoji<'_, '_> = Emoji("🎲 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

const CARD_WIDTH: usize = 56;

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("diabrisk").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Diabetes risk ETL and reporting").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// One configuration line: (icon, label, value)
pub type ConfigLine<'a> = (&'a Emoji<'a, 'a>, &'a str, String);

/// Print a configuration card with the given lines
pub fn print_config(title: &str, lines: &[ConfigLine<'_>]) {
    let rule = "─".repeat(CARD_WIDTH - 2);
    let label_width = lines.iter().map(|(_, label, _)| label.len()).max().unwrap_or(0);

    println!("    ┌{}┐", rule);
    println!("    │ {}", style(format!("⚙️  {}", title)).cyan().bold());
    println!("    ├{}┤", rule);
    for (icon, label, value) in lines {
        println!(
            "    │  {}{:<width$} {}",
            icon,
            format!("{}:", label),
            style(truncate_string(value, 36)).yellow(),
            width = label_width + 1
        );
    }
    println!("    └{}┘", rule);
    println!();
}

/// Shorten a path for display
pub fn display_path(path: &Path) -> String {
    truncate_string(&path.display().to_string(), 36)
}

pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion(message: &str) {
    println!();
    println!("    {} {}", ROCKET, style(message).green().bold());
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    match detail {
        Some(detail) => println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(detail).dim()
        ),
        None => println!("      Found {} {}", style(count).yellow().bold(), description),
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_strings() {
        assert_eq!(truncate_string("data.csv", 36), "data.csv");
    }

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate_string("abcdefghij", 6), "...hij");
    }
}
