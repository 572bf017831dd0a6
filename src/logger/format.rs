//! Log formatting and output with ANSI colors and text wrapping
//!
//! Handles:
//! - Colorized console output with tag and level formatting
//! - Text wrapping at word boundaries
//! - Broken pipe handling for piped commands

use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 8;
const LOG_TYPE_WIDTH: usize = 7;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

/// Format and output a log message
pub fn format_and_log(tag: &LogTag, level: LogLevel, message: &str, use_colors: bool) {
    let time = Local::now().format("%H:%M:%S").to_string();

    let tag_label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    let level_label = format!("{:<width$}", level.as_str(), width = LOG_TYPE_WIDTH);

    let plain_prefix = format!("{} [{}] [{}] ", time, tag_label, level_label);
    let prefix = if use_colors {
        format!(
            "{} [{}] [{}] ",
            time.dimmed(),
            color_tag(tag, &tag_label),
            color_level(level, &level_label)
        )
    } else {
        plain_prefix.clone()
    };

    let available = MAX_LINE_LENGTH.saturating_sub(plain_prefix.len()).max(50);
    let chunks = wrap_text(message, available);

    print_stdout_safe(&format!("{}{}", prefix, chunks[0]));

    let continuation = " ".repeat(plain_prefix.len());
    for chunk in &chunks[1..] {
        print_stdout_safe(&format!("{}{}", continuation, chunk));
    }
}

/// Format a tag with appropriate color
fn color_tag(tag: &LogTag, label: &str) -> ColoredString {
    match tag {
        LogTag::Cache => label.bright_cyan().bold(),
        LogTag::Config => label.bright_magenta().bold(),
        LogTag::Stress => label.bright_green().bold(),
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

/// Format log level with appropriate color
fn color_level(level: LogLevel, label: &str) -> ColoredString {
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.yellow().bold(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
        LogLevel::Info => label.white().bold(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    if let Err(e) = writeln!(stdout(), "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
    if let Err(e) = stdout().flush() {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
}

/// Wrap text at word boundaries, respecting existing newlines
///
/// Always returns at least one (possibly empty) line.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                result.extend(break_long_word(word, max_width));
            } else if current.is_empty() {
                current = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }
    result
}

/// Break a very long word into fixed-width chunks on char boundaries
fn break_long_word(word: &str, max_width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_single_line() {
        assert_eq!(wrap_text("evicted 1 entry", 50), vec!["evicted 1 entry"]);
    }

    #[test]
    fn test_wraps_on_words() {
        let lines = wrap_text("aaa bbb ccc ddd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_breaks_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_keeps_newlines_and_empty() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
