//! Usage text rendering.
//!
//! One line per declaration, in declaration order:
//!
//! ```text
//! Usage:
//! -v --verbose     Provide verbose output
//! -p --port        The port number (default: 8080)
//! -f --files       Files to upload REQUIRED
//! ```
//!
//! The long-name column is as wide as the longest long name (at least 10).
//! Descriptions that would push a line past 80 columns wrap at word
//! boundaries, with continuation lines aligned under the description column.
//! A newline in a description starts a new continuation line.
//!
//! Words are never split, so a line still passes 80 columns when a single
//! word is wider than the description column, or when the long name is so
//! wide that the description column starts at or past column 80. The
//! `(default: ..)` and `REQUIRED` suffixes can also push the last line over.

use crate::spec::OptionSpec;

pub const DEFAULT_HEADER: &str = "Usage:";

const MAX_WIDTH: usize = 80;
const MIN_LONG_WIDTH: usize = 10;

/// Render the usage block for `specs`, headed by `banner` or `Usage:`.
pub fn render(banner: Option<&str>, specs: &[OptionSpec]) -> String {
    let width = specs
        .iter()
        .map(|s| s.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_LONG_WIDTH);

    let mut out = String::new();
    out.push_str(banner.map(str::trim_end).unwrap_or(DEFAULT_HEADER));
    out.push('\n');
    for spec in specs {
        for line in spec_lines(spec, width) {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

fn spec_lines(spec: &OptionSpec, width: usize) -> Vec<String> {
    let short = spec
        .short_name()
        .map(|c| format!("-{c}"))
        .unwrap_or_default();
    let prefix = format!("{short:<3}--{:<width$}  ", spec.display_name());
    let indent = prefix.chars().count();

    let mut lines: Vec<String> = wrap(spec.description(), MAX_WIDTH.saturating_sub(indent))
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            if i == 0 {
                format!("{prefix}{chunk}")
            } else {
                format!("{:indent$}{chunk}", "")
            }
        })
        .collect();

    // Suffixes stay on the last line even when they overflow it.
    if let Some(last) = lines.last_mut() {
        if let Some(default) = spec.default_value() {
            last.push_str(&format!(" (default: {default})"));
        }
        if spec.is_required() {
            last.push_str(" REQUIRED");
        }
    }
    lines
}

/// Break `text` into chunks of at most `room` columns without splitting words.
///
/// Each line of `text` is wrapped on its own, and every run of whitespace
/// inside a line becomes one space whether or not the line needs wrapping.
/// Always yields at least one chunk. A single word wider than `room` is
/// emitted on its own line rather than cut.
fn wrap(text: &str, room: usize) -> Vec<String> {
    let mut chunks: Vec<String> = text.lines().flat_map(|l| wrap_line(l, room)).collect();
    if chunks.is_empty() {
        chunks.push(String::new());
    }
    chunks
}

fn wrap_line(text: &str, room: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + 1 + word_len > room {
            chunks.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.push_str(word);
        line_len += word_len;
    }
    if line_len > 0 || chunks.is_empty() {
        chunks.push(line);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn columns_align_to_minimum_width() {
        let specs = vec![
            OptionSpec::flag("verbose").short('v').desc("Provide verbose output"),
            OptionSpec::option("port")
                .short('p')
                .desc("The port number")
                .default("8080"),
            OptionSpec::option("files")
                .short('f')
                .desc("Files to upload")
                .required(true),
        ];
        let text = render(None, &specs);
        assert_eq!(
            lines(&text),
            [
                "Usage:",
                "-v --verbose     Provide verbose output",
                "-p --port        The port number (default: 8080)",
                "-f --files       Files to upload REQUIRED",
            ]
        );
    }

    #[test]
    fn long_names_widen_the_column_and_show_dashes() {
        let specs = vec![
            OptionSpec::option("exclude_from_listing").short('e').desc("Skip these"),
            OptionSpec::flag("all").short('a').desc("Everything"),
        ];
        let text = render(Some("Usage: sync [OPTIONS]\n"), &specs);
        assert_eq!(
            lines(&text),
            [
                "Usage: sync [OPTIONS]",
                "-e --exclude-from-listing  Skip these",
                "-a --all                   Everything",
            ]
        );
    }

    #[test]
    fn missing_short_name_and_description() {
        let specs = vec![OptionSpec::flag("quiet")];
        let text = render(None, &specs);
        assert_eq!(lines(&text), ["Usage:", "   --quiet"]);
    }

    #[test]
    fn long_descriptions_wrap_at_word_boundaries() {
        let desc = "Directories that should be excluded from the upload, relative to the \
                    working directory, separated by commas when given more than once";
        let specs = vec![OptionSpec::option("exclude-from").short('e').desc(desc)];
        let text = render(None, &specs);
        let out = lines(&text);

        assert!(out.len() > 2, "expected wrapping:\n{text}");
        let indent = "-e --exclude-from  ".len();
        for line in &out[1..] {
            assert!(line.chars().count() <= MAX_WIDTH, "line too wide: {line:?}");
        }
        for line in &out[2..] {
            assert!(line.starts_with(&" ".repeat(indent)), "bad indent: {line:?}");
            assert!(!line[indent..].starts_with(' '), "bad indent: {line:?}");
        }

        // No word was split: re-joining the chunks gives back the description.
        let rejoined: Vec<&str> = out[1..]
            .iter()
            .enumerate()
            .map(|(i, l)| if i == 0 { &l[indent..] } else { l.trim_start() })
            .collect();
        assert_eq!(rejoined.join(" "), desc.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn newlines_in_descriptions_keep_the_indent() {
        let specs = vec![
            OptionSpec::option("port")
                .short('p')
                .desc("first line\nsecond line")
                .default("8080"),
        ];
        let text = render(None, &specs);
        assert_eq!(
            lines(&text),
            [
                "Usage:",
                "-p --port        first line",
                "                 second line (default: 8080)",
            ]
        );
    }

    #[test]
    fn suffixes_land_on_the_last_wrapped_line() {
        let desc = "word ".repeat(20);
        let specs = vec![
            OptionSpec::option("mode")
                .short('m')
                .desc(desc.trim_end())
                .default("fast"),
        ];
        let text = render(None, &specs);
        let out = lines(&text);
        assert_eq!(out.len(), 3, "unexpected layout:\n{text}");
        assert!(!out[1].contains("(default"));
        assert!(out[2].ends_with("word (default: fast)"));
    }

    #[test]
    fn wrap_keeps_oversized_words_whole() {
        let long = "x".repeat(30);
        assert_eq!(wrap(&format!("a {long} b"), 10), ["a", long.as_str(), "b"]);
        assert_eq!(wrap("", 0), [""]);
        assert_eq!(wrap("fits", 4), ["fits"]);
        assert_eq!(wrap("a  \t b", 10), ["a b"]);
        assert_eq!(wrap("a\n\nb c", 10), ["a", "", "b c"]);
    }

    #[test]
    fn very_long_names_leave_no_room_for_descriptions() {
        let name = "n".repeat(78);
        let specs = vec![OptionSpec::flag(name.as_str()).desc("one two")];
        let text = render(None, &specs);
        let out = lines(&text);
        assert_eq!(out.len(), 3, "unexpected layout:\n{text}");
        assert_eq!(out[1], format!("   --{name}  one"));
        assert_eq!(out[2], format!("{}two", " ".repeat(85)));
    }
}
