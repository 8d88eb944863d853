//! Record formatting
//!
//! Layout: `(<severity>) <YYYY-mm-dd HH:MM:SS> [<channel>] <message>`.
//! Console output wraps the line in the severity's color code.

use time::macros::format_description;

use crate::record::Record;

const RESET: &str = "\x1b[0m";

/// Renders records into single lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatter {
    colors: bool,
}

impl Formatter {
    /// Plain formatter used by file destinations
    pub const fn plain() -> Self {
        Self { colors: false }
    }

    /// Formatter that emits ANSI color codes
    pub const fn colored() -> Self {
        Self { colors: true }
    }

    /// Whether color codes are emitted
    pub const fn colors(self) -> bool {
        self.colors
    }

    /// Render `record` as one line, including the trailing newline
    pub fn format(self, record: &Record) -> String {
        let severity = record.severity();
        let timestamp = record
            .timestamp()
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
            .unwrap_or_else(|_| record.timestamp().unix_timestamp().to_string());

        let mut line = String::with_capacity(record.message().len() + record.channel().len() + 48);
        if self.colors {
            line.push_str(severity.color());
        }
        line.push('(');
        line.push_str(severity.as_str());
        line.push_str(") ");
        line.push_str(&timestamp);
        line.push_str(" [");
        line.push_str(record.channel());
        line.push_str("] ");
        line.push_str(record.message());
        if self.colors {
            line.push_str(RESET);
        }
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use time::macros::datetime;

    fn record() -> Record {
        Record::new("parser.1.0", Severity::Error, "bad token").at(datetime!(2024-03-05 07:08:09 UTC))
    }

    #[test]
    fn test_plain_layout() {
        assert_eq!(
            Formatter::plain().format(&record()),
            "(error) 2024-03-05 07:08:09 [parser.1.0] bad token\n"
        );
    }

    #[test]
    fn test_colored_layout() {
        let line = Formatter::colored().format(&record());
        assert!(line.starts_with("\x1b[1m\x1b[31m(error) "));
        assert!(line.ends_with("bad token\x1b[0m\n"));
    }
}
