use std::collections::HashMap;

use crate::error::ReshapeError;

/// A control line that configures the chart or the reshaping instead of
/// carrying a data point.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Title(String),
    XLabel(String),
    YLabel(String),
    Ignore(Vec<String>),
    Sort(Vec<String>),
    Rename { from: String, to: String },
}

/// A data line before any column hypothesis has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLine {
    /// 1-based line number in the input.
    pub line: usize,
    pub text: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Skip,
    Directive(Directive),
    Data(DataLine),
}

/// Everything the directives configured, independent of where they appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directives {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub ignore: Vec<String>,
    pub sort: Vec<String>,
    pub renames: HashMap<String, String>,
}

impl Directives {
    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Title(t) => self.title = Some(t),
            Directive::XLabel(t) => self.x_label = Some(t),
            Directive::YLabel(t) => self.y_label = Some(t),
            Directive::Ignore(labels) => self.ignore.extend(labels),
            Directive::Sort(labels) => self.sort.extend(labels),
            Directive::Rename { from, to } => {
                self.renames.insert(from, to);
            }
        }
    }

    pub fn is_ignored(&self, label: &str) -> bool {
        self.ignore.iter().any(|l| l == label)
    }

    /// Single-step rename; the result is never looked up again.
    pub fn renamed<'a>(&'a self, label: &'a str) -> &'a str {
        self.renames.get(label).map(String::as_str).unwrap_or(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedInput {
    pub directives: Directives,
    pub data: Vec<DataLine>,
}

/// Classify one input line. `number` is the 1-based line number.
pub fn classify_line(number: usize, raw: &str) -> Result<Line, ReshapeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Line::Skip);
    }

    let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((k, r)) => (k, r.trim()),
        None => (trimmed, ""),
    };
    let words = || rest.split_whitespace().map(str::to_string).collect::<Vec<_>>();

    let directive = match keyword {
        "TITLE" => Directive::Title(rest.to_string()),
        "XLABEL" => Directive::XLabel(rest.to_string()),
        "YLABEL" => Directive::YLabel(rest.to_string()),
        "IGNORE" => Directive::Ignore(words()),
        "SORT" => Directive::Sort(words()),
        "RENAME" => match words().as_slice() {
            [from, to] => Directive::Rename {
                from: from.clone(),
                to: to.clone(),
            },
            _ => {
                return Err(ReshapeError::MalformedDirective {
                    line: number,
                    content: trimmed.to_string(),
                })
            }
        },
        _ => {
            return Ok(Line::Data(DataLine {
                line: number,
                text: trimmed.to_string(),
                tokens: trimmed.split_whitespace().map(str::to_string).collect(),
            }))
        }
    };
    Ok(Line::Directive(directive))
}

/// Split the whole input into directives and data lines.
pub fn parse_input<'a, I>(lines: I) -> Result<ParsedInput, ReshapeError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parsed = ParsedInput::default();
    for (idx, raw) in lines.into_iter().enumerate() {
        match classify_line(idx + 1, raw)? {
            Line::Skip => {}
            Line::Directive(d) => parsed.directives.apply(d),
            Line::Data(d) => parsed.data.push(d),
        }
    }
    tracing::debug!(
        data_lines = parsed.data.len(),
        ignored = parsed.directives.ignore.len(),
        renames = parsed.directives.renames.len(),
        "parsed input"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_are_recognised_by_first_token() {
        let parsed = parse_input(
            "TITLE Throughput vs threads\nXLABEL threads\nYLABEL ops/s\nIGNORE none nbr\nSORT debra he\nRENAME 2geibr IBR\nhe 1 10"
                .lines(),
        )
        .unwrap();
        let d = &parsed.directives;
        assert_eq!(d.title.as_deref(), Some("Throughput vs threads"));
        assert_eq!(d.x_label.as_deref(), Some("threads"));
        assert_eq!(d.y_label.as_deref(), Some("ops/s"));
        assert_eq!(d.ignore, ["none", "nbr"]);
        assert_eq!(d.sort, ["debra", "he"]);
        assert_eq!(d.renamed("2geibr"), "IBR");
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].line, 7);
    }

    #[test]
    fn directives_accumulate_across_lines() {
        let parsed = parse_input("IGNORE a\nSORT x\nIGNORE b\nSORT y".lines()).unwrap();
        assert_eq!(parsed.directives.ignore, ["a", "b"]);
        assert_eq!(parsed.directives.sort, ["x", "y"]);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let parsed = parse_input("\n   \n# a comment\na 1 2\n".lines()).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].tokens, ["a", "1", "2"]);
        assert_eq!(parsed.data[0].line, 4);
    }

    #[test]
    fn tokens_split_on_any_whitespace() {
        match classify_line(1, "  a\t 1   2  ").unwrap() {
            Line::Data(d) => assert_eq!(d.tokens, ["a", "1", "2"]),
            other => panic!("expected data line, got {other:?}"),
        }
    }

    #[test]
    fn keyword_must_be_the_whole_first_token() {
        assert!(matches!(classify_line(1, "TITLES 1 2").unwrap(), Line::Data(_)));
    }

    #[test]
    fn rename_needs_exactly_two_labels() {
        let err = classify_line(3, "RENAME onlyone").unwrap_err();
        assert_eq!(
            err,
            ReshapeError::MalformedDirective {
                line: 3,
                content: "RENAME onlyone".into()
            }
        );
        assert!(classify_line(1, "RENAME a b c").is_err());
    }

    #[test]
    fn rename_is_single_step() {
        let parsed = parse_input("RENAME a b\nRENAME b c".lines()).unwrap();
        assert_eq!(parsed.directives.renamed("a"), "b");
        assert_eq!(parsed.directives.renamed("b"), "c");
        assert_eq!(parsed.directives.renamed("z"), "z");
    }
}
