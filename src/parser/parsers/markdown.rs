//! Markdown parser implementation
//!
//! Markdown input is handled line by line: `#` lines set the heading
//! hierarchy, `---`/`===` lines end a section, and every other non-blank line
//! becomes an excerpt nested by its leading whitespace.

use crate::config::ParserConfig;
use crate::error::ParseResult;
use crate::models::{Excerpt, Excerpts};
use crate::parser::{ExcerptParser, SourceKind, TreeBuilder};

/// A non-blank line after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Heading { level: usize, text: &'a str },
    SectionBreak,
    Content { text: &'a str, is_list_item: bool },
}

/// Parser for Markdown and plain-text outlines
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    config: ParserConfig,
    builder: TreeBuilder,
}

impl ExcerptParser for MarkdownParser {
    fn source_kind(&self) -> SourceKind {
        SourceKind::Markdown
    }

    fn parse(&mut self, raw: &str, default_tags: &[String]) -> ParseResult<Excerpts> {
        Ok(self.parse_text(raw, default_tags))
    }
}

impl MarkdownParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            builder: TreeBuilder::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse Markdown text into a forest of excerpts.
    ///
    /// Heading levels are the raw `#` count, so `# A` sits at depth 1 of the
    /// hierarchy. Blank lines are ignored entirely.
    pub fn parse_text(&mut self, text: &str, default_tags: &[String]) -> Excerpts {
        self.builder.set_default_tags(default_tags);
        self.builder.reset_state();

        for line in text.split('\n') {
            let raw_indent = self.indent_level(line);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match self.classify(trimmed) {
                Line::Heading { level, text } => self.builder.update_heading(text, level),
                Line::SectionBreak => self.builder.close_heading(),
                Line::Content { text, is_list_item } => {
                    let indent = if is_list_item {
                        self.normalize_list_indent(raw_indent)
                    } else {
                        raw_indent
                    };
                    let excerpt = Excerpt::new(text)
                        .with_indent_level(indent)
                        .with_original_indent_level(raw_indent);
                    self.builder.add_excerpt(excerpt, indent);
                }
            }
        }

        self.builder.close_heading();
        self.builder.take_excerpts()
    }

    fn classify<'a>(&self, trimmed: &'a str) -> Line<'a> {
        if trimmed.starts_with('#') {
            let text = trimmed.trim_start_matches('#');
            return Line::Heading {
                level: trimmed.len() - text.len(),
                text: text.trim(),
            };
        }

        if self
            .config
            .section_break_markers
            .iter()
            .any(|marker| trimmed.starts_with(marker.as_str()))
        {
            return Line::SectionBreak;
        }

        match self.strip_list_marker(trimmed) {
            Some(text) => Line::Content {
                text,
                is_list_item: true,
            },
            None => Line::Content {
                text: trimmed,
                is_list_item: false,
            },
        }
    }

    /// Remove one leading list marker and the whitespace after it
    fn strip_list_marker<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
        self.config
            .list_markers
            .iter()
            .find_map(|marker| trimmed.strip_prefix(marker.as_str()))
            .map(str::trim_start)
    }

    /// Width of the leading whitespace, counting a tab as `tab_size` columns
    fn indent_level(&self, line: &str) -> usize {
        let leading = &line[..line.len() - line.trim_start().len()];
        let tabs = leading.chars().filter(|c| *c == '\t').count();
        let spaces = leading.chars().filter(|c| *c == ' ').count();
        tabs * self.tab_size() + spaces
    }

    /// Round down to a whole number of tabs so stray spaces before a list
    /// marker don't create an extra nesting level
    fn normalize_list_indent(&self, indent: usize) -> usize {
        let tab_size = self.tab_size();
        if !self.config.normalize_list_indent || tab_size == 0 {
            return indent;
        }
        indent / tab_size * tab_size
    }

    fn tab_size(&self) -> usize {
        self.config.tab_size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Excerpts {
        MarkdownParser::new().parse_text(text, &[])
    }

    fn contents(excerpts: &[Excerpt]) -> Vec<&str> {
        excerpts.iter().map(|e| e.content.as_str()).collect()
    }

    #[test]
    fn empty_text_has_no_excerpts() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n\t\n").is_empty());
    }

    #[test]
    fn plain_lines_are_root_excerpts() {
        let excerpts = parse("First line\nSecond line\n\nThird line");
        assert_eq!(contents(&excerpts), ["First line", "Second line", "Third line"]);
        for excerpt in &excerpts {
            assert_eq!(excerpt.indent_level, 0);
            assert!(excerpt.tags.is_empty());
            assert!(excerpt.children.is_empty());
        }
    }

    #[test]
    fn headings_become_tags() {
        let excerpts = parse("# Header 1\n## Header 2\nBody text");
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].content, "Body text");
        assert_eq!(excerpts[0].tags, vec!["Header 1", "Header 2"]);
    }

    #[test]
    fn heading_tags_are_prefix_scoped() {
        let excerpts = parse("# H1\n## H2\n### H3\nDeep\n## Other\nShallow");
        assert_eq!(excerpts[0].tags, vec!["H1", "H2", "H3"]);
        assert_eq!(excerpts[1].tags, vec!["H1", "Other"]);
    }

    #[test]
    fn skipped_heading_level_is_not_tagged() {
        let excerpts = parse("# Top\n### Deep\nBody");
        assert_eq!(excerpts[0].tags, vec!["Top", "Deep"]);
    }

    #[test]
    fn default_tags_precede_heading_tags() {
        let mut parser = MarkdownParser::new();
        let tags = vec!["tag1".to_string(), "tag2".to_string()];
        let excerpts = parser.parse_text("# Topic\nSome content", &tags);
        assert_eq!(excerpts[0].tags, vec!["tag1", "tag2", "Topic"]);
    }

    #[test]
    fn indented_line_is_child() {
        let excerpts = parse("Root\n    Indented once");
        assert_eq!(excerpts.len(), 1);
        let child = &excerpts[0].children[0];
        assert_eq!(child.content, "Indented once");
        assert_eq!(child.indent_level, 4);
    }

    #[test]
    fn indentation_nests_and_unnests() {
        let excerpts = parse("Root\n        Indented once\n            Indented twice\nSibling");
        assert_eq!(contents(&excerpts), ["Root", "Sibling"]);

        let once = &excerpts[0].children[0];
        assert_eq!(once.indent_level, 8);
        assert_eq!(once.children[0].content, "Indented twice");
        assert_eq!(once.children[0].indent_level, 12);
    }

    #[test]
    fn tabs_count_as_four_columns() {
        let excerpts = parse("Root\n\tOne tab\n\t\tTwo tabs\n\t  Mixed");
        let one = &excerpts[0].children[0];
        assert_eq!(one.indent_level, 4);
        assert_eq!(one.children[0].indent_level, 8);
        assert_eq!(one.children[1].content, "Mixed");
        assert_eq!(one.children[1].indent_level, 6);
    }

    #[test]
    fn list_markers_are_stripped() {
        let excerpts = parse("- First item\n* Second item\n| Third item\n-   Spaced");
        assert_eq!(
            contents(&excerpts),
            ["First item", "Second item", "Third item", "Spaced"]
        );
    }

    #[test]
    fn only_one_list_marker_is_stripped() {
        let excerpts = parse("- - nested marker\n-5 degrees");
        assert_eq!(contents(&excerpts), ["- nested marker", "-5 degrees"]);
    }

    #[test]
    fn list_indent_is_rounded_down_to_tab_stops() {
        let excerpts = parse("- Root\n  - Drifted\n      - Nested");
        assert_eq!(contents(&excerpts), ["Root", "Drifted"]);

        let drifted = &excerpts[1];
        assert_eq!(drifted.indent_level, 0);
        assert_eq!(drifted.original_indent_level, Some(2));
        assert_eq!(drifted.children[0].indent_level, 4);
        assert_eq!(drifted.children[0].original_indent_level, Some(6));
    }

    #[test]
    fn plain_line_indent_is_not_rounded() {
        let excerpts = parse("Root\n  two spaces");
        assert_eq!(excerpts[0].children[0].indent_level, 2);
    }

    #[test]
    fn normalization_can_be_disabled() {
        let config = ParserConfig {
            normalize_list_indent: false,
            ..ParserConfig::default()
        };
        let excerpts = MarkdownParser::with_config(config).parse_text("- Root\n  - Drifted", &[]);
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].children[0].indent_level, 2);
    }

    #[test]
    fn section_breaks_produce_no_excerpts() {
        let excerpts = parse("# Keep\nBefore\n---\nAfter\n===\nLast");
        assert_eq!(contents(&excerpts), ["Before", "After", "Last"]);
        assert_eq!(excerpts[2].tags, vec!["Keep"]);
    }

    #[test]
    fn mixed_outline() {
        let text = "# Main Header\nSome text under main header\n## Sub Header\n- List item 1\n        - Nested list item\n* List item 2\nRegular text";
        let excerpts = parse(text);

        assert_eq!(
            contents(&excerpts),
            [
                "Some text under main header",
                "List item 1",
                "List item 2",
                "Regular text"
            ]
        );
        assert_eq!(excerpts[0].tags, vec!["Main Header"]);
        assert_eq!(excerpts[1].tags, vec!["Main Header", "Sub Header"]);

        let nested = &excerpts[1].children[0];
        assert_eq!(nested.content, "Nested list item");
        assert_eq!(nested.indent_level, 8);
        assert_eq!(nested.tags, vec!["Main Header", "Sub Header"]);
    }

    #[test]
    fn each_parse_starts_fresh() {
        let mut parser = MarkdownParser::new();
        let first = parser.parse_text("# A\nRoot\n    Child", &["x".to_string()]);
        let second = parser.parse_text("Alone", &[]);

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert!(second[0].tags.is_empty());
        assert!(second[0].children.is_empty());
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let excerpts = parse("# Title\r\nLine\r\n");
        assert_eq!(excerpts[0].content, "Line");
        assert_eq!(excerpts[0].tags, vec!["Title"]);
    }
}
