//! Heading-aware excerpt tree builder shared by every source parser
//!
//! Parsers feed the builder two kinds of events: a heading at some depth, and
//! an excerpt at some nesting level. The builder derives tags from the active
//! heading hierarchy and attaches each excerpt under the most recent excerpt
//! found at a shallower level.

use crate::models::{Excerpt, Excerpts};

/// Index route from a root excerpt down to a node in the forest
pub type ExcerptPath = Vec<usize>;

/// Mutable state for a single parse run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    /// Title of the structured document being parsed, if any
    pub document_title: Option<String>,
    /// Active heading per depth; blank entries mark skipped levels
    pub heading_hierarchy: Vec<String>,
    pub current_heading: Option<String>,
    pub current_heading_level: usize,
    /// Root excerpts produced so far
    pub excerpts: Excerpts,
    /// Most recently attached excerpt per nesting level
    pub working_excerpts: Vec<Option<ExcerptPath>>,
    /// Excerpts attached since the last section boundary
    pub section_excerpts: usize,
}

/// Builds an excerpt forest from heading and excerpt events.
///
/// The builder must be reset between independent parse runs; default tags
/// survive a reset since parsers set them just before resetting.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    state: ParserState,
    default_tags: Vec<String>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all parse state
    pub fn reset_state(&mut self) {
        self.state = ParserState::default();
    }

    /// Tags applied to every excerpt added from now on
    pub fn set_default_tags(&mut self, tags: &[String]) {
        self.default_tags = tags.to_vec();
    }

    #[must_use]
    pub fn default_tags(&self) -> &[String] {
        &self.default_tags
    }

    pub fn set_document_title(&mut self, title: impl Into<String>) {
        self.state.document_title = Some(title.into());
    }

    #[must_use]
    pub fn document_title(&self) -> Option<&str> {
        self.state.document_title.as_deref()
    }

    #[must_use]
    pub const fn state(&self) -> &ParserState {
        &self.state
    }

    #[must_use]
    pub fn heading_hierarchy(&self) -> &[String] {
        &self.state.heading_hierarchy
    }

    /// Non-blank headings from shallowest to deepest
    pub fn active_headings(&self) -> impl Iterator<Item = &str> {
        self.state
            .heading_hierarchy
            .iter()
            .filter(|h| !h.is_empty())
            .map(String::as_str)
    }

    /// Active headings joined as a `" > "` breadcrumb
    #[must_use]
    pub fn breadcrumb(&self) -> String {
        self.active_headings().collect::<Vec<_>>().join(" > ")
    }

    /// Root excerpts produced so far
    #[must_use]
    pub fn excerpts(&self) -> &[Excerpt] {
        &self.state.excerpts
    }

    /// Hand the finished forest to the caller, ending the run
    pub fn take_excerpts(&mut self) -> Excerpts {
        self.state.working_excerpts.clear();
        std::mem::take(&mut self.state.excerpts)
    }

    /// End the current section without touching the heading hierarchy
    pub fn close_heading(&mut self) {
        if self.state.section_excerpts > 0 {
            tracing::debug!(
                excerpts = self.state.section_excerpts,
                heading = self.state.current_heading.as_deref().unwrap_or(""),
                "closing section"
            );
        }
        self.state.section_excerpts = 0;
    }

    /// Make `heading` the active heading at depth `level` (0 = top level).
    ///
    /// Going deeper than the current hierarchy pads the skipped depths with
    /// blank entries; going shallower or staying level drops everything at
    /// and below `level` before the new heading is stored.
    pub fn update_heading(&mut self, heading: impl Into<String>, level: usize) {
        let heading = heading.into();
        self.close_heading();

        let hierarchy = &mut self.state.heading_hierarchy;
        if level == 0 {
            hierarchy.clear();
            hierarchy.push(heading.clone());
        } else {
            if level >= hierarchy.len() {
                hierarchy.resize(level + 1, String::new());
            } else {
                hierarchy.truncate(level + 1);
            }
            hierarchy[level].clone_from(&heading);
        }

        tracing::trace!(level, heading = %heading, "heading");
        self.state.current_heading = Some(heading);
        self.state.current_heading_level = level;
    }

    /// Tag `excerpt` and attach it at nesting `level`.
    ///
    /// The excerpt receives the default tags followed by every non-blank
    /// active heading. Its parent is the nearest excerpt recorded at a
    /// shallower level; without one it becomes a root. Returns the attached
    /// excerpt so callers can finish tagging it.
    pub fn add_excerpt(&mut self, mut excerpt: Excerpt, level: usize) -> &mut Excerpt {
        let state = &mut self.state;
        if state.working_excerpts.len() <= level {
            state.working_excerpts.resize(level + 1, None);
        }

        excerpt.tags.extend(self.default_tags.iter().cloned());
        excerpt.tags.extend(
            state
                .heading_hierarchy
                .iter()
                .filter(|h| !h.is_empty())
                .cloned(),
        );

        let parent_path = state.working_excerpts[..level]
            .iter()
            .rev()
            .find_map(Option::as_ref)
            .cloned();

        let path = match parent_path {
            Some(mut path) => {
                let parent = node_mut(&mut state.excerpts, &path);
                parent.children.push(excerpt);
                path.push(parent.children.len() - 1);
                path
            }
            None => {
                state.excerpts.push(excerpt);
                vec![state.excerpts.len() - 1]
            }
        };

        state.working_excerpts[level] = Some(path.clone());
        state.section_excerpts += 1;
        node_mut(&mut state.excerpts, &path)
    }
}

/// Paths are only ever produced by `add_excerpt` and the forest is
/// append-only within a run, so every stored path resolves.
fn node_mut<'a>(roots: &'a mut [Excerpt], path: &[usize]) -> &'a mut Excerpt {
    let mut node = &mut roots[path[0]];
    for &index in &path[1..] {
        node = &mut node.children[index];
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(excerpt: &Excerpt) -> Vec<&str> {
        excerpt.tags.iter().map(String::as_str).collect()
    }

    #[test]
    fn fresh_builder_is_empty() {
        let builder = TreeBuilder::new();
        assert!(builder.excerpts().is_empty());
        assert!(builder.heading_hierarchy().is_empty());
        assert!(builder.state().working_excerpts.is_empty());
        assert_eq!(builder.state().section_excerpts, 0);
    }

    #[test]
    fn top_level_heading_resets_hierarchy() {
        let mut builder = TreeBuilder::new();
        builder.update_heading("A", 0);
        builder.update_heading("B", 1);
        builder.update_heading("C", 0);

        assert_eq!(builder.heading_hierarchy(), ["C"]);
        assert_eq!(builder.state().current_heading.as_deref(), Some("C"));
        assert_eq!(builder.state().current_heading_level, 0);
    }

    #[test]
    fn shallower_heading_truncates_deeper_ones() {
        let mut builder = TreeBuilder::new();
        builder.update_heading("H1", 0);
        builder.update_heading("H2", 1);
        builder.update_heading("H3", 1);
        assert_eq!(builder.heading_hierarchy(), ["H1", "H3"]);

        builder.update_heading("H4", 2);
        builder.update_heading("H5", 3);
        builder.update_heading("H6", 1);
        assert_eq!(builder.heading_hierarchy(), ["H1", "H6"]);
    }

    #[test]
    fn skipped_depth_is_padded_and_not_tagged() {
        let mut builder = TreeBuilder::new();
        builder.update_heading("H1", 0);
        builder.update_heading("H2", 2);
        assert_eq!(builder.heading_hierarchy(), ["H1", "", "H2"]);

        let excerpt = builder.add_excerpt(Excerpt::new("body"), 0);
        assert_eq!(tags(excerpt), ["H1", "H2"]);
    }

    #[test]
    fn first_heading_below_top_level_pads_from_zero() {
        let mut builder = TreeBuilder::new();
        builder.update_heading("Header 1", 1);
        builder.update_heading("Header 2", 2);
        assert_eq!(builder.heading_hierarchy(), ["", "Header 1", "Header 2"]);
        assert_eq!(builder.breadcrumb(), "Header 1 > Header 2");
    }

    #[test]
    fn default_tags_come_before_heading_tags() {
        let mut builder = TreeBuilder::new();
        builder.set_default_tags(&["inbox".to_string()]);
        builder.update_heading("Topic", 0);

        let excerpt = builder.add_excerpt(Excerpt::new("body").with_tags(["own"]), 0);
        assert_eq!(tags(excerpt), ["own", "inbox", "Topic"]);
    }

    #[test]
    fn deeper_excerpt_attaches_to_previous_shallower_one() {
        let mut builder = TreeBuilder::new();
        builder.add_excerpt(Excerpt::new("root"), 0);
        builder.add_excerpt(Excerpt::new("child"), 8);
        builder.add_excerpt(Excerpt::new("grandchild"), 12);
        builder.add_excerpt(Excerpt::new("sibling root"), 0);

        let roots = builder.excerpts();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].children[0].content, "child");
        assert_eq!(roots[0].children[0].children[0].content, "grandchild");
        assert_eq!(roots[1].content, "sibling root");
        assert!(roots[1].children.is_empty());
    }

    #[test]
    fn shallower_excerpt_after_deep_one_is_a_root() {
        let mut builder = TreeBuilder::new();
        builder.add_excerpt(Excerpt::new("deep"), 8);
        builder.add_excerpt(Excerpt::new("shallow"), 0);

        let roots = builder.excerpts();
        assert_eq!(roots.len(), 2);
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn parent_lookup_skips_empty_levels() {
        let mut builder = TreeBuilder::new();
        builder.add_excerpt(Excerpt::new("a"), 0);
        builder.add_excerpt(Excerpt::new("b"), 4);
        builder.add_excerpt(Excerpt::new("c"), 4);
        builder.add_excerpt(Excerpt::new("d"), 6);

        let root = &builder.excerpts()[0];
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].content, "c");
        assert_eq!(root.children[1].children[0].content, "d");
    }

    #[test]
    fn add_excerpt_returns_attached_node() {
        let mut builder = TreeBuilder::new();
        builder.add_excerpt(Excerpt::new("parent"), 0);
        let child = builder.add_excerpt(Excerpt::new("child"), 1);
        child.tags.push("late".into());

        assert_eq!(builder.excerpts()[0].children[0].tags, vec!["late"]);
    }

    #[test]
    fn close_heading_keeps_hierarchy() {
        let mut builder = TreeBuilder::new();
        builder.update_heading("Keep", 0);
        builder.add_excerpt(Excerpt::new("x"), 0);
        assert_eq!(builder.state().section_excerpts, 1);

        builder.close_heading();
        assert_eq!(builder.state().section_excerpts, 0);
        assert_eq!(builder.heading_hierarchy(), ["Keep"]);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut once = TreeBuilder::new();
        once.update_heading("H", 0);
        once.add_excerpt(Excerpt::new("x"), 3);
        once.reset_state();

        let mut twice = once.clone();
        twice.reset_state();

        assert_eq!(once.state(), twice.state());
        assert_eq!(once.state(), &ParserState::default());
    }

    #[test]
    fn reset_keeps_default_tags() {
        let mut builder = TreeBuilder::new();
        builder.set_default_tags(&["t".to_string()]);
        builder.reset_state();
        assert_eq!(builder.default_tags(), ["t"]);
    }

    #[test]
    fn take_excerpts_ends_run() {
        let mut builder = TreeBuilder::new();
        builder.add_excerpt(Excerpt::new("x"), 0);
        let roots = builder.take_excerpts();

        assert_eq!(roots.len(), 1);
        assert!(builder.excerpts().is_empty());

        builder.add_excerpt(Excerpt::new("y"), 1);
        assert_eq!(builder.excerpts()[0].content, "y");
    }
}
