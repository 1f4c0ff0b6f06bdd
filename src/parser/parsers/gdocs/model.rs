//! Typed view of a Google Docs `documents.get` response.
//!
//! Only the parts the excerpt parser reads are modelled. Union fields
//! (`paragraph | table | …`, `textRun | pageBreak | …`) are decoded into sum
//! types. An object that sets several members of a union keeps the first one
//! in API field order.

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Deepest heading or bullet level a document may use
pub const MAX_LEVEL: usize = 64;

/// A structured document with a title and a body of components
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub document_id: Option<String>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Body {
    pub content: Vec<Component>,
}

/// One top-level structural element of the body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawComponent")]
pub enum Component {
    Paragraph(Paragraph),
    Table,
    TableOfContents,
    SectionBreak,
    /// Carries none of the known union members
    Unknown,
}

impl Component {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Table => "table",
            Self::TableOfContents => "tableOfContents",
            Self::SectionBreak => "sectionBreak",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComponent {
    paragraph: Option<Paragraph>,
    table: Option<IgnoredAny>,
    table_of_contents: Option<IgnoredAny>,
    section_break: Option<IgnoredAny>,
}

impl From<RawComponent> for Component {
    fn from(raw: RawComponent) -> Self {
        let mut found = Vec::new();
        if let Some(paragraph) = raw.paragraph {
            found.push(Self::Paragraph(paragraph));
        }
        if raw.table.is_some() {
            found.push(Self::Table);
        }
        if raw.table_of_contents.is_some() {
            found.push(Self::TableOfContents);
        }
        if raw.section_break.is_some() {
            found.push(Self::SectionBreak);
        }

        first_member(found, "structural element", Self::kind_name).unwrap_or(Self::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub paragraph_style: ParagraphStyle,
    pub elements: Vec<ParagraphElement>,
    #[serde(default)]
    pub bullet: Option<Bullet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawParagraphStyle")]
pub struct ParagraphStyle {
    pub named_style_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParagraphStyle {
    named_style_type: String,
}

impl TryFrom<RawParagraphStyle> for ParagraphStyle {
    type Error = String;

    /// Rejects `HEADING_n` styles whose numeric level exceeds [`MAX_LEVEL`]
    fn try_from(raw: RawParagraphStyle) -> Result<Self, Self::Error> {
        let name = raw.named_style_type;
        if let Some(level) = name.strip_prefix("HEADING_") {
            let numeric = !level.is_empty() && level.bytes().all(|b| b.is_ascii_digit());
            if numeric && !level.parse::<usize>().is_ok_and(|n| n <= MAX_LEVEL) {
                return Err(format!("heading style {name} is deeper than {MAX_LEVEL}"));
            }
        }
        Ok(Self {
            named_style_type: name,
        })
    }
}

/// How a paragraph's named style is treated by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedStyle<'a> {
    /// `HEADING_n`, with `n` as written in the document (1-based)
    Heading(usize),
    NormalText,
    Other(&'a str),
}

impl ParagraphStyle {
    /// Classify the named style; `HEADING_` with a non-numeric suffix or a
    /// level above [`MAX_LEVEL`] is `Other`
    #[must_use]
    pub fn named_style(&self) -> NamedStyle<'_> {
        let name = self.named_style_type.as_str();
        if name == "NORMAL_TEXT" {
            return NamedStyle::NormalText;
        }
        name.strip_prefix("HEADING_")
            .and_then(|level| level.parse().ok())
            .filter(|level| *level <= MAX_LEVEL)
            .map_or(NamedStyle::Other(name), NamedStyle::Heading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBullet")]
pub struct Bullet {
    pub list_id: Option<String>,
    /// Omitted by the API for the outermost level
    pub nesting_level: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBullet {
    #[serde(default)]
    list_id: Option<String>,
    #[serde(default)]
    nesting_level: Option<i64>,
}

impl TryFrom<RawBullet> for Bullet {
    type Error = String;

    fn try_from(raw: RawBullet) -> Result<Self, Self::Error> {
        if let Some(level) = raw.nesting_level {
            if usize::try_from(level).is_ok_and(|level| level > MAX_LEVEL) {
                return Err(format!("bullet nesting level {level} is deeper than {MAX_LEVEL}"));
            }
        }
        Ok(Self {
            list_id: raw.list_id,
            nesting_level: raw.nesting_level,
        })
    }
}

/// One inline element of a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawElement")]
pub enum ParagraphElement {
    TextRun(TextRun),
    AutoText,
    PageBreak,
    ColumnBreak,
    FootnoteReference,
    HorizontalRule,
    Equation,
    InlineObjectElement,
    Person,
    RichLink,
    /// Carries none of the known union members
    Unknown,
}

impl ParagraphElement {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::TextRun(_) => "textRun",
            Self::AutoText => "autoText",
            Self::PageBreak => "pageBreak",
            Self::ColumnBreak => "columnBreak",
            Self::FootnoteReference => "footnoteReference",
            Self::HorizontalRule => "horizontalRule",
            Self::Equation => "equation",
            Self::InlineObjectElement => "inlineObjectElement",
            Self::Person => "person",
            Self::RichLink => "richLink",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    text_run: Option<TextRun>,
    auto_text: Option<IgnoredAny>,
    page_break: Option<IgnoredAny>,
    column_break: Option<IgnoredAny>,
    footnote_reference: Option<IgnoredAny>,
    horizontal_rule: Option<IgnoredAny>,
    equation: Option<IgnoredAny>,
    inline_object_element: Option<IgnoredAny>,
    person: Option<IgnoredAny>,
    rich_link: Option<IgnoredAny>,
}

impl From<RawElement> for ParagraphElement {
    fn from(raw: RawElement) -> Self {
        let mut found: Vec<Self> = [
            (raw.auto_text.is_some(), Self::AutoText),
            (raw.page_break.is_some(), Self::PageBreak),
            (raw.column_break.is_some(), Self::ColumnBreak),
            (raw.footnote_reference.is_some(), Self::FootnoteReference),
            (raw.horizontal_rule.is_some(), Self::HorizontalRule),
            (raw.equation.is_some(), Self::Equation),
            (raw.inline_object_element.is_some(), Self::InlineObjectElement),
            (raw.person.is_some(), Self::Person),
            (raw.rich_link.is_some(), Self::RichLink),
        ]
        .into_iter()
        .filter_map(|(present, element)| present.then_some(element))
        .collect();
        if let Some(run) = raw.text_run {
            found.insert(0, Self::TextRun(run));
        }

        first_member(found, "paragraph element", Self::kind_name).unwrap_or(Self::Unknown)
    }
}

/// Keep the first union member found, warning when there were several
fn first_member<T>(
    found: Vec<T>,
    union: &str,
    kind_name: fn(&T) -> &'static str,
) -> Option<T> {
    if found.len() > 1 {
        let members: Vec<&str> = found.iter().map(kind_name).collect();
        tracing::warn!(
            union,
            members = %members.join(", "),
            "several union members set, keeping the first"
        );
    }
    found.into_iter().next()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

impl TextRun {
    /// Run text wrapped in Markdown-style emphasis markers.
    ///
    /// Wrappers nest in a fixed order: bold innermost, then italic, then
    /// underline, so a bold italic run renders as `***text***`.
    #[must_use]
    pub fn styled_text(&self) -> String {
        let style = self.text_style;
        let mut text = self.content.clone();
        if style.bold == Some(true) {
            text = format!("**{text}**");
        }
        if style.italic == Some(true) {
            text = format!("*{text}*");
        }
        if style.underline == Some(true) {
            text = format!("__{text}__");
        }
        text
    }
}

impl Paragraph {
    /// Concatenated, styled run text, trimmed, with vertical tabs turned into
    /// newlines. Non-text elements contribute nothing.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for element in &self.elements {
            match element {
                ParagraphElement::TextRun(run) => text.push_str(&run.styled_text()),
                other => {
                    tracing::debug!(element = other.kind_name(), "skipping unsupported element");
                }
            }
        }
        text.trim().replace('\u{b}', "\n")
    }

    /// Bullet nesting depth; absent bullets and negative values give 0, and
    /// the depth never exceeds [`MAX_LEVEL`]
    #[must_use]
    pub fn nesting_level(&self) -> usize {
        let Some(level) = self.bullet.as_ref().and_then(|b| b.nesting_level) else {
            return 0;
        };
        match usize::try_from(level) {
            Ok(level) if level > MAX_LEVEL => {
                tracing::warn!(level, "bullet nesting level too deep, using {MAX_LEVEL}");
                MAX_LEVEL
            }
            Ok(level) => level,
            Err(_) => {
                tracing::warn!(level, "negative bullet nesting level, using 0");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paragraph(value: serde_json::Value) -> Paragraph {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn components_decode_into_variants() {
        let body: Body = serde_json::from_value(json!({
            "content": [
                { "endIndex": 1, "sectionBreak": { "sectionStyle": {} } },
                { "table": { "rows": 1 } },
                { "tableOfContents": { "content": [] } },
                { "paragraph": {
                    "paragraphStyle": { "namedStyleType": "NORMAL_TEXT" },
                    "elements": []
                } },
                { "startIndex": 5 }
            ]
        }))
        .unwrap();

        let kinds: Vec<&str> = body.content.iter().map(Component::kind_name).collect();
        assert_eq!(
            kinds,
            ["sectionBreak", "table", "tableOfContents", "paragraph", "unknown"]
        );
    }

    #[test]
    fn component_with_two_members_keeps_the_first() {
        let component = serde_json::from_value::<Component>(json!({
            "sectionBreak": {},
            "table": {}
        }))
        .unwrap();
        assert_eq!(component, Component::Table);
    }

    #[test]
    fn paragraph_without_style_is_rejected() {
        let err = serde_json::from_value::<Paragraph>(json!({ "elements": [] })).unwrap_err();
        assert!(err.to_string().contains("paragraphStyle"));

        let err = serde_json::from_value::<Paragraph>(json!({
            "paragraphStyle": {},
            "elements": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("namedStyleType"));
    }

    #[test]
    fn named_styles_are_classified() {
        let style = |name: &str| ParagraphStyle {
            named_style_type: name.to_string(),
        };
        assert_eq!(style("HEADING_2").named_style(), NamedStyle::Heading(2));
        assert_eq!(style("NORMAL_TEXT").named_style(), NamedStyle::NormalText);
        assert_eq!(style("TITLE").named_style(), NamedStyle::Other("TITLE"));
        assert_eq!(style("HEADING_X").named_style(), NamedStyle::Other("HEADING_X"));
    }

    #[test]
    fn styled_runs_are_wrapped() {
        let p = paragraph(json!({
            "paragraphStyle": { "namedStyleType": "NORMAL_TEXT" },
            "elements": [
                { "textRun": { "content": "plain " } },
                { "textRun": { "content": "b", "textStyle": { "bold": true } } },
                { "textRun": { "content": "i", "textStyle": { "italic": true } } },
                { "textRun": { "content": "u", "textStyle": { "underline": true } } },
                { "textRun": { "content": "all", "textStyle": {
                    "bold": true, "italic": true, "underline": true
                } } },
                { "textRun": { "content": "\n", "textStyle": { "bold": false } } }
            ]
        }));
        assert_eq!(p.text(), "plain **b***i*__u____***all***__");
    }

    #[test]
    fn non_text_elements_are_skipped() {
        let p = paragraph(json!({
            "paragraphStyle": { "namedStyleType": "NORMAL_TEXT" },
            "elements": [
                { "textRun": { "content": "  before" } },
                { "pageBreak": { "textStyle": {} } },
                { "inlineObjectElement": { "inlineObjectId": "kix.1" } },
                { "textRun": { "content": "\u{b}after \n" } }
            ]
        }));
        assert_eq!(p.text(), "before\nafter");
    }

    #[test]
    fn element_with_two_members_keeps_the_first() {
        let element = serde_json::from_value::<ParagraphElement>(json!({
            "person": {},
            "textRun": { "content": "x" }
        }))
        .unwrap();
        assert_eq!(element.kind_name(), "textRun");

        let element = serde_json::from_value::<ParagraphElement>(json!({
            "richLink": {},
            "pageBreak": {}
        }))
        .unwrap();
        assert_eq!(element, ParagraphElement::PageBreak);
    }

    #[test]
    fn heading_deeper_than_limit_is_rejected() {
        let err = serde_json::from_value::<ParagraphStyle>(json!({
            "namedStyleType": "HEADING_18446744073709551615"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("deeper than"));

        let err = serde_json::from_value::<ParagraphStyle>(json!({
            "namedStyleType": format!("HEADING_{}", MAX_LEVEL + 1)
        }))
        .unwrap_err();
        assert!(err.to_string().contains("deeper than"));

        let deepest = serde_json::from_value::<ParagraphStyle>(json!({
            "namedStyleType": format!("HEADING_{MAX_LEVEL}")
        }))
        .unwrap();
        assert_eq!(deepest.named_style(), NamedStyle::Heading(MAX_LEVEL));
    }

    #[test]
    fn bullet_deeper_than_limit_is_rejected() {
        for level in [i64::MAX, 1_000_000_000, 65] {
            let err = serde_json::from_value::<Bullet>(json!({ "nestingLevel": level }))
                .unwrap_err();
            assert!(err.to_string().contains("deeper than"));
        }
        let bullet = serde_json::from_value::<Bullet>(json!({ "nestingLevel": 64 })).unwrap();
        assert_eq!(bullet.nesting_level, Some(64));
    }

    #[test]
    fn hand_built_levels_are_bounded() {
        let style = ParagraphStyle {
            named_style_type: "HEADING_100000".to_string(),
        };
        assert_eq!(style.named_style(), NamedStyle::Other("HEADING_100000"));

        let p = Paragraph {
            paragraph_style: ParagraphStyle {
                named_style_type: "NORMAL_TEXT".to_string(),
            },
            elements: Vec::new(),
            bullet: Some(Bullet {
                list_id: None,
                nesting_level: Some(i64::MAX),
            }),
        };
        assert_eq!(p.nesting_level(), MAX_LEVEL);
    }

    #[test]
    fn nesting_level_defaults_and_clamps() {
        let base = json!({
            "paragraphStyle": { "namedStyleType": "NORMAL_TEXT" },
            "elements": []
        });
        assert_eq!(paragraph(base.clone()).nesting_level(), 0);

        let mut bulleted = base.clone();
        bulleted["bullet"] = json!({ "listId": "kix.list" });
        assert_eq!(paragraph(bulleted).nesting_level(), 0);

        let mut nested = base.clone();
        nested["bullet"] = json!({ "listId": "kix.list", "nestingLevel": 2 });
        assert_eq!(paragraph(nested).nesting_level(), 2);

        let mut negative = base;
        negative["bullet"] = json!({ "nestingLevel": -1 });
        assert_eq!(paragraph(negative).nesting_level(), 0);
    }
}
