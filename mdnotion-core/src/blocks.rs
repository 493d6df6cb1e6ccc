//! Notion block model.
//!
//! [`Block`] serializes to the JSON accepted by
//! `PATCH /v1/blocks/{id}/children`. Only the block types the renderer emits
//! are modelled; blocks read back from the API go through the more permissive
//! [`RemoteBlock`](crate::store::RemoteBlock).

use serde::{Deserialize, Serialize};

/// Maximum length Notion accepts for a single rich text `content` string.
pub const MAX_TEXT_LEN: usize = 2000;

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// A URL target inside rendered content: a rich text hyperlink or the source
/// of an external image. [`visit_links_mut`] walks exactly these nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "default".to_string()
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}

impl Annotations {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// One rich text segment.
///
/// Mentions and equations read back from the API have no `text` object; only
/// `plain_text` is kept for those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Annotations::is_plain")]
    pub annotations: Annotations,
    #[serde(default, skip_serializing)]
    pub plain_text: Option<String>,
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, Annotations::default())
    }

    pub fn styled(content: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            text: Some(TextContent {
                content: content.into(),
                link: None,
            }),
            annotations,
            plain_text: None,
        }
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        if let Some(text) = self.text.as_mut() {
            text.link = Some(Link { url: url.into() });
        }
        self
    }

    /// Visible text of the segment.
    pub fn content(&self) -> &str {
        match (&self.text, &self.plain_text) {
            (Some(text), _) => &text.content,
            (None, Some(plain)) => plain,
            (None, None) => "",
        }
    }

    pub fn link(&self) -> Option<&Link> {
        self.text.as_ref().and_then(|t| t.link.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Block payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToDoBlock {
    pub rich_text: Vec<RichText>,
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub rich_text: Vec<RichText>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Empty {}

/// File hosted outside Notion. Used for icons, which are page chrome and
/// therefore not a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { external: ExternalFile },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutBlock {
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(rename = "type")]
    pub source_type: String,
    pub external: Link,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<RichText>,
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A content block, tagged the way the Notion API tags it:
/// `{"type": "paragraph", "paragraph": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        paragraph: TextBlock,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        heading_1: TextBlock,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        heading_2: TextBlock,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        heading_3: TextBlock,
    },
    BulletedListItem {
        bulleted_list_item: TextBlock,
    },
    NumberedListItem {
        numbered_list_item: TextBlock,
    },
    ToDo {
        to_do: ToDoBlock,
    },
    Quote {
        quote: TextBlock,
    },
    Code {
        code: CodeBlock,
    },
    Divider {
        divider: Empty,
    },
    Callout {
        callout: CalloutBlock,
    },
    Image {
        image: ImageBlock,
    },
}

impl Block {
    pub fn paragraph(rich_text: Vec<RichText>) -> Self {
        Block::Paragraph {
            paragraph: TextBlock {
                rich_text,
                children: Vec::new(),
            },
        }
    }

    /// Empty paragraph used as vertical space.
    pub fn spacer() -> Self {
        Self::paragraph(Vec::new())
    }

    /// Heading for `level` 1..=3; deeper levels collapse to 3.
    pub fn heading(level: u8, rich_text: Vec<RichText>) -> Self {
        let body = TextBlock {
            rich_text,
            children: Vec::new(),
        };
        match level {
            0 | 1 => Block::Heading1 { heading_1: body },
            2 => Block::Heading2 { heading_2: body },
            _ => Block::Heading3 { heading_3: body },
        }
    }

    pub fn bulleted(rich_text: Vec<RichText>, children: Vec<Block>) -> Self {
        Block::BulletedListItem {
            bulleted_list_item: TextBlock { rich_text, children },
        }
    }

    pub fn numbered(rich_text: Vec<RichText>, children: Vec<Block>) -> Self {
        Block::NumberedListItem {
            numbered_list_item: TextBlock { rich_text, children },
        }
    }

    pub fn to_do(rich_text: Vec<RichText>, checked: bool, children: Vec<Block>) -> Self {
        Block::ToDo {
            to_do: ToDoBlock {
                rich_text,
                checked,
                children,
            },
        }
    }

    pub fn quote(rich_text: Vec<RichText>, children: Vec<Block>) -> Self {
        Block::Quote {
            quote: TextBlock { rich_text, children },
        }
    }

    pub fn code(rich_text: Vec<RichText>, language: impl Into<String>) -> Self {
        Block::Code {
            code: CodeBlock {
                rich_text,
                language: language.into(),
            },
        }
    }

    pub fn divider() -> Self {
        Block::Divider {
            divider: Empty::default(),
        }
    }

    pub fn callout(rich_text: Vec<RichText>, icon: Option<Icon>) -> Self {
        Block::Callout {
            callout: CalloutBlock { rich_text, icon },
        }
    }

    pub fn image(url: impl Into<String>, caption: Vec<RichText>) -> Self {
        Block::Image {
            image: ImageBlock {
                source_type: "external".to_string(),
                external: Link { url: url.into() },
                caption,
            },
        }
    }

    /// Rich text carried directly by this block, if any.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            Block::Paragraph { paragraph: b }
            | Block::Heading1 { heading_1: b }
            | Block::Heading2 { heading_2: b }
            | Block::Heading3 { heading_3: b }
            | Block::BulletedListItem { bulleted_list_item: b }
            | Block::NumberedListItem { numbered_list_item: b }
            | Block::Quote { quote: b } => Some(&b.rich_text),
            Block::ToDo { to_do } => Some(&to_do.rich_text),
            Block::Code { code } => Some(&code.rich_text),
            Block::Callout { callout } => Some(&callout.rich_text),
            Block::Image { image } => Some(&image.caption),
            Block::Divider { .. } => None,
        }
    }

    /// Nested blocks, for block types that can hold them.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::Paragraph { paragraph: b }
            | Block::Heading1 { heading_1: b }
            | Block::Heading2 { heading_2: b }
            | Block::Heading3 { heading_3: b }
            | Block::BulletedListItem { bulleted_list_item: b }
            | Block::NumberedListItem { numbered_list_item: b }
            | Block::Quote { quote: b } => Some(&mut b.children),
            Block::ToDo { to_do } => Some(&mut to_do.children),
            Block::Code { .. }
            | Block::Callout { .. }
            | Block::Image { .. }
            | Block::Divider { .. } => None,
        }
    }

    /// Calls `f` on every [`Link`] in this block and its nested children.
    pub fn visit_links_mut<F: FnMut(&mut Link)>(&mut self, f: &mut F) {
        match self {
            Block::Paragraph { paragraph: b }
            | Block::Heading1 { heading_1: b }
            | Block::Heading2 { heading_2: b }
            | Block::Heading3 { heading_3: b }
            | Block::BulletedListItem { bulleted_list_item: b }
            | Block::NumberedListItem { numbered_list_item: b }
            | Block::Quote { quote: b } => {
                visit_rich_text(&mut b.rich_text, f);
                visit_links_mut(&mut b.children, f);
            }
            Block::ToDo { to_do } => {
                visit_rich_text(&mut to_do.rich_text, f);
                visit_links_mut(&mut to_do.children, f);
            }
            Block::Code { code } => visit_rich_text(&mut code.rich_text, f),
            Block::Callout { callout } => visit_rich_text(&mut callout.rich_text, f),
            Block::Image { image } => {
                f(&mut image.external);
                visit_rich_text(&mut image.caption, f);
            }
            Block::Divider { .. } => {}
        }
    }
}

/// Calls `f` on every [`Link`] in `blocks`, depth first.
pub fn visit_links_mut<F: FnMut(&mut Link)>(blocks: &mut [Block], f: &mut F) {
    for block in blocks {
        block.visit_links_mut(f);
    }
}

fn visit_rich_text<F: FnMut(&mut Link)>(segments: &mut [RichText], f: &mut F) {
    for segment in segments {
        if let Some(link) = segment.text.as_mut().and_then(|t| t.link.as_mut()) {
            f(link);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn paragraph_serializes_in_notion_shape() {
        let block = Block::paragraph(vec![RichText::plain("hello").with_link("https://x.dev")]);
        let value = serde_json::to_value(&block).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [
                        {"text": {"content": "hello", "link": {"url": "https://x.dev"}}}
                    ]
                }
            })
        );
    }

    #[test]
    fn heading_tags_use_underscored_names() {
        let value = serde_json::to_value(Block::heading(2, vec![RichText::plain("h")]))
            .expect("serialize");
        assert_eq!(value["type"], "heading_2");
        assert!(value.get("heading_2").is_some());

        let deep = serde_json::to_value(Block::heading(5, vec![])).expect("serialize");
        assert_eq!(deep["type"], "heading_3");
    }

    #[test]
    fn divider_and_annotations_serialize() {
        let divider = serde_json::to_value(Block::divider()).expect("serialize");
        assert_eq!(divider, json!({"type": "divider", "divider": {}}));

        let styled = RichText::styled(
            "note",
            Annotations {
                italic: true,
                color: "gray".to_string(),
                ..Annotations::default()
            },
        );
        let value = serde_json::to_value(&styled).expect("serialize");
        assert_eq!(value["annotations"]["italic"], true);
        assert_eq!(value["annotations"]["color"], "gray");
        assert!(value.get("plain_text").is_none());
    }

    #[test]
    fn api_rich_text_deserializes_with_plain_text() {
        let raw = json!({
            "type": "mention",
            "mention": {"type": "user"},
            "annotations": {"bold": false, "italic": false, "strikethrough": false,
                            "underline": false, "code": false, "color": "default"},
            "plain_text": "@someone",
            "href": null
        });
        let rt: RichText = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(rt.content(), "@someone");
        assert!(rt.text.is_none());
    }

    #[test]
    fn visitor_reaches_nested_links_and_image_sources() {
        let mut blocks = vec![
            Block::bulleted(
                vec![RichText::plain("a").with_link("one")],
                vec![Block::numbered(
                    vec![RichText::plain("b").with_link("two")],
                    vec![],
                )],
            ),
            Block::image("three.png", vec![]),
            Block::callout(
                vec![RichText::plain("c")],
                Some(Icon::External {
                    external: ExternalFile {
                        url: "icon.png".to_string(),
                    },
                }),
            ),
        ];

        let mut seen = Vec::new();
        visit_links_mut(&mut blocks, &mut |link: &mut Link| {
            seen.push(link.url.clone());
            link.url = format!("x/{}", link.url);
        });

        assert_eq!(seen, vec!["one", "two", "three.png"]);
        let Block::Callout { callout } = &blocks[2] else {
            panic!("expected callout");
        };
        let Some(Icon::External { external }) = &callout.icon else {
            panic!("expected external icon");
        };
        assert_eq!(external.url, "icon.png", "icons are not links");
    }
}
