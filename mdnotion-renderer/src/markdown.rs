//! Markdown to Notion blocks, driven by pulldown-cmark events.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use mdnotion_core::blocks::{Annotations, Block, RichText, MAX_TEXT_LEN};

/// Deepest child level a single append request may carry.
const MAX_NESTING: usize = 2;

pub const PLAIN_TEXT: &str = "plain text";

/// Languages accepted by Notion code blocks.
const NOTION_LANGUAGES: &[&str] = &[
    "abap", "arduino", "bash", "basic", "c", "clojure", "coffeescript", "c++", "c#", "css",
    "dart", "diff", "docker", "elixir", "elm", "erlang", "flow", "fortran", "f#", "gherkin",
    "glsl", "go", "graphql", "groovy", "haskell", "html", "java", "javascript", "json", "julia",
    "kotlin", "latex", "less", "lisp", "livescript", "lua", "makefile", "markdown", "markup",
    "matlab", "mermaid", "nix", "objective-c", "ocaml", "pascal", "perl", "php", "plain text",
    "powershell", "prolog", "protobuf", "python", "r", "reason", "ruby", "rust", "sass",
    "scala", "scheme", "scss", "shell", "sql", "swift", "typescript", "vb.net", "verilog",
    "vhdl", "visual basic", "webassembly", "xml", "yaml",
];

const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("sh", "shell"),
    ("zsh", "shell"),
    ("console", "shell"),
    ("shell-session", "shell"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("yml", "yaml"),
    ("cpp", "c++"),
    ("cxx", "c++"),
    ("cs", "c#"),
    ("csharp", "c#"),
    ("fsharp", "f#"),
    ("dockerfile", "docker"),
    ("md", "markdown"),
    ("kt", "kotlin"),
    ("golang", "go"),
    ("proto", "protobuf"),
    ("objc", "objective-c"),
    ("ps1", "powershell"),
    ("pwsh", "powershell"),
    ("make", "makefile"),
    ("hs", "haskell"),
    ("ex", "elixir"),
    ("exs", "elixir"),
    ("tex", "latex"),
    ("wasm", "webassembly"),
    ("vb", "visual basic"),
    ("text", PLAIN_TEXT),
    ("txt", PLAIN_TEXT),
    ("plaintext", PLAIN_TEXT),
];

/// Map a fenced code info string to a Notion language name.
///
/// Only the first word counts (`rust,ignore` and `py title="x"` both work);
/// anything unknown becomes `plain text`.
pub fn notion_language(info: &str) -> String {
    let lang = info
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    if let Some((_, mapped)) = LANGUAGE_ALIASES.iter().find(|(alias, _)| *alias == lang) {
        return (*mapped).to_string();
    }
    if NOTION_LANGUAGES.contains(&lang.as_str()) {
        return lang;
    }
    PLAIN_TEXT.to_string()
}

/// Convert a Markdown document into Notion blocks.
///
/// Images become standalone image blocks placed after the block that
/// contained them. Raw HTML is dropped.
pub fn to_blocks(markdown: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.process_event(event);
    }
    limit_nesting(builder.finish(), 0)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Style {
    bold: u32,
    italic: u32,
    strikethrough: u32,
}

impl Style {
    fn annotations(&self, code: bool) -> Annotations {
        Annotations {
            bold: self.bold > 0,
            italic: self.italic > 0,
            strikethrough: self.strikethrough > 0,
            code,
            ..Annotations::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FrameKind {
    Bulleted,
    Numbered,
    Quote,
}

/// An open container block (list item or quote).
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    checked: Option<bool>,
    /// First paragraph of the container, shown as its own text.
    text: Option<Vec<RichText>>,
    children: Vec<Block>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            checked: None,
            text: None,
            children: Vec::new(),
        }
    }

    fn into_block(self) -> Block {
        let text = self.text.unwrap_or_default();
        match (self.kind, self.checked) {
            (FrameKind::Quote, _) => Block::quote(text, self.children),
            (_, Some(checked)) => Block::to_do(text, checked, self.children),
            (FrameKind::Numbered, None) => Block::numbered(text, self.children),
            (FrameKind::Bulleted, None) => Block::bulleted(text, self.children),
        }
    }
}

#[derive(Debug)]
struct PendingImage {
    url: String,
    alt: String,
}

#[derive(Debug)]
struct PendingCode {
    language: String,
    text: String,
}

#[derive(Debug, Default)]
struct BlockBuilder {
    out: Vec<Block>,
    frames: Vec<Frame>,
    /// Open lists, innermost last; `true` when ordered.
    lists: Vec<bool>,
    inline: Vec<RichText>,
    /// Image blocks waiting for their enclosing block to be emitted.
    deferred: Vec<Block>,
    style: Style,
    links: Vec<String>,
    image: Option<PendingImage>,
    code: Option<PendingCode>,
    heading: Option<u8>,
    row: Option<Vec<Vec<RichText>>>,
}

impl BlockBuilder {
    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.text("\n"),
            Event::Rule => {
                self.flush_inline();
                self.emit(Block::divider());
            }
            Event::TaskListMarker(checked) => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.checked = Some(checked);
                }
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.flush_inline(),
            Tag::Heading { level, .. } => {
                self.flush_inline();
                self.heading = Some(level as u8);
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.frames.push(Frame::new(FrameKind::Quote));
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => notion_language(&info),
                    CodeBlockKind::Indented => PLAIN_TEXT.to_string(),
                };
                self.code = Some(PendingCode {
                    language,
                    text: String::new(),
                });
            }
            Tag::List(start) => {
                self.flush_inline();
                self.lists.push(start.is_some());
            }
            Tag::Item => {
                self.flush_inline();
                let kind = if self.lists.last().copied().unwrap_or(false) {
                    FrameKind::Numbered
                } else {
                    FrameKind::Bulleted
                };
                self.frames.push(Frame::new(kind));
            }
            Tag::Table(_) => self.flush_inline(),
            Tag::TableHead | Tag::TableRow => self.row = Some(Vec::new()),
            Tag::Emphasis => self.style.italic += 1,
            Tag::Strong => self.style.bold += 1,
            Tag::Strikethrough => self.style.strikethrough += 1,
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            Tag::Image { dest_url, .. } => {
                self.image = Some(PendingImage {
                    url: dest_url.to_string(),
                    alt: String::new(),
                })
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush_inline(),
            TagEnd::Heading(_) => {
                let level = self.heading.take().unwrap_or(1);
                let rich_text = self.take_inline();
                self.emit(Block::heading(level, rich_text));
                self.emit_deferred();
            }
            TagEnd::BlockQuote { .. } | TagEnd::Item => {
                self.flush_inline();
                if let Some(frame) = self.frames.pop() {
                    self.emit(frame.into_block());
                }
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    let text = code.text.strip_suffix('\n').unwrap_or(&code.text);
                    let rich_text = split_long(vec![RichText::plain(text)]);
                    self.emit(Block::code(rich_text, code.language));
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::TableCell => {
                let cell = self.take_inline();
                if let Some(row) = self.row.as_mut() {
                    row.push(cell);
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                if let Some(row) = self.row.take() {
                    self.emit(Block::paragraph(split_long(join_cells(row))));
                    self.emit_deferred();
                }
            }
            TagEnd::Emphasis => self.style.italic = self.style.italic.saturating_sub(1),
            TagEnd::Strong => self.style.bold = self.style.bold.saturating_sub(1),
            TagEnd::Strikethrough => {
                self.style.strikethrough = self.style.strikethrough.saturating_sub(1)
            }
            TagEnd::Link => {
                self.links.pop();
            }
            TagEnd::Image => {
                if let Some(image) = self.image.take() {
                    let caption = if image.alt.is_empty() {
                        Vec::new()
                    } else {
                        vec![RichText::plain(image.alt)]
                    };
                    self.deferred.push(Block::image(image.url, caption));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(text);
        } else if let Some(image) = self.image.as_mut() {
            image.alt.push_str(text);
        } else {
            let annotations = self.style.annotations(false);
            self.push_segment(text, annotations);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push_str(code);
        } else {
            let annotations = self.style.annotations(true);
            self.push_segment(code, annotations);
        }
    }

    /// Append text to the inline buffer, merging with the previous segment
    /// when style and link match.
    fn push_segment(&mut self, content: &str, annotations: Annotations) {
        let link = self.links.last().cloned();
        if let Some(last) = self.inline.last_mut() {
            let same_link = last.link().map(|l| l.url.as_str()) == link.as_deref();
            if last.annotations == annotations && same_link {
                if let Some(text) = last.text.as_mut() {
                    text.content.push_str(content);
                    return;
                }
            }
        }
        let mut segment = RichText::styled(content, annotations);
        if let Some(url) = link {
            segment = segment.with_link(url);
        }
        self.inline.push(segment);
    }

    fn take_inline(&mut self) -> Vec<RichText> {
        split_long(std::mem::take(&mut self.inline))
    }

    /// Turn buffered inline text into a block: the text of the open container
    /// if it has none yet, a paragraph otherwise.
    fn flush_inline(&mut self) {
        if !self.inline.is_empty() {
            let rich_text = self.take_inline();
            match self.frames.last_mut() {
                Some(frame) if frame.text.is_none() && frame.children.is_empty() => {
                    frame.text = Some(rich_text);
                }
                _ => self.emit(Block::paragraph(rich_text)),
            }
        }
        self.emit_deferred();
    }

    fn emit(&mut self, block: Block) {
        match self.frames.last_mut() {
            Some(frame) => frame.children.push(block),
            None => self.out.push(block),
        }
    }

    fn emit_deferred(&mut self) {
        for block in std::mem::take(&mut self.deferred) {
            self.emit(block);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_inline();
        while let Some(frame) = self.frames.pop() {
            self.emit(frame.into_block());
        }
        self.out
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn join_cells(row: Vec<Vec<RichText>>) -> Vec<RichText> {
    let mut out = Vec::new();
    for (i, cell) in row.into_iter().enumerate() {
        if i > 0 {
            out.push(RichText::plain(" | "));
        }
        out.extend(cell);
    }
    out
}

/// Drop empty segments and split any segment longer than [`MAX_TEXT_LEN`]
/// characters into consecutive segments with the same style.
pub fn split_long(segments: Vec<RichText>) -> Vec<RichText> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        let chars: Vec<char> = segment.content().chars().collect();
        if chars.is_empty() {
            continue;
        }
        if chars.len() <= MAX_TEXT_LEN {
            out.push(segment);
            continue;
        }
        for chunk in chars.chunks(MAX_TEXT_LEN) {
            let mut piece = segment.clone();
            if let Some(text) = piece.text.as_mut() {
                text.content = chunk.iter().collect();
            }
            out.push(piece);
        }
    }
    out
}

/// Hoist children below [`MAX_NESTING`] levels so they follow their parent
/// as siblings.
fn limit_nesting(blocks: Vec<Block>, depth: usize) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    for mut block in blocks {
        let children = block
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        if depth < MAX_NESTING {
            let nested = limit_nesting(children, depth + 1);
            if let Some(slot) = block.children_mut() {
                *slot = nested;
            }
            out.push(block);
        } else {
            out.push(block);
            out.extend(limit_nesting(children, depth));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
