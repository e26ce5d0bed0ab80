use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::{Error, Result};

/// Parses form markup into a [`Dom`]. Script and style bodies are kept as raw
/// text and never executed; the wizard's behaviour lives in Rust.
pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut cursor = Cursor { src: html, pos: 0 };
    let mut tree = TreeBuilder::new();

    while !cursor.at_end() {
        if cursor.eat("<!--") {
            cursor
                .skip_past("-->")
                .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
        } else if !cursor.at_markup() {
            let text = cursor.take_text();
            tree.text(decode_html_character_references(text));
        } else if cursor.eat("</") {
            let name = read_end_tag(&mut cursor)?;
            tree.close(&name);
        } else if cursor.eat("<!") {
            skip_declaration(&mut cursor)?;
        } else {
            cursor.eat("<");
            let tag = read_start_tag(&mut cursor)?;
            let raw = is_raw_text_tag(&tag.name) && !tag.self_closing;
            let is_textarea = tag.name == "textarea";
            let name = tag.name.clone();
            let node = tree.open(tag);
            if raw {
                let body = read_raw_text(&mut cursor, &name)?;
                if !body.is_empty() {
                    let body = if is_textarea {
                        strip_initial_newline(&decode_html_character_references(body))
                    } else {
                        body.to_string()
                    };
                    tree.dom.create_text(node, body);
                }
            }
        }
    }

    tree.finish()
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        self.pos += self.peek().map_or(0, char::len_utf8);
    }

    /// `<` followed by a letter, `/` or `!`. Any other `<` is text.
    fn at_markup(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<')
            && chars
                .next()
                .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '/' || ch == '!')
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|ch: char| !keep(ch)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_ws(&mut self) {
        self.take_while(|ch| ch.is_ascii_whitespace());
    }

    /// Consumes through `needle`, returning what preceded it.
    fn skip_past(&mut self, needle: &str) -> Option<&'a str> {
        let rest = self.rest();
        let idx = rest.find(needle)?;
        self.pos += idx + needle.len();
        Some(&rest[..idx])
    }

    /// Up to the next `<`, always taking at least one character.
    fn take_text(&mut self) -> &'a str {
        let rest = self.rest();
        let first = rest.chars().next().map_or(0, char::len_utf8);
        let len = rest[first..].find('<').map_or(rest.len(), |idx| idx + first);
        self.pos += len;
        &rest[..len]
    }

    /// Unquoted token ending at whitespace, `>` or `/>`.
    fn take_bare_token(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(idx, ch)| ch.is_ascii_whitespace() || *ch == '>' || rest[*idx..].starts_with("/>"))
            .map_or(rest.len(), |(idx, _)| idx);
        self.pos += end;
        &rest[..end]
    }
}

struct StartTag {
    name: String,
    attrs: HashMap<String, String>,
    self_closing: bool,
}

fn read_start_tag(cursor: &mut Cursor<'_>) -> Result<StartTag> {
    let name = cursor.take_while(is_tag_char).to_ascii_lowercase();
    if name.is_empty() {
        return Err(Error::HtmlParse("empty tag name".into()));
    }

    let mut attrs = HashMap::new();
    loop {
        cursor.skip_ws();
        if cursor.at_end() {
            return Err(Error::HtmlParse(format!("unclosed start tag <{name}>")));
        }
        let self_closing = cursor.eat("/>");
        if self_closing || cursor.eat(">") {
            return Ok(StartTag {
                name,
                attrs,
                self_closing,
            });
        }

        let attr_name = cursor.take_while(is_attr_name_char).to_ascii_lowercase();
        if attr_name.is_empty() {
            // Junk inside a tag is dropped up to the next boundary.
            cursor.take_bare_token();
            continue;
        }

        cursor.skip_ws();
        let value = if cursor.eat("=") {
            cursor.skip_ws();
            read_attr_value(cursor)?
        } else {
            String::new()
        };
        // Duplicate attributes keep the first value.
        attrs.entry(attr_name).or_insert(value);
    }
}

fn read_attr_value(cursor: &mut Cursor<'_>) -> Result<String> {
    let raw = match cursor.peek() {
        None => return Err(Error::HtmlParse("missing attribute value".into())),
        Some(quote @ ('"' | '\'')) => {
            cursor.bump();
            let closing = if quote == '"' { "\"" } else { "'" };
            cursor
                .skip_past(closing)
                .ok_or_else(|| Error::HtmlParse("unclosed quoted attribute value".into()))?
        }
        Some(_) => cursor.take_bare_token(),
    };
    Ok(decode_html_character_references(raw))
}

/// Reads the rest of `</name ...>` after the `</`.
fn read_end_tag(cursor: &mut Cursor<'_>) -> Result<String> {
    cursor.skip_ws();
    let name = cursor.take_while(is_tag_char).to_ascii_lowercase();
    cursor
        .skip_past(">")
        .ok_or_else(|| Error::HtmlParse("unclosed end tag".into()))?;
    Ok(name)
}

fn skip_declaration(cursor: &mut Cursor<'_>) -> Result<()> {
    let mut quote = None;
    while let Some(ch) = cursor.peek() {
        cursor.bump();
        match (quote, ch) {
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Ok(()),
            (None, _) => {}
        }
    }
    Err(Error::HtmlParse("unclosed declaration tag".into()))
}

/// Body of a raw-text element up to its (case-insensitive) end tag, which is
/// consumed too.
fn read_raw_text<'a>(cursor: &mut Cursor<'a>, tag: &str) -> Result<&'a str> {
    let rest = cursor.rest();
    let mut from = 0;
    while let Some(offset) = rest[from..].find("</") {
        let start = from + offset;
        let after = rest[start + 2..].trim_start();
        let closes = after
            .get(..tag.len())
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
            && !after[tag.len()..].starts_with(|ch: char| ch.is_ascii_alphanumeric());
        if closes {
            cursor.pos += start + 2;
            read_end_tag(cursor)?;
            return Ok(&rest[..start]);
        }
        from = start + 2;
    }
    Err(Error::HtmlParse(format!("unclosed <{tag}>")))
}

struct TreeBuilder {
    dom: Dom,
    open: Vec<NodeId>,
    open_paragraphs: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        let dom = Dom::new();
        let open = vec![dom.root];
        Self {
            dom,
            open,
            open_paragraphs: 0,
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.dom.root)
    }

    fn open(&mut self, tag: StartTag) -> NodeId {
        self.close_implied(&tag.name);
        let keeps_open =
            !tag.self_closing && !is_void_tag(&tag.name) && !is_raw_text_tag(&tag.name);
        let parent = self.current();
        let node = self.dom.create_element(parent, tag.name, tag.attrs);
        if keeps_open {
            if self.dom.is_tag(node, "p") {
                self.open_paragraphs += 1;
            }
            self.open.push(node);
        }
        node
    }

    fn pop_to(&mut self, len: usize) {
        let popped = self.open.split_off(len);
        let paragraphs = popped
            .iter()
            .filter(|node| self.dom.is_tag(**node, "p"))
            .count();
        self.open_paragraphs -= paragraphs;
    }

    /// Stray end tags with no open counterpart are dropped.
    fn close(&mut self, name: &str) {
        if let Some(pos) = self
            .open
            .iter()
            .rposition(|node| self.dom.is_tag(*node, name))
            .filter(|pos| *pos > 0)
        {
            self.pop_to(pos);
        }
    }

    /// Ends an open `li`, `option` or `p` that `name` implicitly closes.
    fn close_implied(&mut self, name: &str) {
        let (target, boundaries): (&str, &[&str]) = match name {
            "li" => ("li", &["ol", "ul"]),
            "option" | "optgroup" => ("option", &["optgroup", "select"]),
            _ if closes_paragraph(name) => ("p", &[]),
            _ => return,
        };
        if target == "p" && self.open_paragraphs == 0 {
            return;
        }

        for index in (1..self.open.len()).rev() {
            let node = self.open[index];
            if self.dom.is_tag(node, target) {
                self.pop_to(index);
                return;
            }
            if boundaries.iter().any(|boundary| self.dom.is_tag(node, boundary)) {
                return;
            }
        }
    }

    fn text(&mut self, text: String) {
        if !text.is_empty() {
            let parent = self.current();
            self.dom.create_text(parent, text);
        }
    }

    fn finish(mut self) -> Result<Dom> {
        self.dom.initialize_form_control_values()?;
        Ok(self.dom)
    }
}

fn decode_html_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    fn decode_numeric(value: &str) -> Option<char> {
        let codepoint =
            if let Some(hex) = value.strip_prefix('x').or_else(|| value.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                value.parse::<u32>().ok()?
            };
        char::from_u32(codepoint)
    }

    fn decode_named(value: &str) -> Option<char> {
        match value {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            "copy" => Some('©'),
            "reg" => Some('®'),
            "euro" => Some('€'),
            "pound" => Some('£'),
            "hellip" => Some('…'),
            "middot" => Some('·'),
            "ndash" => Some('–'),
            "mdash" => Some('—'),
            "larr" => Some('←'),
            "rarr" => Some('→'),
            _ => None,
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let decoded = tail.find(';').and_then(|semicolon| {
            let raw = &tail[..semicolon];
            let ch = match raw.strip_prefix('#') {
                Some(numeric) => decode_numeric(numeric),
                None => decode_named(raw),
            }?;
            Some((ch, semicolon + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn closes_paragraph(tag: &str) -> bool {
    matches!(
        tag,
        "address" | "article" | "aside" | "blockquote" | "details" | "div" | "dl"
            | "fieldset" | "footer" | "form" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            | "header" | "hr" | "main" | "nav" | "ol" | "p" | "pre" | "section"
            | "table" | "ul"
    )
}

fn strip_initial_newline(text: &str) -> String {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
        .to_string()
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn is_attr_name_char(ch: char) -> bool {
    is_tag_char(ch) || ch == ':' || ch == '@'
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea")
}

fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}
