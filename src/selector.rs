//! The CSS selector subset the wizard's structural contract is written in:
//! type, `#id`, `.class`, `[attr]`, `[attr=value]`, a handful of state
//! pseudo-classes, `:not(...)`, descendant and child combinators, and
//! comma-separated groups.

use crate::dom::{Dom, Element, NodeId};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    Not(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<SelectorAttrCondition>,
    pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        if token == ">" {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(SelectorCombinator::Child);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

/// Walks `selector` outside of brackets, parentheses and quotes, calling
/// `on_char` for every top-level character. Returns false from `on_char` to
/// keep the character in the current buffer.
fn scan_top_level(
    selector: &str,
    mut on_char: impl FnMut(char, &mut String) -> Result<bool>,
) -> Result<String> {
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '\'' | '"' if bracket_depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                if paren_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                paren_depth -= 1;
                current.push(ch);
            }
            _ if bracket_depth == 0 && paren_depth == 0 => {
                if !on_char(ch, &mut current)? {
                    current.push(ch);
                }
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 || paren_depth != 0 || quote.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(current)
}

fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let rest = scan_top_level(selector, |ch, current| {
        if ch != ',' {
            return Ok(false);
        }
        let trimmed = current.trim();
        if trimmed.is_empty() {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        groups.push(trimmed.to_string());
        current.clear();
        Ok(true)
    })?;

    let trimmed = rest.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let rest = scan_top_level(selector, |ch, current| {
        if ch == '>' {
            if !current.trim().is_empty() {
                tokens.push(current.trim().to_string());
            }
            current.clear();
            tokens.push(ch.to_string());
            return Ok(true);
        }
        if ch.is_ascii_whitespace() {
            if !current.trim().is_empty() {
                tokens.push(current.trim().to_string());
            }
            current.clear();
            return Ok(true);
        }
        Ok(false)
    })?;

    if !rest.trim().is_empty() {
        tokens.push(rest.trim().to_string());
    }

    Ok(tokens)
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    let unsupported = || Error::UnsupportedSelector(part.into());
    if part.is_empty() {
        return Err(unsupported());
    }

    let mut step = SelectorStep::default();
    let mut pos = 0usize;
    while let Some(lead) = part[pos..].chars().next() {
        pos = match lead {
            '*' if !step.universal => {
                step.universal = true;
                pos + 1
            }
            '#' if step.id.is_none() => {
                let (id, next) = parse_selector_ident(part, pos + 1).ok_or_else(unsupported)?;
                step.id = Some(id);
                next
            }
            '.' => {
                let (class_name, next) =
                    parse_selector_ident(part, pos + 1).ok_or_else(unsupported)?;
                step.classes.push(class_name);
                next
            }
            '[' => {
                let close = find_attr_close(part, pos).ok_or_else(unsupported)?;
                step.attrs
                    .push(parse_attr_body(&part[pos + 1..close]).ok_or_else(unsupported)?);
                close + 1
            }
            ':' => {
                let (pseudo, next) = parse_selector_pseudo(part, pos)?.ok_or_else(unsupported)?;
                step.pseudo_classes.push(pseudo);
                next
            }
            _ if pos == 0 => {
                let (tag, next) = parse_selector_ident(part, pos).ok_or_else(unsupported)?;
                step.tag = Some(tag.to_ascii_lowercase());
                next
            }
            _ => return Err(unsupported()),
        };
    }

    Ok(step)
}

fn parse_selector_pseudo(part: &str, colon: usize) -> Result<Option<(SelectorPseudoClass, usize)>> {
    let Some((name, after_name)) = parse_selector_ident(part, colon + 1) else {
        return Ok(None);
    };

    let pseudo = match name.as_str() {
        "not" => {
            if !part[after_name..].starts_with('(') {
                return Ok(None);
            }
            let Some(close) = find_matching_paren(part, after_name) else {
                return Ok(None);
            };
            let groups = parse_selector_groups(&part[after_name + 1..close])?;
            return Ok(Some((SelectorPseudoClass::Not(groups), close + 1)));
        }
        "first-child" => SelectorPseudoClass::FirstChild,
        "last-child" => SelectorPseudoClass::LastChild,
        "checked" => SelectorPseudoClass::Checked,
        "disabled" => SelectorPseudoClass::Disabled,
        "enabled" => SelectorPseudoClass::Enabled,
        "required" => SelectorPseudoClass::Required,
        "optional" => SelectorPseudoClass::Optional,
        _ => return Ok(None),
    };
    Ok(Some((pseudo, after_name)))
}

fn find_matching_paren(src: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in src[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Identifier starting at `start`: the identifier and the offset just past it.
fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let rest = src.get(start..)?;
    let len = rest
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
        .unwrap_or(rest.len());
    (len > 0).then(|| (rest[..len].to_string(), start + len))
}

/// Offset of the `]` closing the attribute condition opened at `open`,
/// skipping quoted values.
fn find_attr_close(src: &str, open: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, ch) in src[open + 1..].char_indices() {
        match (quote, ch) {
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, ']') => return Some(open + 1 + offset),
            (None, _) => {}
        }
    }
    None
}

fn parse_attr_body(body: &str) -> Option<SelectorAttrCondition> {
    let body = body.trim();
    let Some((key, value)) = body.split_once('=') else {
        return (!body.is_empty()).then(|| SelectorAttrCondition::Exists {
            key: body.to_ascii_lowercase(),
        });
    };

    let key = key.trim().to_ascii_lowercase();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let unquoted = ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
        .unwrap_or(value);
    Some(SelectorAttrCondition::Eq {
        key,
        value: unquoted.to_string(),
    })
}

impl Dom {
    /// Whether `node_id` matches the compound chain, checked right to left.
    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, chain: &[SelectorPart]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }

        match last.combinator.unwrap_or(SelectorCombinator::Descendant) {
            SelectorCombinator::Child => self
                .parent(node_id)
                .is_some_and(|parent| self.matches_selector_chain(parent, rest)),
            SelectorCombinator::Descendant => {
                let mut cursor = self.parent(node_id);
                while let Some(ancestor) = cursor {
                    if self.matches_selector_chain(ancestor, rest) {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
        }
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        let tag_ok = step
            .tag
            .as_ref()
            .is_none_or(|tag| element.tag_name.eq_ignore_ascii_case(tag));
        let id_ok = step
            .id
            .as_ref()
            .is_none_or(|id| element.attrs.get("id") == Some(id));
        let classes_ok = step.classes.iter().all(|class_name| element.has_class(class_name));
        let attrs_ok = step.attrs.iter().all(|cond| match cond {
            SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
            SelectorAttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
        });

        tag_ok
            && id_ok
            && classes_ok
            && attrs_ok
            && step
                .pseudo_classes
                .iter()
                .all(|pseudo| self.matches_pseudo(node_id, element, pseudo))
    }

    fn matches_pseudo(&self, node_id: NodeId, element: &Element, pseudo: &SelectorPseudoClass) -> bool {
        match pseudo {
            SelectorPseudoClass::FirstChild => self.element_siblings(node_id).first() == Some(&node_id),
            SelectorPseudoClass::LastChild => self.element_siblings(node_id).last() == Some(&node_id),
            SelectorPseudoClass::Checked => element.checked,
            SelectorPseudoClass::Disabled => element.disabled,
            SelectorPseudoClass::Enabled => !element.disabled,
            SelectorPseudoClass::Required => element.required,
            SelectorPseudoClass::Optional => !element.required,
            SelectorPseudoClass::Not(groups) => !groups
                .iter()
                .any(|chain| self.matches_selector_chain(node_id, chain)),
        }
    }

    fn element_siblings(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(node_id) else {
            return vec![node_id];
        };
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }
}
