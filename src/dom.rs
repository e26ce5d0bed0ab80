use std::collections::HashMap;

use crate::selector::{SelectorPart, parse_selector_groups};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

/// An element plus the live state of the form control it may be. `value` and
/// `checked` start from the markup and then follow user actions; the `value`
/// and `checked` attributes keep the defaults a form reset restores.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
    pub(crate) required: bool,
}

impl Element {
    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.class_list().any(|token| token == class_name)
    }

    fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_whitespace()
    }
}

/// Arena-backed document tree. Node ids are stable for the lifetime of the
/// document; nothing is ever removed from the arena.
#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                node_type: NodeType::Document,
            }],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn push_node(&mut self, parent: NodeId, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            node_type,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let has = |name: &str| attrs.contains_key(name);
        let element = Element {
            value: attrs.get("value").cloned().unwrap_or_default(),
            checked: has("checked"),
            disabled: has("disabled"),
            readonly: has("readonly"),
            required: has("required"),
            tag_name,
            attrs,
        };
        let id_attr = element.attrs.get("id").cloned();
        let id = self.push_node(parent, NodeType::Element(element));
        if let Some(id_attr) = id_attr {
            // First occurrence wins, matching getElementById.
            self.id_index.entry(id_attr).or_insert(id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.push_node(parent, NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn expect_element(&self, node_id: NodeId, role: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::DomOperation(format!("{role} target is not an element")))
    }

    fn expect_element_mut(&mut self, node_id: NodeId, role: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::DomOperation(format!("{role} target is not an element")))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|element| element.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        let mut pending = vec![node_id];
        while let Some(current) = pending.pop() {
            let node = &self.nodes[current.0];
            if let NodeType::Text(text) = &node.node_type {
                out.push_str(text);
            }
            pending.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        Ok(self.expect_element(node_id, "value")?.value.clone())
    }

    /// Sets a control's current value. Selects pick the matching option.
    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.is_tag(node_id, "select") {
            return self.set_select_value(node_id, value);
        }
        self.expect_element_mut(node_id, "value")?.value = value.to_string();
        Ok(())
    }

    /// Seeds textarea and select values from their markup once parsing is done.
    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            if self.is_tag(node, "textarea") {
                let text = self.text_content(node);
                self.expect_element_mut(node, "textarea")?.value = text;
            } else if self.is_tag(node, "select") {
                self.sync_select_value(node)?;
            }
        }
        Ok(())
    }

    pub(crate) fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        if !self.is_tag(select_node, "select") {
            return Err(Error::DomOperation(
                "set value target is not a select".into(),
            ));
        }

        let chosen = self
            .select_options(select_node)
            .into_iter()
            .find(|option| self.option_value(*option) == requested);
        self.mark_selected(select_node, chosen)
    }

    /// Restores the select value from the markup `selected` attributes, falling
    /// back to the first option.
    pub(crate) fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let options = self.select_options(select_node);
        let chosen = options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied());
        self.mark_selected(select_node, chosen)
    }

    /// Option selectedness lives in `checked`, so the `selected` attribute
    /// stays the markup default.
    fn mark_selected(&mut self, select_node: NodeId, chosen: Option<NodeId>) -> Result<()> {
        for option in self.select_options(select_node) {
            self.expect_element_mut(option, "option")?.checked = Some(option) == chosen;
        }
        let value = chosen
            .map(|option| self.option_value(option))
            .unwrap_or_default();
        self.expect_element_mut(select_node, "select")?.value = value;
        Ok(())
    }

    fn select_options(&self, select_node: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        for child in &self.nodes[select_node.0].children {
            self.collect_elements_dfs(*child, &mut descendants);
        }
        descendants.retain(|node| self.is_tag(*node, "option"));
        descendants
    }

    fn option_value(&self, option_node: NodeId) -> String {
        self.attr(option_node, "value")
            .unwrap_or_else(|| self.text_content(option_node).trim().to_string())
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.expect_element(node_id, "checked")?.checked)
    }

    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        self.expect_element_mut(node_id, "checked")?.checked = checked;
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.disabled)
    }

    pub(crate) fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.readonly)
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)?.attrs.get(name).cloned()
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Value of one inline style property, empty when unset.
    pub(crate) fn style_get(&self, node_id: NodeId, name: &str) -> Result<String> {
        let element = self.expect_element(node_id, "style")?;
        Ok(StyleDeclarations::parse(element.attrs.get("style"))
            .get(name)
            .unwrap_or_default()
            .to_string())
    }

    /// Sets one inline style property; an empty value removes it.
    pub(crate) fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id, "style")?;
        let mut decls = StyleDeclarations::parse(element.attrs.get("style"));
        decls.set(name, value);
        match decls.serialize() {
            Some(style) => element.attrs.insert("style".to_string(), style),
            None => element.attrs.remove("style"),
        };
        Ok(())
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        Ok(self.expect_element(node_id, "classList")?.has_class(class_name))
    }

    /// `classList.add(...)` with any number of tokens.
    pub(crate) fn class_add(&mut self, node_id: NodeId, class_names: &[String]) -> Result<()> {
        self.edit_classes(node_id, |tokens| {
            for class_name in class_names {
                if !tokens.contains(class_name) {
                    tokens.push(class_name.clone());
                }
            }
        })
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_names: &[String]) -> Result<()> {
        self.edit_classes(node_id, |tokens| {
            tokens.retain(|token| !class_names.contains(token));
        })
    }

    fn edit_classes(&mut self, node_id: NodeId, edit: impl FnOnce(&mut Vec<String>)) -> Result<()> {
        let element = self.expect_element_mut(node_id, "classList")?;
        let mut tokens = element.class_list().map(str::to_string).collect::<Vec<_>>();
        edit(&mut tokens);
        if tokens.is_empty() {
            element.attrs.remove("class");
        } else {
            element.attrs.insert("class".to_string(), tokens.join(" "));
        }
        Ok(())
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        if let [group] = groups.as_slice() {
            if let [part] = group.as_slice() {
                if let Some(id) = part.step.id_only() {
                    return Ok(self.by_id(id).into_iter().collect());
                }
            }
        }
        Ok(self.filter_matching(self.all_element_nodes(), &groups))
    }

    /// Descendants of `root` (not `root` itself) matching `selector`.
    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut candidates = Vec::new();
        for child in &self.nodes[root.0].children {
            self.collect_elements_dfs(*child, &mut candidates);
        }
        Ok(self.filter_matching(candidates, &groups))
    }

    fn filter_matching(&self, mut candidates: Vec<NodeId>, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        candidates.retain(|candidate| {
            groups
                .iter()
                .any(|chain| self.matches_selector_chain(*candidate, chain))
        });
        candidates
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }
        let groups = parse_selector_groups(selector)?;
        Ok(self.ancestors_inclusive(node_id).find(|candidate| {
            groups
                .iter()
                .any(|chain| self.matches_selector_chain(*candidate, chain))
        }))
    }

    fn ancestors_inclusive(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node_id), |node| self.parent(*node))
    }

    /// `document.getElementsByName`: every element whose `name` attribute matches.
    pub(crate) fn elements_by_name(&self, name: &str) -> Vec<NodeId> {
        let mut nodes = self.all_element_nodes();
        nodes.retain(|node| {
            self.element(*node)
                .and_then(|element| element.attrs.get("name"))
                .is_some_and(|candidate| candidate == name)
        });
        nodes
    }

    /// Elements under and including `node_id`, in document order.
    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        let mut pending = vec![node_id];
        while let Some(current) = pending.pop() {
            let node = &self.nodes[current.0];
            if let NodeType::Element(_) = node.node_type {
                out.push(current);
            }
            pending.extend(node.children.iter().rev().copied());
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        self.ancestors_inclusive(node_id)
            .skip(1)
            .find(|ancestor| self.is_tag(*ancestor, tag))
    }

    /// Serializes a subtree with attributes in sorted order, for diagnostics.
    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        enum Dump<'a> {
            Open(NodeId),
            Close(&'a str),
        }

        let mut out = String::new();
        let mut pending = vec![Dump::Open(node_id)];
        while let Some(entry) = pending.pop() {
            let current = match entry {
                Dump::Close(tag) => {
                    out.push_str(&format!("</{tag}>"));
                    continue;
                }
                Dump::Open(current) => current,
            };
            let node = &self.nodes[current.0];
            match &node.node_type {
                NodeType::Document => {}
                NodeType::Text(text) => out.push_str(text),
                NodeType::Element(element) => {
                    let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                    attrs.sort();
                    out.push('<');
                    out.push_str(&element.tag_name);
                    for (name, value) in attrs {
                        out.push_str(&format!(" {name}=\"{value}\""));
                    }
                    out.push('>');
                    pending.push(Dump::Close(element.tag_name.as_str()));
                }
            }
            pending.extend(node.children.iter().rev().map(|child| Dump::Open(*child)));
        }
        out
    }
}

/// Inline `style` declarations in source order, one entry per property.
struct StyleDeclarations(Vec<(String, String)>);

impl StyleDeclarations {
    fn parse(style_attr: Option<&String>) -> Self {
        let mut decls = Self(Vec::new());
        for decl in style_attr.map(String::as_str).unwrap_or_default().split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if !name.is_empty() {
                decls.set(&name.to_ascii_lowercase(), value.trim());
            }
        }
        decls
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value.as_str())
    }

    fn set(&mut self, name: &str, value: &str) {
        let existing = self.0.iter().position(|(prop, _)| prop == name);
        match (existing, value.is_empty()) {
            (Some(pos), true) => {
                self.0.remove(pos);
            }
            (Some(pos), false) => self.0[pos].1 = value.to_string(),
            (None, false) => self.0.push((name.to_string(), value.to_string())),
            (None, true) => {}
        }
    }

    fn serialize(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let parts = self
            .0
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>();
        Some(parts.join(" "))
    }
}

/// First `max_chars` characters of `value`, with `...` appended when cut.
pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let mut head = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_some() {
        head.push_str("...");
    }
    head
}
