use crate::dom::{Dom, NodeId};

pub(crate) fn is_form_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    element.tag_name.eq_ignore_ascii_case("input")
        || element.tag_name.eq_ignore_ascii_case("select")
        || element.tag_name.eq_ignore_ascii_case("textarea")
        || element.tag_name.eq_ignore_ascii_case("button")
}

/// Lowercased `type` of an `<input>`, defaulting to `text`. `None` for
/// anything that is not an input.
pub(crate) fn input_type(dom: &Dom, node_id: NodeId) -> Option<String> {
    let element = dom.element(node_id)?;
    if !element.tag_name.eq_ignore_ascii_case("input") {
        return None;
    }
    Some(
        element
            .attrs
            .get("type")
            .map(|kind| kind.to_ascii_lowercase())
            .filter(|kind| !kind.is_empty())
            .unwrap_or_else(|| "text".to_string()),
    )
}

pub(crate) fn is_checkbox_input(dom: &Dom, node_id: NodeId) -> bool {
    input_type(dom, node_id).as_deref() == Some("checkbox")
}

pub(crate) fn is_radio_input(dom: &Dom, node_id: NodeId) -> bool {
    input_type(dom, node_id).as_deref() == Some("radio")
}

pub(crate) fn is_text_entry_control(dom: &Dom, node_id: NodeId) -> bool {
    if dom.is_tag(node_id, "textarea") {
        return true;
    }
    match input_type(dom, node_id) {
        Some(kind) => !matches!(
            kind.as_str(),
            "checkbox" | "radio" | "button" | "submit" | "reset" | "image" | "file"
        ),
        None => false,
    }
}

pub(crate) fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    if element.tag_name.eq_ignore_ascii_case("button") {
        return element
            .attrs
            .get("type")
            .map(|kind| kind.eq_ignore_ascii_case("submit"))
            .unwrap_or(true);
    }

    if element.tag_name.eq_ignore_ascii_case("input") {
        return element
            .attrs
            .get("type")
            .map(|kind| kind.eq_ignore_ascii_case("submit") || kind.eq_ignore_ascii_case("image"))
            .unwrap_or(false);
    }

    false
}

/// Elements a `<label>` can activate. Hidden inputs are excluded.
pub(crate) fn is_labelable_control(dom: &Dom, node_id: NodeId) -> bool {
    if let Some(kind) = input_type(dom, node_id) {
        return kind != "hidden";
    }
    dom.is_tag(node_id, "button") || dom.is_tag(node_id, "select") || dom.is_tag(node_id, "textarea")
}

/// Controls whose values a form submission carries. Unchecked checkboxes and
/// radios, unnamed or disabled controls and buttons are skipped.
pub(crate) fn is_successful_control(dom: &Dom, node_id: NodeId) -> bool {
    if dom.disabled(node_id) || dom.is_tag(node_id, "button") {
        return false;
    }
    if dom.attr(node_id, "name").unwrap_or_default().is_empty() {
        return false;
    }

    match input_type(dom, node_id).as_deref() {
        Some("button" | "submit" | "reset" | "file" | "image") => false,
        Some("checkbox" | "radio") => dom.checked(node_id).unwrap_or(false),
        _ => true,
    }
}
