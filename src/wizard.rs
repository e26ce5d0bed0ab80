use std::collections::HashMap;

use crate::config::WizardConfig;
use crate::dom::{Dom, NodeId, truncate_chars};
use crate::events::{ElementRole, EventKind, EventState, HandlerTable, RoleBindings};
use crate::form_controls::{
    input_type, is_checkbox_input, is_form_control, is_labelable_control, is_radio_input,
    is_submit_control, is_successful_control, is_text_entry_control,
};
use crate::html::parse_html;
use crate::state::WizardState;
use crate::submission::{LogSink, SubmissionPayload, SubmissionSink};
use crate::trace::TraceState;
use crate::{Error, Result};

const REQUIRED_FIELDS: &str = "input[required], select[required], textarea[required]";
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 8 * 1024 * 1024;

/// The multi-step quote form, bound to its document.
///
/// Construction parses the markup, resolves every element of the structural
/// contract once, renders the first step and highlights radio cards whose
/// input is already checked. After that the wizard only changes in response
/// to the user actions below, each of which runs to completion before
/// returning.
pub struct QuoteWizard {
    dom: Dom,
    config: WizardConfig,
    state: WizardState,
    steps: Vec<NodeId>,
    progress: Option<NodeId>,
    business_section: Option<NodeId>,
    residential_section: Option<NodeId>,
    cards: Vec<NodeId>,
    card_inputs: HashMap<NodeId, NodeId>,
    bindings: RoleBindings,
    handlers: HandlerTable,
    sink: Box<dyn SubmissionSink>,
    submissions: Vec<SubmissionPayload>,
    acknowledgments: Vec<String>,
    trace: TraceState,
}

impl QuoteWizard {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, WizardConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: WizardConfig) -> Result<Self> {
        config.validate()?;
        let dom = parse_html(html)?;

        let steps = dom.query_selector_all(&config.step)?;
        let state = WizardState::new(steps.len())?;
        let progress = dom.query_selector(&config.progress)?;
        let business_section = dom.query_selector(&config.business_section)?;
        let residential_section = dom.query_selector(&config.residential_section)?;

        let mut bindings = RoleBindings::default();
        if let Some(form) = dom.query_selector(&config.form)? {
            if !dom.is_tag(form, "form") {
                return Err(Error::TypeMismatch {
                    selector: config.form.clone(),
                    expected: "form".into(),
                    actual: dom.tag_name(form).unwrap_or_default().to_string(),
                });
            }
            bindings.bind(form, ElementRole::Form);
        }
        for trigger in dom.query_selector_all(&config.next)? {
            bindings.bind(trigger, ElementRole::NextTrigger);
        }
        for trigger in dom.query_selector_all(&config.prev)? {
            bindings.bind(trigger, ElementRole::PrevTrigger);
        }
        for choice in dom.elements_by_name(&config.interest_field) {
            if dom.is_tag(choice, "input") {
                bindings.bind(choice, ElementRole::InterestChoice);
            }
        }

        let cards = dom.query_selector_all(&config.radio_card)?;
        let mut card_inputs = HashMap::new();
        for card in &cards {
            let radio = dom
                .query_selector_all_from(*card, "input")?
                .into_iter()
                .find(|node| is_radio_input(&dom, *node));
            if let Some(radio) = radio {
                bindings.bind(radio, ElementRole::CardChoice);
                card_inputs.insert(radio, *card);
            }
        }

        let mut wizard = Self {
            dom,
            config,
            state,
            steps,
            progress,
            business_section,
            residential_section,
            cards,
            card_inputs,
            bindings,
            handlers: standard_handlers(),
            sink: Box::new(LogSink),
            submissions: Vec::new(),
            acknowledgments: Vec::new(),
            trace: TraceState::default(),
        };

        wizard.render()?;
        wizard.highlight_checked_cards()?;
        Ok(wizard)
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step()
    }

    pub fn step_count(&self) -> usize {
        self.state.step_count()
    }

    pub fn progress_percent(&self) -> f64 {
        self.state.progress_percent()
    }

    /// Inline width of the progress element, if the page has one.
    pub fn progress_width(&self) -> Option<String> {
        let progress = self.progress?;
        self.dom
            .style_get(progress, "width")
            .ok()
            .filter(|width| !width.is_empty())
    }

    /// Indices of steps not carrying the hidden class.
    pub fn visible_steps(&self) -> Vec<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| {
                !self
                    .dom
                    .class_contains(**step, &self.config.classes.hidden)
                    .unwrap_or(false)
            })
            .map(|(index, _)| index)
            .collect()
    }

    pub fn set_submission_sink(&mut self, sink: impl SubmissionSink + 'static) {
        self.sink = Box::new(sink);
    }

    pub fn take_submissions(&mut self) -> Vec<SubmissionPayload> {
        std::mem::take(&mut self.submissions)
    }

    /// Messages shown to the user after accepted submissions.
    pub fn take_acknowledgments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.acknowledgments)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.take()
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace.set_log_limit(max_entries)
    }

    /// Moves to the next step if the current one validates. Invalid fields are
    /// marked either way; returns whether the step changed.
    pub fn advance(&mut self) -> Result<bool> {
        let from = self.state.current_step();
        if !self.validate(from)? {
            self.trace.line(format!("[wizard] advance blocked step={from}"));
            return Ok(false);
        }
        let moved = self.state.step_forward();
        self.log_step_change("advance", from);
        self.render()?;
        Ok(moved)
    }

    /// Moves to the previous step without validating. Stays on the first step.
    pub fn retreat(&mut self) -> Result<bool> {
        let from = self.state.current_step();
        let moved = self.state.step_back();
        self.log_step_change("retreat", from);
        self.render()?;
        Ok(moved)
    }

    /// Shows the current step, hides the others and updates the progress bar.
    pub fn render(&mut self) -> Result<()> {
        let hidden = [self.config.classes.hidden.clone()];
        let enter = [self.config.classes.step_enter.clone()];
        let current = self.state.current_step();

        for index in 0..self.steps.len() {
            let step = self.steps[index];
            if index == current {
                self.dom.class_remove(step, &hidden)?;
                self.dom.class_add(step, &enter)?;
            } else {
                self.dom.class_add(step, &hidden)?;
                self.dom.class_remove(step, &enter)?;
            }
        }

        if let Some(progress) = self.progress {
            let width = format!("{}%", self.state.progress_percent());
            self.dom.style_set(progress, "width", &width)?;
        }
        Ok(())
    }

    /// Checks the required fields of one step and marks the failing ones.
    ///
    /// Text inputs, selects and textareas need a non-empty value, checkboxes
    /// must be checked, and a radio passes when any element in the document
    /// sharing its name is checked. Fields inside a hidden part of the step
    /// are skipped.
    pub fn validate(&mut self, step_index: usize) -> Result<bool> {
        self.state.check_index(step_index)?;
        let step = self.steps[step_index];
        let error_classes = self.config.classes.field_error.clone();

        let mut invalid = Vec::new();
        for field in self.dom.query_selector_all_from(step, REQUIRED_FIELDS)? {
            if self.is_hidden_within(field, step)? {
                continue;
            }
            if self.field_satisfied(field)? {
                self.dom.class_remove(field, &error_classes)?;
            } else {
                self.dom.class_add(field, &error_classes)?;
                invalid.push(self.node_label(field));
            }
        }

        self.trace.line(format!(
            "[validate] step={step_index} valid={} invalid=[{}]",
            invalid.is_empty(),
            invalid.join(",")
        ));
        Ok(invalid.is_empty())
    }

    fn field_satisfied(&self, field: NodeId) -> Result<bool> {
        match input_type(&self.dom, field).as_deref() {
            Some("checkbox") => self.dom.checked(field),
            Some("radio") => {
                let name = self.dom.attr(field, "name").unwrap_or_default();
                if name.is_empty() {
                    return self.dom.checked(field);
                }
                for member in self.dom.elements_by_name(&name) {
                    if self.dom.checked(member)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Ok(!self.dom.value(field)?.is_empty()),
        }
    }

    fn is_hidden_within(&self, node: NodeId, container: NodeId) -> Result<bool> {
        let mut cursor = self.dom.parent(node);
        while let Some(current) = cursor {
            if current == container {
                return Ok(false);
            }
            if self
                .dom
                .class_contains(current, &self.config.classes.hidden)?
            {
                return Ok(true);
            }
            cursor = self.dom.parent(current);
        }
        Ok(false)
    }

    fn toggle_conditional_sections(&mut self, choice: NodeId) -> Result<()> {
        if (is_radio_input(&self.dom, choice) || is_checkbox_input(&self.dom, choice))
            && !self.dom.checked(choice)?
        {
            return Ok(());
        }

        let business = self.dom.value(choice)? == self.config.business_value;
        let hidden = [self.config.classes.hidden.clone()];
        if let Some(section) = self.business_section {
            if business {
                self.dom.class_remove(section, &hidden)?;
            } else {
                self.dom.class_add(section, &hidden)?;
            }
        }
        if let Some(section) = self.residential_section {
            if business {
                self.dom.class_add(section, &hidden)?;
            } else {
                self.dom.class_remove(section, &hidden)?;
            }
        }
        Ok(())
    }

    fn highlight_card_group(&mut self, input: NodeId) -> Result<()> {
        let Some(card) = self.card_inputs.get(&input).copied() else {
            return Ok(());
        };

        let name = self.dom.attr(input, "name").unwrap_or_default();
        if !name.is_empty() {
            for member in self.dom.elements_by_name(&name) {
                if !self.dom.is_tag(member, "input") {
                    continue;
                }
                if let Some(member_card) = self.dom.closest(member, &self.config.radio_card)? {
                    self.reset_card(member_card)?;
                }
            }
        }

        if self.dom.checked(input)? {
            self.highlight_card(card)?;
        } else {
            self.reset_card(card)?;
        }
        Ok(())
    }

    fn highlight_checked_cards(&mut self) -> Result<()> {
        for radio in self.dom.query_selector_all(r#"input[type="radio"]:checked"#)? {
            if let Some(card) = self.dom.closest(radio, &self.config.radio_card)? {
                self.highlight_card(card)?;
            }
        }
        Ok(())
    }

    fn highlight_card(&mut self, card: NodeId) -> Result<()> {
        self.dom.class_add(card, &self.config.classes.card_selected)?;
        self.dom.class_remove(card, &self.config.classes.card_idle)
    }

    fn reset_card(&mut self, card: NodeId) -> Result<()> {
        self.dom.class_remove(card, &self.config.classes.card_selected)?;
        self.dom.class_add(card, &self.config.classes.card_idle)
    }

    fn handle_submit(&mut self, event: &mut EventState) -> Result<()> {
        event.default_prevented = true;
        let form = event.current_target;
        let step = self.state.current_step();
        if !self.validate(step)? {
            self.trace.line(format!("[submit] blocked step={step}"));
            return Ok(());
        }

        let payload = self.collect_payload(form)?;
        self.trace
            .line(format!("[submit] accepted fields={}", payload.len()));
        self.sink.deliver(&payload);
        self.submissions.push(payload);
        self.acknowledgments.push(self.config.acknowledgment.clone());

        self.reset_form(form)?;
        let from = self.state.current_step();
        self.state.reset();
        self.log_step_change("reset", from);
        self.render()?;

        for index in 0..self.cards.len() {
            self.reset_card(self.cards[index])?;
        }
        Ok(())
    }

    fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for child in &self.dom.nodes[form.0].children {
            self.dom.collect_elements_dfs(*child, &mut nodes);
        }
        nodes.retain(|node| is_form_control(&self.dom, *node));
        nodes
    }

    fn collect_payload(&self, form: NodeId) -> Result<SubmissionPayload> {
        let mut payload = SubmissionPayload::default();
        for control in self.form_controls(form) {
            if !is_successful_control(&self.dom, control) {
                continue;
            }
            let name = self.dom.attr(control, "name").unwrap_or_default();
            let mut value = self.dom.value(control)?;
            if value.is_empty()
                && (is_checkbox_input(&self.dom, control) || is_radio_input(&self.dom, control))
            {
                value = "on".into();
            }
            payload.insert(name, value);
        }
        Ok(payload)
    }

    /// Restores every control of `form` to its markup default.
    fn reset_form(&mut self, form: NodeId) -> Result<()> {
        for control in self.form_controls(form) {
            if is_checkbox_input(&self.dom, control) || is_radio_input(&self.dom, control) {
                let default_checked = self.dom.attr(control, "checked").is_some();
                self.dom.set_checked(control, default_checked)?;
                continue;
            }

            if self.dom.is_tag(control, "select") {
                self.dom.sync_select_value(control)?;
                continue;
            }

            let default_value = if self.dom.is_tag(control, "textarea") {
                self.dom.text_content(control)
            } else {
                self.dom.attr(control, "value").unwrap_or_default()
            };
            self.dom.set_value(control, &default_value)?;
        }
        Ok(())
    }

    fn log_step_change(&mut self, action: &str, from: usize) {
        let to = self.state.current_step();
        log::debug!(target: "quote_wizard", "{action}: step {from} -> {to}");
        self.trace
            .line(format!("[wizard] {action} step {from} -> {to}"));
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.click_node(target))
    }

    fn click_node(&mut self, target: NodeId) -> Result<()> {
        let outcome = self.dispatch_event(target, EventKind::Click)?;
        if outcome.default_prevented {
            return Ok(());
        }

        if let Some(control) = self.labelled_control(target)? {
            if control != target && !self.dom.disabled(control) {
                return self.click_node(control);
            }
        }

        if is_checkbox_input(&self.dom, target) {
            let current = self.dom.checked(target)?;
            self.dom.set_checked(target, !current)?;
            self.dispatch_event(target, EventKind::Input)?;
            self.dispatch_event(target, EventKind::Change)?;
        }

        if is_radio_input(&self.dom, target) && !self.dom.checked(target)? {
            self.uncheck_other_radios_in_group(target)?;
            self.dom.set_checked(target, true)?;
            self.dispatch_event(target, EventKind::Input)?;
            self.dispatch_event(target, EventKind::Change)?;
        }

        if is_submit_control(&self.dom, target) {
            if let Some(form) = self.form_owner(target) {
                self.dispatch_event(form, EventKind::Submit)?;
            }
        }

        Ok(())
    }

    /// Control activated by clicking `target` inside a `<label>`: the `for`
    /// element, else the first labelable descendant. Clicks on a control
    /// itself activate nothing else.
    fn labelled_control(&self, target: NodeId) -> Result<Option<NodeId>> {
        if is_labelable_control(&self.dom, target) {
            return Ok(None);
        }
        let Some(label) = self.dom.closest(target, "label")? else {
            return Ok(None);
        };

        if let Some(control) = self
            .dom
            .attr(label, "for")
            .and_then(|id| self.dom.by_id(&id))
            .filter(|control| is_labelable_control(&self.dom, *control))
        {
            return Ok(Some(control));
        }
        Ok(self
            .dom
            .query_selector_all_from(label, "*")?
            .into_iter()
            .find(|candidate| is_labelable_control(&self.dom, *candidate)))
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !is_text_entry_control(&self.dom, target) {
            return Err(self.type_mismatch(selector, target, "text input or textarea"));
        }
        if self.dom.disabled(target) || self.dom.readonly(target) {
            return Ok(());
        }

        self.dom.set_value(target, text)?;
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.dispatch_event(target, EventKind::Input).map(|_| ())
        })
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let is_radio = is_radio_input(&self.dom, target);
        if !is_radio && !is_checkbox_input(&self.dom, target) {
            return Err(self.type_mismatch(selector, target, "input[type=checkbox|radio]"));
        }
        if self.dom.disabled(target) {
            return Ok(());
        }

        if self.dom.checked(target)? == checked {
            return Ok(());
        }
        if is_radio && checked {
            self.uncheck_other_radios_in_group(target)?;
        }
        self.dom.set_checked(target, checked)?;
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.dispatch_event(target, EventKind::Input)?;
            self.dispatch_event(target, EventKind::Change).map(|_| ())
        })
    }

    /// Picks the option whose value is `value`; an unknown value leaves the
    /// select empty.
    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.is_tag(target, "select") {
            return Err(self.type_mismatch(selector, target, "select"));
        }
        if self.dom.disabled(target) {
            return Ok(());
        }

        self.dom.set_select_value(target, value)?;
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.dispatch_event(target, EventKind::Input)?;
            self.dispatch_event(target, EventKind::Change).map(|_| ())
        })
    }

    /// Submits the form `selector` points at, or the form that owns it.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = if self.dom.is_tag(target, "form") {
            Some(target)
        } else {
            self.form_owner(target)
        };

        if let Some(form) = form {
            stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
                self.dispatch_event(form, EventKind::Submit).map(|_| ())
            })?;
        }
        Ok(())
    }

    /// Fires `kind` at the element without any default action.
    pub fn dispatch(&mut self, selector: &str, kind: EventKind) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.dispatch_event(target, kind).map(|_| ())
        })
    }

    pub fn roles_of(&self, selector: &str) -> Result<Vec<ElementRole>> {
        let target = self.select_one(selector)?;
        Ok(self.bindings.roles(target).to_vec())
    }

    /// Runs the handlers bound along the path from `target` up to the document.
    fn dispatch_event(&mut self, target: NodeId, kind: EventKind) -> Result<EventState> {
        let mut event = EventState::new(kind, target);

        let mut cursor = Some(target);
        while let Some(node) = cursor {
            event.current_target = node;
            let roles = self.bindings.roles(node).to_vec();
            for role in roles {
                let Some(handler) = self.handlers.get(kind, role) else {
                    continue;
                };
                (handler.run)(self, &mut event)?;
                event.handled.push(handler.name);
            }
            cursor = self.dom.parent(node);
        }

        let line = format!(
            "[event] {} target={} handlers=[{}] default_prevented={}",
            event.kind,
            self.node_label(event.target),
            event.handled.join(","),
            event.default_prevented
        );
        self.trace.event_line(line);
        Ok(event)
    }

    fn uncheck_other_radios_in_group(&mut self, target: NodeId) -> Result<()> {
        let name = self.dom.attr(target, "name").unwrap_or_default();
        if name.is_empty() {
            return Ok(());
        }
        let owner = self.form_owner(target);

        for node in self.dom.elements_by_name(&name) {
            if node == target || !is_radio_input(&self.dom, node) {
                continue;
            }
            if self.form_owner(node) != owner {
                continue;
            }
            if self.dom.checked(node)? {
                self.dom.set_checked(node, false)?;
            }
        }
        Ok(())
    }

    fn form_owner(&self, node: NodeId) -> Option<NodeId> {
        self.dom.find_ancestor_by_tag(node, "form")
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn checked(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.checked(target)
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.class_contains(target, class_name)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_checked(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.checked(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_has_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        if actual != expected {
            let describe = |present: bool| {
                if present {
                    format!("class {class_name}")
                } else {
                    format!("no class {class_name}")
                }
            };
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: describe(expected),
                actual: describe(actual),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn type_mismatch(&self, selector: &str, target: NodeId, expected: &str) -> Error {
        let actual = match input_type(&self.dom, target) {
            Some(kind) => format!("input[type={kind}]"),
            None => self.dom.tag_name(target).unwrap_or_default().to_string(),
        };
        Error::TypeMismatch {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual,
        }
    }

    fn node_snippet(&self, node: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node), 200)
    }

    fn node_label(&self, node: NodeId) -> String {
        let tag = self.dom.tag_name(node).unwrap_or("#node");
        if let Some(id) = self.dom.attr(node, "id").filter(|id| !id.is_empty()) {
            return format!("{tag}#{id}");
        }
        if let Some(name) = self.dom.attr(node, "name").filter(|name| !name.is_empty()) {
            return format!("{tag}[name={name}]");
        }
        tag.to_string()
    }
}

fn standard_handlers() -> HandlerTable {
    let mut table = HandlerTable::default();
    table.register(
        EventKind::Click,
        ElementRole::NextTrigger,
        "advance",
        |wizard, _| wizard.advance().map(|_| ()),
    );
    table.register(
        EventKind::Click,
        ElementRole::PrevTrigger,
        "retreat",
        |wizard, _| wizard.retreat().map(|_| ()),
    );
    table.register(
        EventKind::Change,
        ElementRole::InterestChoice,
        "toggle_sections",
        |wizard, event| wizard.toggle_conditional_sections(event.current_target),
    );
    table.register(
        EventKind::Change,
        ElementRole::CardChoice,
        "highlight_card",
        |wizard, event| wizard.highlight_card_group(event.current_target),
    );
    table.register(
        EventKind::Submit,
        ElementRole::Form,
        "submit_quote",
        |wizard, event| wizard.handle_submit(event),
    );
    table
}
