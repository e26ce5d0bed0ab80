//! UI-event plumbing: which part each element plays in the form, and which
//! handler runs for an (event, role) pair.

use std::collections::HashMap;
use std::fmt;

use crate::Result;
use crate::dom::NodeId;
use crate::wizard::QuoteWizard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
    Change,
    Submit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::Change => "change",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part an element plays in the quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    NextTrigger,
    PrevTrigger,
    InterestChoice,
    CardChoice,
    Form,
}

#[derive(Debug)]
pub(crate) struct EventState {
    pub(crate) kind: EventKind,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
    pub(crate) handled: Vec<&'static str>,
}

impl EventState {
    pub(crate) fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
            handled: Vec::new(),
        }
    }
}

pub(crate) type Handler = fn(&mut QuoteWizard, &mut EventState) -> Result<()>;

#[derive(Clone, Copy)]
pub(crate) struct NamedHandler {
    pub(crate) name: &'static str,
    pub(crate) run: Handler,
}

/// Element → roles, fixed when the wizard binds to its document.
#[derive(Debug, Default)]
pub(crate) struct RoleBindings {
    roles: HashMap<NodeId, Vec<ElementRole>>,
}

impl RoleBindings {
    pub(crate) fn bind(&mut self, node: NodeId, role: ElementRole) {
        let roles = self.roles.entry(node).or_default();
        if !roles.contains(&role) {
            roles.push(role);
        }
    }

    pub(crate) fn roles(&self, node: NodeId) -> &[ElementRole] {
        self.roles.get(&node).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Default)]
pub(crate) struct HandlerTable {
    handlers: HashMap<(EventKind, ElementRole), NamedHandler>,
}

impl HandlerTable {
    pub(crate) fn register(
        &mut self,
        kind: EventKind,
        role: ElementRole,
        name: &'static str,
        run: Handler,
    ) {
        self.handlers.insert((kind, role), NamedHandler { name, run });
    }

    pub(crate) fn get(&self, kind: EventKind, role: ElementRole) -> Option<NamedHandler> {
        self.handlers.get(&(kind, role)).copied()
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self
            .handlers
            .iter()
            .map(|((kind, role), handler)| format!("{kind}/{role:?}={}", handler.name))
            .collect::<Vec<_>>();
        names.sort();
        f.debug_struct("HandlerTable").field("handlers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_keep_roles_unique_and_ordered() {
        let mut bindings = RoleBindings::default();
        bindings.bind(NodeId(4), ElementRole::InterestChoice);
        bindings.bind(NodeId(4), ElementRole::CardChoice);
        bindings.bind(NodeId(4), ElementRole::InterestChoice);
        bindings.bind(NodeId(2), ElementRole::CardChoice);

        assert_eq!(
            bindings.roles(NodeId(4)),
            &[ElementRole::InterestChoice, ElementRole::CardChoice]
        );
        assert!(bindings.roles(NodeId(9)).is_empty());
        assert_eq!(bindings.roles(NodeId(2)), &[ElementRole::CardChoice]);
    }

    #[test]
    fn table_resolves_by_event_and_role() {
        fn noop(_: &mut QuoteWizard, _: &mut EventState) -> Result<()> {
            Ok(())
        }

        let mut table = HandlerTable::default();
        table.register(EventKind::Click, ElementRole::NextTrigger, "advance", noop);

        let handler = table
            .get(EventKind::Click, ElementRole::NextTrigger)
            .expect("registered handler");
        assert_eq!(handler.name, "advance");
        assert!(table.get(EventKind::Change, ElementRole::NextTrigger).is_none());
        assert!(format!("{table:?}").contains("click/NextTrigger=advance"));
    }
}
