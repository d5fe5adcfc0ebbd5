use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

use crate::domain::ticket::TicketId;

const TICKET_PREFIX: &str = r"(?:#|(?:ticket|issue|bug)[: ]?)";

/// `<action> <ref>[ and|,|& <ref>]*`, e.g. `fixes #10 and ticket:12`.
static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    let reference = format!("{TICKET_PREFIX}[0-9]+");
    let pattern = format!(
        r"(?P<action>[A-Za-z]*).?(?P<ticket>{reference}(?:(?:[, &]*|[ ]?and[ ]?){reference})*)"
    );
    match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(&format!("{TICKET_PREFIX}([0-9]+)")) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Close,
    Reference,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Close => "close",
            Action::Reference => "reference",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "close" | "closed" | "closes" | "fix" | "fixed" | "fixes" => Some(Action::Close),
            "addresses" | "re" | "references" | "refs" | "ref" | "see" => Some(Action::Reference),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(keyword, reference group)` hit in a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatch<'a> {
    pub keyword: &'a str,
    pub references: &'a str,
}

impl CommandMatch<'_> {
    pub fn action(&self) -> Option<Action> {
        Action::from_keyword(self.keyword)
    }

    pub fn ticket_ids(&self) -> Vec<TicketId> {
        ticket_ids(self.references)
    }
}

pub struct CommandMatches<'a> {
    inner: CaptureMatches<'static, 'a>,
}

impl<'a> Iterator for CommandMatches<'a> {
    type Item = CommandMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.inner.next()?;
        let keyword = captures.name("action").map_or("", |m| m.as_str());
        let references = captures.name("ticket").map_or("", |m| m.as_str());
        Some(CommandMatch {
            keyword,
            references,
        })
    }
}

pub fn parse_commands(message: &str) -> CommandMatches<'_> {
    CommandMatches {
        inner: COMMAND_RE.captures_iter(message),
    }
}

pub fn ticket_ids(references: &str) -> Vec<TicketId> {
    TICKET_RE
        .captures_iter(references)
        .filter_map(|captures| {
            let digits = captures.get(1)?.as_str();
            match digits.parse::<TicketId>() {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::warn!("skipping ticket reference {digits}: {err}");
                    None
                }
            }
        })
        .collect()
}

/// Ticket id to the actions requested for it, in message order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPlan {
    tickets: BTreeMap<TicketId, Vec<Action>>,
}

impl CommandPlan {
    pub fn from_message(message: &str) -> Self {
        let mut plan = Self::default();
        for command in parse_commands(message) {
            let Some(action) = command.action() else {
                tracing::debug!(
                    "ignoring unsupported command '{}' for {}",
                    command.keyword,
                    command.references
                );
                continue;
            };
            tracing::debug!("command handler: {action} for {}", command.references);
            for id in command.ticket_ids() {
                plan.push(id, action);
            }
        }
        plan
    }

    pub fn push(&mut self, id: TicketId, action: Action) {
        self.tickets.entry(id).or_default().push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn actions(&self, id: TicketId) -> Option<&[Action]> {
        self.tickets.get(&id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TicketId, &[Action])> {
        self.tickets
            .iter()
            .map(|(id, actions)| (*id, actions.as_slice()))
    }
}

impl fmt::Display for CommandPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "no ticket commands found");
        }
        for (id, actions) in self.iter() {
            let names = actions
                .iter()
                .map(Action::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "#{id}: {names}")?;
        }
        Ok(())
    }
}
