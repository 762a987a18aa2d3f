//! Chat reply templates over a stored [`Document`].
//!
//! Rules are checked top to bottom; the first rule with a trigger word in the message decides
//! the reply. A rule that has nothing to say (no links on the page) yields the default excerpt
//! reply, later rules are not consulted.

use crate::relevance::find_relevant;
use crate::textprep::prefix_chars;
use pagechat_core::Document;

/// Reply when the caller asks about a URL that was never scraped (or was cleared).
pub const NO_DOCUMENT_REPLY: &str = "Please scrape a website first by entering a URL above. \
Once I have the content, I can answer your questions about it!";

/// Links listed by the links rule.
pub const REPLY_LINKS: usize = 5;

/// Content prefix (chars) used by the summary rule.
pub const SUMMARY_CHARS: usize = 300;

/// One entry of [`RULES`].
///
/// Only `name` is public: rules are built here and handed out by [`matching_rule`] so callers
/// can report which one a message selected.
pub struct ReplyRule {
    pub name: &'static str,
    triggers: &'static [&'static str],
    render: fn(&Document) -> Option<String>,
}

impl ReplyRule {
    fn matches(&self, message_lc: &str) -> bool {
        self.triggers.iter().any(|t| message_lc.contains(t))
    }
}

fn render_title(doc: &Document) -> Option<String> {
    Some(format!("The page is titled: {}", doc.title))
}

fn render_links(doc: &Document) -> Option<String> {
    if doc.links.is_empty() {
        return None;
    }
    let lines = doc
        .links
        .iter()
        .take(REPLY_LINKS)
        .map(|l| format!("- {}: {}", l.text, l.url))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("Here are some links from the page:\n{lines}"))
}

fn render_summary(doc: &Document) -> Option<String> {
    Some(format!(
        "Summary of {}:\n\n{}...",
        doc.title,
        prefix_chars(&doc.content, SUMMARY_CHARS)
    ))
}

pub const RULES: &[ReplyRule] = &[
    ReplyRule {
        name: "title",
        triggers: &["title", "name", "called"],
        render: render_title,
    },
    ReplyRule {
        name: "links",
        triggers: &["link", "url", "website"],
        render: render_links,
    },
    ReplyRule {
        name: "summary",
        triggers: &["summary", "about", "what"],
        render: render_summary,
    },
];

/// The rule a message selects, if any.
pub fn matching_rule(message: &str) -> Option<&'static ReplyRule> {
    let lc = message.to_lowercase();
    RULES.iter().find(|r| r.matches(&lc))
}

fn default_reply(message: &str, doc: &Document) -> String {
    format!(
        "Based on the content from {}, here's what I found:\n\n{}",
        doc.title,
        find_relevant(message, &doc.content)
    )
}

/// Answer `message` from `doc`.
pub fn compose_reply(message: &str, doc: &Document) -> String {
    matching_rule(message)
        .and_then(|rule| (rule.render)(doc))
        .unwrap_or_else(|| default_reply(message, doc))
}
