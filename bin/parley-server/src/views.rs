//! Server-rendered HTML pages.
//!
//! Templates are embedded into the binary and compiled once at startup.
//! `.html` templates are auto-escaped by minijinja, so message content is
//! rendered as text.

use minijinja::{context, Environment};
use parley_core::Message;
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index.html";

#[derive(Debug)]
pub struct Pages {
    env: Environment<'static>,
}

#[derive(Serialize)]
struct MessageView<'a> {
    role: String,
    content: &'a str,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    /// Render the chat page for the given history.
    pub fn index(&self, history: &[Message]) -> Result<String, minijinja::Error> {
        let messages: Vec<MessageView<'_>> = history
            .iter()
            .map(|m| MessageView {
                role: m.role.to_string(),
                content: &m.content,
            })
            .collect();
        self.env
            .get_template(INDEX_TEMPLATE)?
            .render(context! { chat_history => messages })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use parley_core::Role;

    #[test]
    fn index_lists_messages_in_order_and_escapes_content() {
        let pages = Pages::new().unwrap();
        let html = pages
            .index(&[
                Message { id: 1, role: Role::User, content: "<b>hi</b>".into() },
                Message { id: 2, role: Role::Assistant, content: "hello back".into() },
            ])
            .unwrap();

        assert!(html.contains("&lt;b&gt;hi"));
        assert!(!html.contains("<b>hi</b>"));
        let first = html.find("&lt;b&gt;hi").unwrap();
        let second = html.find("hello back").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let pages = Pages::new().unwrap();
        let html = pages.index(&[]).unwrap();
        assert!(html.contains("No messages yet"));
    }
}
