//! Template rendering for mail bodies and invoices
//!
//! Undefined variables are errors. Templates named `*.html` escape their
//! values.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use ticketmail_domain::{Result, TicketMailError};

/// Render `source` with the given context.
///
/// # Errors
/// Returns `TicketMailError::Config` naming the template when it fails to
/// parse or references a variable the context lacks.
pub fn render<S: Serialize>(name: &str, source: &str, context: S) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    let template = env
        .template_from_named_str(name, source)
        .map_err(|e| TicketMailError::Config(format!("invalid template '{name}': {e}")))?;
    template
        .render(context)
        .map_err(|e| TicketMailError::Config(format!("failed to render template '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn renders_variables() {
        let text = render("status", "Hej {{ to_name }}", context! { to_name => "Ada" }).unwrap();
        assert_eq!(text, "Hej Ada");
    }

    #[test]
    fn unknown_variable_is_a_config_error() {
        let err = render("status", "Hej {{ to_nam }}", context! { to_name => "Ada" }).unwrap_err();
        assert!(matches!(err, TicketMailError::Config(ref msg) if msg.contains("status")));
    }

    #[test]
    fn html_templates_escape_values() {
        let html = render("invoice.html", "<p>{{ who }}</p>", context! { who => "A <a@b.dk>" }).unwrap();
        assert_eq!(html, "<p>A &lt;a@b.dk&gt;</p>");
    }
}
