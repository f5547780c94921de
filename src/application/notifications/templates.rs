//! Mail templates
//!
//! A template is a JSON document with a `subject` and a `body` string.
//! Both may contain `{{ name }}` placeholders. Substitution is plain data
//! replacement: no expressions, no helpers, no nested lookups. Values placed
//! into the body are HTML-escaped.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::GlobalOptions;
use crate::support::{DomainError, DomainResult};

pub const DEFAULT_NOTIFICATION_TEMPLATE: &str = r#"{
  "subject": "New user registration",
  "body": "<p>Hello {{ name }},</p><p>{{ message }}</p>"
}"#;

pub const DEFAULT_FORGOT_PASSWORD_TEMPLATE: &str = r#"{
  "subject": "Reset your password",
  "body": "<p>A password reset was requested for {{ email }}.</p><p><a href=\"{{ url }}\">Choose a new password</a>. The link expires in 15 minutes.</p><p>If you did not request this, ignore this email.</p>"
}"#;

/// Which built-in template an override replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Notification,
    ForgotPassword,
}

impl TemplateKind {
    /// The administered override if one is set, otherwise the built-in default.
    pub fn source<'a>(&self, options: &'a GlobalOptions) -> &'a str {
        let custom = match self {
            Self::Notification => options.notification_template.as_deref(),
            Self::ForgotPassword => options.forgot_password_template.as_deref(),
        };

        match custom {
            Some(t) if !t.trim().is_empty() => t,
            _ => match self {
                Self::Notification => DEFAULT_NOTIFICATION_TEMPLATE,
                Self::ForgotPassword => DEFAULT_FORGOT_PASSWORD_TEMPLATE,
            },
        }
    }
}

pub type TemplateVars = BTreeMap<&'static str, String>;

/// A rendered subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
}

/// A parsed template.
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    subject: String,
    body: String,
}

impl Template {
    /// Parse a template document. A malformed document is a configuration
    /// error and is returned to the caller.
    pub fn parse(source: &str) -> DomainResult<Self> {
        serde_json::from_str(source)
            .map_err(|e| DomainError::InvalidTemplate(format!("Malformed template: {}", e)))
    }

    /// Resolve and parse the template for `kind` from the global options.
    pub fn for_kind(kind: TemplateKind, options: &GlobalOptions) -> DomainResult<Self> {
        Self::parse(kind.source(options))
    }

    /// Substitute variables. Missing variables render as empty strings.
    pub fn render(&self, vars: &TemplateVars) -> RenderedTemplate {
        RenderedTemplate {
            subject: substitute(&self.subject, vars, false),
            body: substitute(&self.body, vars, true),
        }
    }
}

fn substitute(input: &str, vars: &TemplateVars, escape: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            // Unterminated placeholder, keep the remainder verbatim
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        if let Some(value) = vars.get(key) {
            if escape {
                out.push_str(&escape_html(value));
            } else {
                out.push_str(value);
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> TemplateVars {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let t = Template::parse(r#"{"subject": "Hi {{name}}", "body": "<p>{{ message }}</p>"}"#)
            .unwrap();
        let r = t.render(&vars(&[("name", "Ann"), ("message", "welcome")]));

        assert_eq!(r.subject, "Hi Ann");
        assert_eq!(r.body, "<p>welcome</p>");
    }

    #[test]
    fn test_missing_variables_render_empty() {
        let t = Template::parse(r#"{"subject": "Hi {{ name }}!", "body": "x{{ nope }}y"}"#).unwrap();
        let r = t.render(&TemplateVars::new());

        assert_eq!(r.subject, "Hi !");
        assert_eq!(r.body, "xy");
    }

    #[test]
    fn test_body_values_are_escaped() {
        let t = Template::parse(r#"{"subject": "{{ name }}", "body": "{{ name }}"}"#).unwrap();
        let r = t.render(&vars(&[("name", "<script>alert('x')</script>")]));

        assert_eq!(r.subject, "<script>alert('x')</script>");
        assert_eq!(r.body, "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;");
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let t = Template::parse(r#"{"subject": "{{ a }}", "body": ""}"#).unwrap();
        let r = t.render(&vars(&[("a", "{{ b }}"), ("b", "leak")]));
        assert_eq!(r.subject, "{{ b }}");
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        let t = Template::parse(r#"{"subject": "a {{ b", "body": ""}"#).unwrap();
        assert_eq!(t.render(&TemplateVars::new()).subject, "a {{ b");
    }

    #[test]
    fn test_malformed_template_is_an_error() {
        assert!(matches!(
            Template::parse("{not json"),
            Err(DomainError::InvalidTemplate(_))
        ));
        assert!(matches!(
            Template::parse(r#"{"subject": "only subject"}"#),
            Err(DomainError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_override_and_default_resolution() {
        let mut options = GlobalOptions::default();
        assert_eq!(
            TemplateKind::ForgotPassword.source(&options),
            DEFAULT_FORGOT_PASSWORD_TEMPLATE
        );

        options.notification_template = Some(r#"{"subject": "s", "body": "b"}"#.into());
        assert_eq!(
            TemplateKind::Notification.source(&options),
            r#"{"subject": "s", "body": "b"}"#
        );

        options.forgot_password_template = Some("  ".into());
        assert_eq!(
            TemplateKind::ForgotPassword.source(&options),
            DEFAULT_FORGOT_PASSWORD_TEMPLATE
        );
    }

    #[test]
    fn test_default_templates_parse() {
        let options = GlobalOptions::default();
        let r = Template::for_kind(TemplateKind::ForgotPassword, &options)
            .unwrap()
            .render(&vars(&[("email", "a@x.com"), ("url", "https://h/login?token=t")]));

        assert_eq!(r.subject, "Reset your password");
        assert!(r.body.contains("a@x.com"));
        assert!(r.body.contains("https://h/login?token=t"));
        assert!(Template::for_kind(TemplateKind::Notification, &options).is_ok());
    }
}
