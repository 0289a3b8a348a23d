//! Tera rendering of configured paths and commands.
//!
//! Every path and command in the configuration is a Tera template with three
//! variables: `{{ project }}`, `{{ channel }}` and `{{ app }}`. Single braces
//! are plain text, so shell syntax such as `${HOME}` or `{1..3}` in a service
//! command passes through untouched. Text Tera would otherwise interpret can
//! be wrapped in `{% raw %}...{% endraw %}`.
//!
//! An undefined variable is an error, so a typo like `{{ ap }}` fails the run
//! instead of producing a path like `/opt//app.jar`.

use anyhow::{Result, bail};
use std::error::Error as _;
use tera::{Context as TeraContext, Tera};
use tracing::debug;

use crate::core::DeployError;

/// Values available to configuration templates for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars<'a> {
    pub project: &'a str,
    pub channel: &'a str,
    pub app: &'a str,
}

impl<'a> TemplateVars<'a> {
    #[must_use]
    pub const fn new(project: &'a str, channel: &'a str, app: &'a str) -> Self {
        Self {
            project,
            channel,
            app,
        }
    }

    fn context(&self) -> TeraContext {
        let mut context = TeraContext::new();
        context.insert("project", self.project);
        context.insert("channel", self.channel);
        context.insert("app", self.app);
        context
    }
}

/// Render `template` with the variables of one run.
///
/// # Errors
///
/// Returns [`DeployError::ConfigError`] when the template does not parse or
/// uses a variable other than `project`, `channel` or `app`.
pub fn render(template: &str, vars: &TemplateVars<'_>) -> Result<String> {
    // Fresh instance per render, like one-off rendering in Tera itself.
    let mut tera = Tera::default();

    match tera.render_str(template, &vars.context()) {
        Ok(rendered) => {
            debug!("Rendered '{template}' as '{rendered}'");
            Ok(rendered)
        }
        Err(e) => bail!(DeployError::ConfigError {
            message: format!("failed to render '{template}': {}", format_tera_error(&e)),
        }),
    }
}

/// Tera reports the useful part (the missing variable, the parse position)
/// in the error's sources, so flatten the whole chain.
fn format_tera_error(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars<'static> {
        TemplateVars::new("rtb", "snapshot", "data-sync")
    }

    #[test]
    fn test_render_all_variables() {
        let rendered = render("libs-{{ channel }}-local/{{ project }}/{{ app }}", &vars()).unwrap();
        assert_eq!(rendered, "libs-snapshot-local/rtb/data-sync");
    }

    #[test]
    fn test_render_repeated_variable() {
        let rendered = render("/opt/{{ app }}/{{app}}.jar", &vars()).unwrap();
        assert_eq!(rendered, "/opt/data-sync/data-sync.jar");
    }

    #[test]
    fn test_render_without_variables() {
        assert_eq!(render("systemctl daemon-reload", &vars()).unwrap(), "systemctl daemon-reload");
        assert_eq!(render("", &vars()).unwrap(), "");
    }

    #[test]
    fn test_shell_braces_pass_through() {
        let rendered = render(
            "systemctl stop {{ app }} && for i in {1..3}; do sleep 1; done; echo ${HOME}",
            &vars(),
        )
        .unwrap();
        assert_eq!(
            rendered,
            "systemctl stop data-sync && for i in {1..3}; do sleep 1; done; echo ${HOME}"
        );
    }

    #[test]
    fn test_raw_block_escapes_tera_syntax() {
        let rendered = render("echo {% raw %}{{ app }}{% endraw %} {{ app }}", &vars()).unwrap();
        assert_eq!(rendered, "echo {{ app }} data-sync");
    }

    #[test]
    fn test_render_unknown_variable() {
        let error = render("/opt/{{ ap }}.jar", &vars()).unwrap_err();
        assert!(matches!(error.downcast_ref::<DeployError>(), Some(DeployError::ConfigError { .. })));
        let message = error.to_string();
        assert!(message.contains("failed to render '/opt/{{ ap }}.jar'"));
        assert!(message.contains("ap"));
    }

    #[test]
    fn test_render_unterminated_tag() {
        let error = render("/opt/{{ app.jar", &vars()).unwrap_err();
        assert!(error.to_string().contains("failed to render"));
    }
}
