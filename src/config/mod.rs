//! Configuration for release-agent.
//!
//! - `settings` - the TOML file model ([`DeployConfig`]) and its loading rules
//! - `template` - Tera rendering of `{{ project }}` / `{{ channel }}` / `{{ app }}` used by
//!   every configured path and command

mod settings;
mod template;

pub use settings::{DeployConfig, InstallSettings, RepositorySettings, RetrySettings, ServiceSettings};
pub use template::{TemplateVars, render};
