//! Template engine for the server-rendered pages.
//!
//! Templates live in `templates/pages/` and are embedded into the binary, so
//! rendering never depends on the working directory.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::error::AppError;

static PAGE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const PAGE_TEMPLATES: &[(&str, &str)] = &[
    (
        "layout.jinja",
        include_str!("../../../templates/pages/layout.jinja"),
    ),
    (
        "toast.jinja",
        include_str!("../../../templates/pages/toast.jinja"),
    ),
    (
        "form.jinja",
        include_str!("../../../templates/pages/form.jinja"),
    ),
    (
        "admin.jinja",
        include_str!("../../../templates/pages/admin.jinja"),
    ),
    (
        "dialogs.jinja",
        include_str!("../../../templates/pages/dialogs.jinja"),
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Internal(e.to_string())
    }
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);

    for &(name, source) in PAGE_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load page template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded page template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    PAGE_ENV.get_or_init(init_environment)
}

/// Render `template_name` with any serializable context
pub fn render_page<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
