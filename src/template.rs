//! Title and body templates for the backport pull request.
use serde::Serialize;
use tera::{Context, Tera};

use crate::{error::BackportError, result::Result};

/// Default pull request title template.
pub const DEFAULT_TITLE: &str =
    "[{{ target_branch }}] {{ source_title }}";

/// Default pull request body template.
pub const DEFAULT_BODY: &str = "Cherry-picked {{ sha }} from #{{ source_number }} into `{{ target_branch }}`.";

const TITLE_TEMPLATE: &str = "title";
const BODY_TEMPLATE: &str = "body";

/// Values available to the title and body templates.
#[derive(Debug, Clone, Serialize)]
pub struct PrContext {
    pub sha: String,
    pub target_branch: String,
    pub working_branch: String,
    pub source_number: u64,
    pub source_title: String,
}

/// Rendered pull request text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrText {
    pub title: String,
    pub body: String,
}

/// Compiled title and body templates.
pub struct PrTemplates {
    tera: Tera,
}

impl PrTemplates {
    /// Compile both templates up front so syntax errors surface before any
    /// git or API work happens.
    pub fn new(title: &str, body: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TITLE_TEMPLATE, title)
            .map_err(BackportError::from)?;
        tera.add_raw_template(BODY_TEMPLATE, body)
            .map_err(BackportError::from)?;
        Ok(Self { tera })
    }

    pub fn render(&self, context: &PrContext) -> Result<PrText> {
        let context =
            Context::from_serialize(context).map_err(BackportError::from)?;

        let title = self
            .tera
            .render(TITLE_TEMPLATE, &context)
            .map_err(BackportError::from)?;

        let body = self
            .tera
            .render(BODY_TEMPLATE, &context)
            .map_err(BackportError::from)?;

        Ok(PrText {
            title: title.trim().to_string(),
            body,
        })
    }
}
