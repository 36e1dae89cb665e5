use std::path::PathBuf;

use chrono::{Datelike, Utc};
use minijinja::{context, path_loader, AutoEscape, Environment};

use crate::catalog::LanguageCatalog;
use crate::error::AppError;

/// Source language preselected on the page.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Template directory read when templates are reloaded from disk.
pub const TEMPLATES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

const PAGE_TEMPLATE: &str = "translate.j2";

enum Templates {
    Embedded(Environment<'static>),
    Disk(PathBuf),
}

/// Renders the translation page. The catalog is title-cased once, up front.
pub struct PageRenderer {
    languages: LanguageCatalog,
    templates: Templates,
}

impl PageRenderer {
    /// Renderer using the template compiled into the binary.
    pub fn new(catalog: &LanguageCatalog) -> Result<Self, AppError> {
        let mut env = environment();
        env.add_template(PAGE_TEMPLATE, include_str!("../templates/translate.j2"))?;

        Ok(Self {
            languages: title_case_catalog(catalog),
            templates: Templates::Embedded(env),
        })
    }

    /// Renderer that re-reads templates from `dir` on every render.
    pub fn with_reload(catalog: &LanguageCatalog, dir: impl Into<PathBuf>) -> Self {
        Self {
            languages: title_case_catalog(catalog),
            templates: Templates::Disk(dir.into()),
        }
    }

    pub fn render(&self) -> Result<String, AppError> {
        let ctx = context! {
            languages => &self.languages,
            default_lang => DEFAULT_SOURCE_LANGUAGE,
            version => env!("CARGO_PKG_VERSION"),
            current_year => Utc::now().year(),
        };

        match &self.templates {
            Templates::Embedded(env) => Ok(env.get_template(PAGE_TEMPLATE)?.render(ctx)?),
            Templates::Disk(dir) => {
                let mut env = environment();
                env.set_loader(path_loader(dir));
                let html = env.get_template(PAGE_TEMPLATE)?.render(ctx)?;
                Ok(html)
            }
        }
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env
}

fn title_case_catalog(catalog: &LanguageCatalog) -> LanguageCatalog {
    catalog
        .iter()
        .map(|(code, name)| (code.clone(), title_case(name)))
        .collect()
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}
