//! Named HTML views rendered with minijinja.
//!
//! A view name `X` resolves to the embedded template `X.html`; `.html`
//! templates are autoescaped.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::errors::WebError;

pub const USERS_VIEW: &str = "users";
pub const UPDATE_USER_VIEW: &str = "update-user";

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../templates/layout.html"))?;
        env.add_template("users.html", include_str!("../templates/users.html"))?;
        env.add_template("update-user.html", include_str!("../templates/update-user.html"))?;
        Ok(Self { env })
    }

    /// Render `view` with `attributes` (any serializable map-like value).
    pub fn render<S: Serialize>(&self, view: &str, attributes: S) -> Result<Html<String>, WebError> {
        let template = self.env.get_template(&format!("{view}.html"))?;
        Ok(Html(template.render(attributes)?))
    }
}
