//! Server-rendered pages.
//!
//! Templates are embedded at compile time and registered once at startup.
//! Every page renders inside the `layout` partial, which owns the document
//! head and the toast region. Handlebars escapes HTML in every `{{...}}`
//! expression, so user data and the session JSON are safe to interpolate.

pub mod toast;

pub use toast::{Toast, ToastKind};

use crate::{
    auth::Session,
    forms::{FieldErrors, SignInForm, SignUpForm},
};
use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;

pub const SITE_NAME: &str = "Better Auth Demo";

const DESCRIPTION: &str =
    "A complete authentication system built with Better Auth, MongoDB, and server-rendered forms.";

const LAYOUT: &str = "layout";
const SIGN_IN: &str = "sign_in";
const SIGN_UP: &str = "sign_up";
const DASHBOARD: &str = "dashboard";
const WELCOME: &str = "welcome";

/// `%s | Better Auth Demo`
#[must_use]
pub fn page_title(title: &str) -> String {
    format!("{title} | {SITE_NAME}")
}

/// Fields every page passes to the layout.
#[derive(Serialize)]
struct Shell<'a> {
    title: String,
    site_name: &'static str,
    description: &'static str,
    toast: Option<&'a Toast>,
}

impl<'a> Shell<'a> {
    fn new(title: &str, toast: Option<&'a Toast>) -> Self {
        Self {
            title: page_title(title),
            site_name: SITE_NAME,
            description: DESCRIPTION,
            toast,
        }
    }
}

#[derive(Serialize)]
struct FormPage<'a, F> {
    #[serde(flatten)]
    shell: Shell<'a>,
    form: &'a F,
    errors: &'a FieldErrors,
}

#[derive(Serialize)]
struct DashboardPage<'a> {
    #[serde(flatten)]
    shell: Shell<'a>,
    user: &'a crate::auth::User,
    display_name: &'a str,
    initial: String,
    profile_name: &'a str,
    greeting_name: &'a str,
    session_json: String,
}

#[derive(Serialize)]
struct WelcomePage<'a> {
    #[serde(flatten)]
    shell: Shell<'a>,
    user: Option<&'a crate::auth::User>,
}

pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    /// Register the embedded templates.
    ///
    /// # Errors
    /// Returns an error if a template fails to parse.
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();

        registry
            .register_partial(LAYOUT, include_str!("../../templates/layout.hbs"))
            .context("Failed to register layout template")?;

        for (name, source) in [
            (SIGN_IN, include_str!("../../templates/sign_in.hbs")),
            (SIGN_UP, include_str!("../../templates/sign_up.hbs")),
            (DASHBOARD, include_str!("../../templates/dashboard.hbs")),
            (WELCOME, include_str!("../../templates/welcome.hbs")),
        ] {
            registry
                .register_template_string(name, source)
                .with_context(|| format!("Failed to register {name} template"))?;
        }

        Ok(Self { registry })
    }

    /// Login form with the submitted values and any field errors.
    ///
    /// # Errors
    /// Returns an error if rendering fails.
    pub fn sign_in(
        &self,
        form: &SignInForm,
        errors: &FieldErrors,
        toast: Option<&Toast>,
    ) -> Result<String> {
        let page = FormPage {
            shell: Shell::new("Sign In", toast),
            form,
            errors,
        };
        self.render(SIGN_IN, &page)
    }

    /// # Errors
    /// Returns an error if rendering fails.
    pub fn sign_up(
        &self,
        form: &SignUpForm,
        errors: &FieldErrors,
        toast: Option<&Toast>,
    ) -> Result<String> {
        let page = FormPage {
            shell: Shell::new("Sign Up", toast),
            form,
            errors,
        };
        self.render(SIGN_UP, &page)
    }

    /// Profile, raw session and quick actions.
    ///
    /// # Errors
    /// Returns an error if the session cannot be serialized or rendering fails.
    pub fn dashboard(&self, session: &Session, toast: Option<&Toast>) -> Result<String> {
        let user = &session.user;
        let has_name = !user.name.trim().is_empty();
        let page = DashboardPage {
            shell: Shell::new("Dashboard", toast),
            user,
            display_name: user.display_name(),
            initial: user.initial(),
            profile_name: if has_name { &user.name } else { "Not set" },
            greeting_name: if has_name { &user.name } else { "User" },
            session_json: serde_json::to_string_pretty(session)
                .context("Failed to serialize session")?,
        };
        self.render(DASHBOARD, &page)
    }

    /// `Welcome {name}` for a session, `Not authenticated` otherwise.
    ///
    /// # Errors
    /// Returns an error if rendering fails.
    pub fn welcome(&self, session: Option<&Session>) -> Result<String> {
        let page = WelcomePage {
            shell: Shell::new("Welcome", None),
            user: session.map(|s| &s.user),
        };
        self.render(WELCOME, &page)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.registry
            .render(name, data)
            .with_context(|| format!("Failed to render {name} template"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::stub::sample_session;

    fn views() -> Views {
        Views::new().expect("templates must register")
    }

    #[test]
    fn title_follows_template() {
        assert_eq!(page_title("Sign In"), "Sign In | Better Auth Demo");
    }

    #[test]
    fn layout_metadata() -> Result<()> {
        let html = views().sign_in(&SignInForm::default(), &FieldErrors::default(), None)?;
        assert!(html.contains("<title>Sign In | Better Auth Demo</title>"));
        assert!(html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
        assert!(html.contains(r#"content="hsl(0 0% 100%)""#));
        assert!(html.contains(r#"content="hsl(240 10% 3.9%)""#));
        assert!(html.contains("https://fonts.gstatic.com"));
        assert!(html.contains(r#"data-duration="4000""#));
        assert!(!html.contains("data-toast>"));
        Ok(())
    }

    #[test]
    fn sign_in_keeps_values_and_shows_errors() -> Result<()> {
        let form = SignInForm {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        let errors = FieldErrors {
            email: Some("Please enter a valid email".to_string()),
            ..FieldErrors::default()
        };
        let html = views().sign_in(&form, &errors, None)?;
        assert!(html.contains(r#"value="not-an-email""#));
        assert!(html.contains(r#"value="secret""#));
        assert!(html.contains("Please enter a valid email"));
        assert!(html.contains("Signing in…"));
        assert!(html.contains("Connecting to GitHub…"));
        assert!(html.contains(r#"name="provider" value="github""#));
        assert!(html.contains(r#"disabled aria-disabled="true">Other</button>"#));
        Ok(())
    }

    #[test]
    fn sign_up_renders_loading_label_and_errors() -> Result<()> {
        let form = SignUpForm {
            name: "J".to_string(),
            email: "j@example.com".to_string(),
            password: "short".to_string(),
        };
        let errors = FieldErrors {
            name: Some("Name must be at least 2 characters".to_string()),
            password: Some("Password must be at least 8 characters".to_string()),
            ..FieldErrors::default()
        };
        let html = views().sign_up(&form, &errors, None)?;
        assert!(html.contains("<title>Sign Up | Better Auth Demo</title>"));
        assert!(html.contains("Name must be at least 2 characters"));
        assert!(html.contains("Password must be at least 8 characters"));
        assert!(html.contains(r#"value="j@example.com""#));
        assert!(html.contains("Creating account…"));
        Ok(())
    }

    #[test]
    fn form_values_are_escaped() -> Result<()> {
        let form = SignInForm {
            email: r#""><script>alert(1)</script>"#.to_string(),
            password: String::new(),
        };
        let html = views().sign_in(&form, &FieldErrors::default(), None)?;
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        Ok(())
    }

    #[test]
    fn toast_is_rendered() -> Result<()> {
        let toast = Toast::error("Invalid credentials");
        let html = views().sign_in(&SignInForm::default(), &FieldErrors::default(), Some(&toast))?;
        assert!(html.contains("toast-error"));
        assert!(html.contains("Invalid credentials"));
        assert!(html.contains("data-toast-close"));
        Ok(())
    }

    #[test]
    fn dashboard_shows_profile_and_session() -> Result<()> {
        let session = sample_session();
        let html = views().dashboard(&session, Some(&Toast::success("Signed in successfully!")))?;
        assert!(html.contains("Welcome back, John Doe!"));
        assert!(html.contains("john@example.com"));
        assert!(html.contains(">Verified</span>"));
        assert!(!html.contains("Profile picture"));
        assert!(html.contains("Edit Profile"));
        assert!(html.contains("Security Settings"));
        assert!(html.contains(r#"action="/sign-out""#));
        // Pretty JSON, HTML-escaped.
        assert!(html.contains("&quot;userId&quot;: &quot;u1&quot;"));
        assert!(html.contains("Signed in successfully!"));
        Ok(())
    }

    #[test]
    fn dashboard_without_name_or_verification() -> Result<()> {
        let mut session = sample_session();
        session.user.name = String::new();
        session.user.email_verified = false;
        session.user.image = Some("https://example.com/me.png".to_string());
        let html = views().dashboard(&session, None)?;
        assert!(html.contains("Not set"));
        assert!(html.contains("Welcome back, User!"));
        assert!(html.contains("Not Verified"));
        assert!(html.contains(r#"alt="Profile picture""#));
        assert!(html.contains(r#"alt="john@example.com avatar""#));
        Ok(())
    }

    #[test]
    fn welcome_sample() -> Result<()> {
        let views = views();
        let session = sample_session();
        assert!(views.welcome(Some(&session))?.contains("Welcome John Doe"));
        assert!(views.welcome(None)?.contains("Not authenticated"));
        Ok(())
    }
}
