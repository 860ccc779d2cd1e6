//! Toast notifications carried across redirects in a flash cookie.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use serde::Serialize;
use url::form_urlencoded;

pub const FLASH_COOKIE_NAME: &str = "better_demo_toast";

// A toast only has to survive one redirect.
const FLASH_COOKIE_MAX_AGE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    /// `Set-Cookie` value that shows this toast on the next page.
    ///
    /// # Errors
    /// Returns an error if the encoded cookie is not a valid header value.
    pub fn flash_cookie(&self, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
        let value = form_urlencoded::Serializer::new(String::new())
            .append_pair("kind", self.kind.as_str())
            .append_pair("message", &self.message)
            .finish();
        let mut cookie = format!(
            "{FLASH_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={FLASH_COOKIE_MAX_AGE}"
        );
        if secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// Toast stored in the request's flash cookie, if any.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = extract_flash_value(headers)?;
        let mut kind = None;
        let mut message = None;
        for (key, val) in form_urlencoded::parse(value.as_bytes()) {
            match key.as_ref() {
                "kind" => kind = ToastKind::parse(&val),
                "message" => message = Some(val.into_owned()),
                _ => {}
            }
        }
        let message = message.filter(|m| !m.trim().is_empty())?;
        Some(Self {
            kind: kind?,
            message,
        })
    }
}

/// `Set-Cookie` value that removes the flash cookie once it has been shown.
///
/// # Errors
/// Returns an error if the cookie is not a valid header value.
pub fn clear_flash_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{FLASH_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn extract_flash_value(headers: &HeaderMap) -> Option<String> {
    // HTTP/2 clients may split cookies across several headers.
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next().map(str::trim);
            let val = parts.next().map(str::trim);
            if let (Some(FLASH_COOKIE_NAME), Some(val)) = (key, val) {
                if !val.is_empty() {
                    return Some(val.to_string());
                }
            }
        }
    }
    None
}
