//! # better-demo
//!
//! A server-rendered authentication demo: sign-in and sign-up forms, a
//! session-backed dashboard, and server-side session retrieval.
//!
//! ## Delegation
//!
//! Password hashing, session tokens and OAuth handshakes all live in an
//! external auth service. This crate only talks to its REST surface through
//! [`auth::AuthClient`], forwarding the browser's cookies and relaying the
//! `Set-Cookie` headers the service returns.
//!
//! ## Sessions
//!
//! Sessions are never cached locally. Every page that needs one calls
//! [`auth::session::current_session`] with the request headers, so the server
//! path (`/dashboard`, `/welcome`) and the JSON path (`/api/session`) share one
//! retrieval function.
//!
//! ## Forms
//!
//! Form input is validated in [`forms`] before the auth service is contacted.
//! A rejected form is re-rendered with its values intact.

pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod forms;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
