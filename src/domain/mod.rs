//! Domain modules.
//!
//! - `gateway` — typed contract reads/writes bound to one accessor
//! - `eligibility` — claimable position-token scan
//! - `session` — `SessionStore`, the single owner of UI state
//! - `view` — pure state → page rendering
//! - `notice` — user-facing notifications
//! - `tokens` / `claims` — sub-clients behind `IcoClient`

pub mod claims;
pub mod eligibility;
pub mod gateway;
pub mod notice;
pub mod session;
pub mod tokens;
pub mod view;
