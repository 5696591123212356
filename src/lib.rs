//! Client for the BookReviewHub session-cookie login flow.
//!
//! Social login happens in the browser against an external identity provider;
//! afterwards the backend holds the authenticated state in a cookie session.
//! This crate drives everything that happens after that redirect:
//!
//! 1. **Login success:** `GET /login/success` returns opaque data about the
//!    freshly authenticated user.
//! 2. **Onboarding:** `GET /onboarding` returns the pending registration held in
//!    the session (or `NO_PENDING`); `POST /onboarding` confirms it with a
//!    nickname.
//! 3. **Profile:** `GET /me` returns the durable profile.
//!
//! The [`client`] module owns the HTTP side (cookie jar, base URL handling,
//! error mapping). The [`flow`] module owns per-stage state, in-flight guards and
//! generation tokens. The [`cli`] module is the terminal front end.

pub mod cli;
pub mod client;
pub mod flow;
