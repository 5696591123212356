use crate::client::DEFAULT_ORIGIN;
use clap::{Arg, Command};

pub const ARG_ORIGIN: &str = "origin";
pub const ARG_API_BASE: &str = "api-base";
pub const ARG_SESSION_COOKIE: &str = "session-cookie";

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ORIGIN)
                .long("origin")
                .help("Origin the frontend is served from; requests go here unless --api-base is set")
                .env("REVIEWHUB_ORIGIN")
                .default_value(DEFAULT_ORIGIN)
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_BASE)
                .long("api-base")
                .help("API base URL prefixed to every request path (absolute, or relative to --origin)")
                .env("REVIEWHUB_API_BASE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_COOKIE)
                .long("session-cookie")
                .help("Existing session cookie, e.g. JSESSIONID=...")
                .env("REVIEWHUB_SESSION_COOKIE")
                .hide_env_values(true)
                .global(true),
        )
}
