pub mod client;
pub mod logging;

use crate::flow::{Stage, MAX_NICKNAME_CHARS};
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_NICKNAME: &str = "nickname";
pub const ARG_REDIRECT_DELAY_MS: &str = "redirect-delay-ms";
pub const ARG_TARGET: &str = "target";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("reviewhub")
        .about("BookReviewHub login, onboarding and profile client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login").about("Show the social login links (landing)"),
        )
        .subcommand(
            Command::new(Stage::LoginSuccess.id())
                .visible_alias("success")
                .about("Show what the backend reports about the completed login"),
        )
        .subcommand(
            Command::new(Stage::Onboarding.id())
                .about("Show the pending registration and optionally confirm it")
                .arg(
                    Arg::new(ARG_NICKNAME)
                        .short('n')
                        .long("nickname")
                        .help(format!(
                            "Nickname to confirm the registration with (1-{MAX_NICKNAME_CHARS} characters)"
                        )),
                )
                .arg(
                    Arg::new(ARG_REDIRECT_DELAY_MS)
                        .long("redirect-delay-ms")
                        .help("Pause before moving on to the profile after a confirmed submit")
                        .env("REVIEWHUB_REDIRECT_DELAY_MS")
                        .default_value("400")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(Command::new(Stage::Me.id()).about("Show the authenticated user's profile"))
        .subcommand(
            Command::new("open")
                .about("Open the stage for the route the browser was redirected to")
                .arg(
                    Arg::new(ARG_TARGET)
                        .help("Redirect URL, route path such as /onboarding, or stage id")
                        .required(true),
                ),
        );

    let command = client::with_args(command);
    logging::with_args(command)
}
