use clap::{Arg, ArgMatches, Command};
use std::ffi::OsString;

pub const FLAG_TITLE: &str = "title";
pub const FLAG_BODY: &str = "body";

pub fn command() -> Command {
    Command::new("pushy")
        .about("Send push notifications via Pushbullet")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new(FLAG_TITLE)
                .long(FLAG_TITLE)
                .value_name("TITLE")
                .help("The name of the push notification")
                .required(true),
        )
        .arg(
            Arg::new(FLAG_BODY)
                .long(FLAG_BODY)
                .value_name("BODY")
                .help("The body of the push notification, read from stdin when omitted or empty"),
        )
}

/// Parse the full argument list, program name included.
pub fn parse<I, T>(args: I) -> Result<ArgMatches, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    command().try_get_matches_from(args)
}
