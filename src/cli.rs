use std::{ffi::OsString, time::Duration};

use clap::{value_parser, Arg, ArgMatches, Command};

use crate::{report::Format, ASYNC_PORT, OSPF_API_SYNC_PORT, POLL_TIMEOUT};

pub const USAGE: &str = "usage: lsadump [APISERVADDR]";

lazy_static::lazy_static! {
    static ref LSADUMP_COMMAND : Command = Command::new("lsadump")
    .about("Dump router and network LSA adjacencies through the OSPF API")
    .arg(Arg::new("server").value_name("APISERVADDR").help("OSPF API server address"))
    .arg(Arg::new("server-port").short('p').long("server-port").value_name("PORT")
        .value_parser(value_parser!(u16).range(1..))
        .help("OSPF API server port [default: 2607]"))
    .arg(Arg::new("async-port").short('a').long("async-port").value_name("PORT")
        .value_parser(value_parser!(u16).range(1..65535))
        .help("Local sync port, notifications are accepted on PORT + 1 [default: 40000]"))
    .arg(Arg::new("timeout").short('t').long("timeout").value_name("MSEC")
        .value_parser(value_parser!(u64).range(1..))
        .help("Stop listening after MSEC without updates [default: 500]"))
    .arg(Arg::new("format").short('f').long("format")
        .value_parser(["text", "json"])
        .help("Report format [default: text]"));
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub server_port: u16,
    pub async_port: u16,
    pub idle_timeout: Duration,
    pub format: Format,
}

impl Config {
    pub fn new(server: String) -> Self {
        Self {
            server,
            server_port: OSPF_API_SYNC_PORT,
            async_port: ASYNC_PORT,
            idle_timeout: POLL_TIMEOUT,
            format: Format::Text,
        }
    }

    fn from_matches(server: String, matches: &ArgMatches) -> Self {
        let mut config = Self::new(server);
        if let Some(port) = matches.get_one::<u16>("server-port") {
            config.server_port = *port;
        }
        if let Some(port) = matches.get_one::<u16>("async-port") {
            config.async_port = *port;
        }
        if let Some(msec) = matches.get_one::<u64>("timeout") {
            config.idle_timeout = Duration::from_millis(*msec);
        }
        if let Some(format) = matches.get_one::<String>("format") {
            config.format = match format.as_str() {
                "json" => Format::Json,
                _ => Format::Text,
            };
        }
        config
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// No server given: print the usage line and exit successfully.
    Usage,
    Dump(Config),
}

pub fn parse_from<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = LSADUMP_COMMAND.clone().try_get_matches_from(args)?;
    match matches.get_one::<String>("server") {
        Some(server) => Ok(Invocation::Dump(Config::from_matches(server.clone(), &matches))),
        None => Ok(Invocation::Usage),
    }
}
