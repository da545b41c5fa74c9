pub mod info;
pub mod query;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser};

use crate::client::Hashlookup;
use crate::config::{ClientOverrides, Config};

#[derive(Parser)]
#[command(name = "hashlookup")]
#[command(about = "Query the CIRCL hashlookup service for known file hashes")]
#[command(version)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["query", "info", "top", "children", "parents"]),
))]
pub struct Cli {
    /// (List of) hash(es) to look up: md5, sha1 or sha256 (bulk: md5 or sha1)
    #[arg(long, num_args = 1.., value_name = "HASH")]
    pub query: Vec<String>,

    /// Get info about the database
    #[arg(long)]
    pub info: bool,

    /// Get top requests against the database
    #[arg(long)]
    pub top: bool,

    /// List the children of a SHA1
    #[arg(long, value_name = "SHA1")]
    pub children: Option<String>,

    /// List the parents of a SHA1
    #[arg(long, value_name = "SHA1")]
    pub parents: Option<String>,

    #[command(flatten)]
    pub page: query::PageArgs,

    /// Resolve --query (single md5/sha1) or --info over DNS instead of HTTPS
    #[arg(long, conflicts_with_all = ["top", "children", "parents"])]
    pub dns: bool,

    #[command(flatten)]
    pub client: ClientArgs,

    /// Suppress status messages on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Log requests to stderr (-vv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args)]
pub struct ClientArgs {
    /// Hashlookup instance (or HASHLOOKUP_URL env var)
    #[arg(long, env = "HASHLOOKUP_URL")]
    pub url: Option<String>,

    /// User-Agent header (or HASHLOOKUP_USER_AGENT env var)
    #[arg(long, env = "HASHLOOKUP_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (or HASHLOOKUP_TIMEOUT env var)
    #[arg(long, env = "HASHLOOKUP_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Proxy for HTTP requests (or HASHLOOKUP_PROXY env var)
    #[arg(long, env = "HASHLOOKUP_PROXY")]
    pub proxy: Option<String>,

    /// DNS server for --dns, as IP or IP:PORT (or HASHLOOKUP_NAMESERVER env var)
    #[arg(long, env = "HASHLOOKUP_NAMESERVER")]
    pub nameserver: Option<String>,

    /// Config file (defaults to ./.hashlookup.toml, then the user config dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ClientArgs {
    pub fn connect(&self) -> Result<Hashlookup> {
        let config = match self.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::load().unwrap_or_default(),
        };

        let overrides = ClientOverrides {
            url: self.url.as_deref(),
            user_agent: self.user_agent.as_deref(),
            timeout_secs: self.timeout,
            proxy: self.proxy.as_deref(),
            nameserver: self.nameserver.as_deref(),
        };

        Ok(Hashlookup::with_config(config.build_client_config(overrides)?)?)
    }
}

pub enum Action {
    Query(Vec<String>),
    Info,
    Top,
    Children(String),
    Parents(String),
}

impl Cli {
    pub fn action(&self) -> Action {
        if let Some(ref sha1) = self.children {
            Action::Children(sha1.clone())
        } else if let Some(ref sha1) = self.parents {
            Action::Parents(sha1.clone())
        } else if self.info {
            Action::Info
        } else if self.top {
            Action::Top
        } else {
            Action::Query(self.query.clone())
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let client = cli.client.connect()?;

    match cli.action() {
        Action::Query(hashes) => query::run(&client, hashes, cli.dns),
        Action::Info => info::run_info(&client, cli.dns),
        Action::Top => info::run_top(&client),
        Action::Children(sha1) => query::run_children(&client, &sha1, &cli.page),
        Action::Parents(sha1) => query::run_parents(&client, &sha1, &cli.page),
    }
}
