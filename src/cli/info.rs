use anyhow::Result;

use crate::client::Hashlookup;
use crate::output;

pub fn run_info(client: &Hashlookup, over_dns: bool) -> Result<()> {
    let response = if over_dns {
        client.info_over_dns()?
    } else {
        client.info()?
    };

    output::print_json(&response)
}

pub fn run_top(client: &Hashlookup) -> Result<()> {
    output::print_json(&client.top()?)
}
