//! Authorize command - show the GetLogin install and authorize links

use anyhow::Result;
use chainnotes_core::services::{authorize_url, install_url, Platform};
use colored::Colorize;

use crate::output::info;

pub fn run(platform: Option<&str>) -> Result<()> {
    let platform = match platform {
        Some(name) => Platform::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown platform '{}' (expected ios or android)", name))?,
        None => Platform::current(),
    };

    println!("{}", "Log in with GetLogin".bold());
    println!();
    println!("1. Install GetLogin:");
    info(&format!("   {}", install_url(platform)));
    println!("2. Open the authorize link on the device running GetLogin:");
    info(&format!("   {}", authorize_url()));
    println!("3. Pass the return link to login:");
    println!("   cnotes login --link '<return link>'");

    Ok(())
}
