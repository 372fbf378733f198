//! Status command - show network, configuration and session status

use anyhow::Result;
use chainnotes_core::ports::CredentialStore;
use chainnotes_core::Error;
use colored::Colorize;
use serde::Serialize;

use super::get_context;
use crate::output::create_table;

#[derive(Serialize)]
struct StatusReport {
    app_dir: String,
    network: String,
    rpc_url: String,
    notes_address: String,
    identity_address: Option<String>,
    demo_mode: bool,
    credentials_stored: bool,
    logged_in: bool,
    username: Option<String>,
    address: Option<String>,
    notes: Option<usize>,
    error: Option<String>,
    relogin_required: bool,
}

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let mut report = StatusReport {
        app_dir: ctx.app_dir.display().to_string(),
        network: String::new(),
        rpc_url: ctx.config.rpc_url.clone(),
        notes_address: ctx.config.notes_address.clone(),
        identity_address: ctx.config.identity_address.clone(),
        demo_mode: ctx.config.demo_mode,
        credentials_stored: !matches!(ctx.store.load(), Err(Error::StorageEmpty)),
        logged_in: false,
        username: None,
        address: None,
        notes: None,
        error: None,
        relogin_required: false,
    };

    match ctx.board() {
        Ok(mut board) => {
            report.network = board.network().to_string();
            if report.credentials_stored {
                match board.restore().await {
                    Ok(_) => {
                        if let Some(account) = board.session() {
                            report.logged_in = true;
                            report.username = Some(account.username().to_string());
                            report.address = Some(format!("{:?}", account.address()));
                            report.notes = Some(board.feed().len());
                        }
                        report.error = board.error().map(str::to_string);
                    }
                    Err(e) => {
                        report.relogin_required = e.is_binding_failure();
                        report.error = Some(e.display_message());
                    }
                }
            }
        }
        Err(e) => report.error = Some(e.to_string()),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "ChainNotes Status".bold());
    println!();

    let mut table = create_table();
    table.add_row(vec!["Network", &report.network]);
    table.add_row(vec![
        "Mode",
        if report.demo_mode { "demo" } else { "live" },
    ]);
    table.add_row(vec!["RPC", &report.rpc_url]);
    table.add_row(vec!["Notes contract", &report.notes_address]);
    table.add_row(vec![
        "Identity contract",
        report.identity_address.as_deref().unwrap_or("(not set)"),
    ]);
    table.add_row(vec!["App directory", &report.app_dir]);
    println!("{}", table);
    println!();

    if report.logged_in {
        println!(
            "Logged in as {} ({})",
            report.username.as_deref().unwrap_or_default().green(),
            report.address.as_deref().unwrap_or_default()
        );
        if let Some(count) = report.notes {
            println!("Notes: {}", count);
        }
    } else if report.credentials_stored {
        println!("{}", "Stored session could not be verified".yellow());
    } else {
        println!("{}", "Not logged in".yellow());
    }

    if let Some(error) = &report.error {
        println!("{} {}", "Error:".red(), error);
    }
    if report.relogin_required {
        println!("Run 'cnotes login' to bind a valid session.");
    }

    Ok(())
}
