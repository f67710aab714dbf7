//! Command-line front end driving the page controller

use crate::gate::GateDecision;
use crate::page::{CrudPage, PageResult};
use crate::state::AppState;
use crate::table::render_table;
use clap::{Parser, Subcommand};
use furnish_client::HttpResourceClient;
use furnish_core::{Error, RecordId, catalog};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command line interface for Furnish Admin
#[derive(Debug, Parser)]
#[command(
    name = "furnish-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage furniture-store master data",
    long_about = "List, add, edit and delete master-data records (brands, colors, tax rules, ...) on the store backend."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the configured level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    pub json: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store the bearer credential
    Login {
        /// Bearer token issued by the backend
        #[arg(long, env = "FURNISH_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Forget the stored credential
    Logout,

    /// List the manageable resources
    Resources,

    /// Show the configuration in effect
    Config,

    /// Show every record of a resource
    List {
        /// Resource path or label, e.g. `tax-rules`
        resource: String,
    },

    /// Create a record
    Add {
        /// Resource path or label
        resource: String,

        /// Field assignment, repeatable
        #[arg(short, long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Change fields of an existing record
    Edit {
        /// Resource path or label
        resource: String,

        /// Record id
        id: RecordId,

        /// Field assignment, repeatable
        #[arg(short, long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Delete a record
    Delete {
        /// Resource path or label
        resource: String,

        /// Record id
        id: RecordId,

        /// Confirm the deletion; without it only the prompt is shown
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_assignment(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{input}'")),
    }
}

/// Run one command, writing user output to `out`
///
/// Returns `Ok(false)` when the command ran but did not succeed (gate
/// redirect, failed load or save); the message has already been written.
#[allow(clippy::future_not_send)]
pub async fn execute(command: Commands, state: &AppState, out: &mut impl Write) -> PageResult<bool> {
    match command {
        Commands::Login { token } => {
            state.session().sign_in(&token)?;
            writeln!(out, "Signed in.")?;
            Ok(true)
        }
        Commands::Logout => {
            state.session().sign_out()?;
            writeln!(out, "Signed out.")?;
            Ok(true)
        }
        Commands::Resources => {
            for schema in catalog::CATALOG {
                writeln!(out, "{:<20}{}", schema.path, schema.plural)?;
            }
            Ok(true)
        }
        Commands::Config => {
            let rendered = toml::to_string_pretty(&state.config).map_err(|e| Error::Configuration {
                message: format!("cannot render configuration: {e}"),
            })?;
            write!(out, "{rendered}")?;
            Ok(true)
        }
        Commands::List { resource } => {
            let Some(page) = open_page(state, &resource, out).await? else {
                return Ok(false);
            };
            if let Some(notice) = page.notice() {
                writeln!(out, "error: {notice}")?;
                return Ok(false);
            }
            write!(
                out,
                "{}",
                render_table(page.schema(), page.collection(), page.options())
            )?;
            Ok(true)
        }
        Commands::Add { resource, set } => {
            let Some(mut page) = open_page(state, &resource, out).await? else {
                return Ok(false);
            };
            if let Some(notice) = page.notice() {
                writeln!(out, "error: {notice}")?;
                return Ok(false);
            }
            page.open_add()?;
            apply(&mut page, &set)?;
            save(&mut page, out).await
        }
        Commands::Edit { resource, id, set } => {
            let Some(mut page) = open_page(state, &resource, out).await? else {
                return Ok(false);
            };
            if let Some(notice) = page.notice() {
                writeln!(out, "error: {notice}")?;
                return Ok(false);
            }
            page.open_edit(id)?;
            apply(&mut page, &set)?;
            save(&mut page, out).await
        }
        Commands::Delete { resource, id, yes } => {
            let Some(mut page) = open_page(state, &resource, out).await? else {
                return Ok(false);
            };
            if let Some(notice) = page.notice() {
                writeln!(out, "error: {notice}")?;
                return Ok(false);
            }
            page.request_delete(id)?;

            if !yes {
                if let Some(prompt) = page.delete_prompt() {
                    writeln!(out, "{}: {}", prompt.title, prompt.message)?;
                }
                page.cancel_delete();
                writeln!(out, "Not deleted; pass --yes to confirm.")?;
                return Ok(true);
            }

            if page.confirm_delete().await.is_err() {
                print_notice(&page, out)?;
                return Ok(false);
            }
            writeln!(out, "Deleted {} {id}.", page.schema().singular)?;
            Ok(true)
        }
    }
}

/// Build the page and run it through the gate
#[allow(clippy::future_not_send)]
async fn open_page(
    state: &AppState,
    resource: &str,
    out: &mut impl Write,
) -> PageResult<Option<CrudPage<HttpResourceClient>>> {
    let mut page = state.page(resource)?;
    match page.activate(&state.gate()).await {
        GateDecision::Redirect { to } => {
            info!(%to, "Not signed in");
            writeln!(out, "not signed in; run `furnish-admin login`")?;
            Ok(None)
        }
        GateDecision::Allow(_) | GateDecision::Public => Ok(Some(page)),
    }
}

fn apply(page: &mut CrudPage<HttpResourceClient>, set: &[(String, String)]) -> PageResult<()> {
    for (field, value) in set {
        page.change_field(field, value)?;
    }
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn save(page: &mut CrudPage<HttpResourceClient>, out: &mut impl Write) -> PageResult<bool> {
    match page.submit().await {
        Ok(record) => {
            let rows = std::slice::from_ref(&record);
            write!(out, "{}", render_table(page.schema(), rows, page.options()))?;
            Ok(true)
        }
        Err(_) => {
            print_notice(page, out)?;
            Ok(false)
        }
    }
}

fn print_notice(page: &CrudPage<HttpResourceClient>, out: &mut impl Write) -> PageResult<()> {
    if let Some(notice) = page.notice() {
        writeln!(out, "error: {notice}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("name=Oak", ("name", "Oak"))]
    #[case("rate=7.5", ("rate", "7.5"))]
    #[case("notes=a=b", ("notes", "a=b"))]
    #[case("logo_url=", ("logo_url", ""))]
    fn test_parse_assignment(#[case] input: &str, #[case] expected: (&str, &str)) {
        let (field, value) = parse_assignment(input).unwrap();
        assert_eq!((field.as_str(), value.as_str()), expected);
    }

    #[rstest]
    #[case("name")]
    #[case("=Oak")]
    fn test_parse_assignment_rejects(#[case] input: &str) {
        assert!(parse_assignment(input).is_err());
    }

    #[test]
    fn test_cli_parses_edit() {
        let cli = Cli::try_parse_from([
            "furnish-admin",
            "--json",
            "edit",
            "materials",
            "4",
            "--set",
            "name=Oak Veneer",
            "-s",
            "status=no",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Edit { resource, id, set } => {
                assert_eq!(resource, "materials");
                assert_eq!(id, RecordId(4));
                assert_eq!(
                    set,
                    vec![
                        ("name".to_string(), "Oak Veneer".to_string()),
                        ("status".to_string(), "no".to_string())
                    ]
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_id() {
        assert!(Cli::try_parse_from(["furnish-admin", "delete", "brands", "seven"]).is_err());
    }
}
