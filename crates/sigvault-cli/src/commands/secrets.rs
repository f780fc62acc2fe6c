//! Secret commands.
//!
//! Provides `sigvault write|read|delete|sign|raw`, each sent as a request to
//! the signature backend mounted by [`Host`].

use std::path::Path;

use clap::Subcommand;
use sigvault_core::Config;
use sigvault_plugin_sdk::{AttributeValue, Attributes, Request, Response};
use sigvault_secrets::{SECRET_ACCESS_KEY, SIGNATURE_FIELD};

use crate::host::Host;

#[derive(Subcommand)]
pub enum SecretsCommand {
    /// Store a secret (prompts for secret_access_key if no fields are given)
    Write {
        /// Key ID
        key_id: String,

        /// Fields as FIELD=VALUE
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Read a path relative to the mount and print the response
    Read {
        /// `{key_id}` or `{key_id}/{date}/{service}/{region}`
        path: String,
    },

    /// Delete a secret
    Delete {
        /// Key ID
        key_id: String,
    },

    /// Derive a signing key scoped to a date, region, and service
    Sign {
        /// Key ID
        key_id: String,

        /// Date scope, e.g. 20150831
        #[arg(long)]
        date: String,

        /// Region scope, e.g. us-east-1
        #[arg(long)]
        region: String,

        /// Service scope, e.g. ec2
        #[arg(long)]
        service: String,
    },

    /// Print the stored secret_access_key (privileged)
    Raw {
        /// Key ID
        key_id: String,
    },
}

/// Parse a `FIELD=VALUE` argument.
fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected FIELD=VALUE, got '{}'", s)),
    }
}

/// Run a secret command.
pub async fn run(command: SecretsCommand, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let host = Host::open(&config)?;

    match command {
        SecretsCommand::Write { key_id, fields } => {
            let data = if fields.is_empty() {
                let prompt = format!("Enter {} for '{}': ", SECRET_ACCESS_KEY, key_id);
                let value = rpassword::prompt_password(prompt)
                    .map_err(|e| anyhow::anyhow!("Failed to read secret: {}", e))?;
                if value.is_empty() {
                    anyhow::bail!("Secret value must not be empty");
                }
                Attributes::new().with(SECRET_ACCESS_KEY, value)
            } else {
                fields
                    .into_iter()
                    .map(|(field, value)| (field, AttributeValue::String(value)))
                    .collect()
            };

            host.send(Request::write(&key_id, data)).await?;
            println!("Secret '{}' stored successfully.", key_id);
        }

        SecretsCommand::Read { path } => {
            print_response(host.send(Request::read(path)).await?)?;
        }

        SecretsCommand::Delete { key_id } => {
            host.send(Request::delete(&key_id)).await?;
            println!("Secret '{}' deleted.", key_id);
        }

        SecretsCommand::Sign {
            key_id,
            date,
            region,
            service,
        } => {
            let path = format!("{}/{}/{}/{}", key_id, date, service, region);
            let resp = host.send(Request::read(path)).await?;
            print_field(resp, SIGNATURE_FIELD)?;
        }

        SecretsCommand::Raw { key_id } => {
            let resp = host
                .send(Request::read(format!("raw/{}", key_id)).privileged())
                .await?;
            print_field(resp, SECRET_ACCESS_KEY)?;
        }
    }

    host.shutdown().await
}

fn print_response(resp: Option<Response>) -> anyhow::Result<()> {
    match resp {
        Some(resp) => println!("{}", serde_json::to_string_pretty(&resp.data)?),
        None => println!("No value found"),
    }
    Ok(())
}

/// Print one field bare: strings unquoted, anything else as JSON.
fn print_field(resp: Option<Response>, field: &str) -> anyhow::Result<()> {
    let Some(resp) = resp else {
        println!("No value found");
        return Ok(());
    };

    match resp.get(field) {
        Some(AttributeValue::String(s)) => println!("{}", s),
        Some(other) => println!("{}", serde_json::to_string(other)?),
        None => anyhow::bail!("Response has no '{}' field", field),
    }
    Ok(())
}
