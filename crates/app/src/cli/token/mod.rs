use clap::{Args, Subcommand};
use jiff::Timestamp;
use storefront_app::auth::ApiTokenMetadata;

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Issue a new token for a customer
    Create(create::CreateTokenArgs),

    /// Show every token a customer holds
    List(list::ListTokensArgs),

    /// Revoke a token by its UUID
    Revoke(revoke::RevokeTokenArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.command {
        TokenSubcommand::Create(args) => create::run(args).await,
        TokenSubcommand::List(args) => list::run(args).await,
        TokenSubcommand::Revoke(args) => revoke::run(args).await,
    }
}

fn describe(metadata: &ApiTokenMetadata) -> Vec<(&'static str, String)> {
    vec![
        ("token_uuid", metadata.uuid.to_string()),
        ("customer_uuid", metadata.customer_uuid.to_string()),
        ("token_version", metadata.version.as_i16().to_string()),
        ("created_at", metadata.created_at.to_string()),
        ("last_used_at", or_placeholder(metadata.last_used_at, "never")),
        ("expires_at", or_placeholder(metadata.expires_at, "none")),
        ("revoked_at", or_placeholder(metadata.revoked_at, "active")),
    ]
}

fn or_placeholder(value: Option<Timestamp>, placeholder: &str) -> String {
    value.map_or_else(|| placeholder.to_string(), |timestamp| timestamp.to_string())
}

fn print_metadata(metadata: &ApiTokenMetadata) {
    for (key, value) in describe(metadata) {
        println!("{key}: {value}");
    }
}
