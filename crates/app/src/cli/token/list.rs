use clap::Args;
use storefront_app::{auth::PgAuthService, domain::customers::models::CustomerUuid};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Customer UUID whose tokens should be listed
    #[arg(long)]
    customer_uuid: Uuid,

    /// Hide revoked tokens
    #[arg(long)]
    active_only: bool,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let pool = args.database.connect().await?;

    let tokens: Vec<_> = PgAuthService::new(pool)
        .list_api_tokens(CustomerUuid::from_uuid(args.customer_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?
        .into_iter()
        .filter(|token| !args.active_only || token.revoked_at.is_none())
        .collect();

    if tokens.is_empty() {
        println!("no tokens found for customer {}", args.customer_uuid);
        return Ok(());
    }

    for token in &tokens {
        super::print_metadata(token);
        println!();
    }

    Ok(())
}
