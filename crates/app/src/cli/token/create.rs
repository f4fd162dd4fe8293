use clap::Args;
use jiff::{SignedDuration, Timestamp};
use storefront_app::{auth::PgAuthService, domain::customers::models::CustomerUuid};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Customer UUID that should own the token
    #[arg(long)]
    customer_uuid: Uuid,

    /// Absolute expiry (RFC 3339)
    #[arg(long, conflicts_with = "expires_in_days")]
    expires_at: Option<Timestamp>,

    /// Expiry relative to now
    #[arg(long)]
    expires_in_days: Option<u16>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let expires_at = resolve_expiry(args.expires_at, args.expires_in_days, Timestamp::now())?;
    let pool = args.database.connect().await?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(CustomerUuid::from_uuid(args.customer_uuid), expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    super::print_metadata(&issued.metadata);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

fn resolve_expiry(
    expires_at: Option<Timestamp>,
    expires_in_days: Option<u16>,
    now: Timestamp,
) -> Result<Option<Timestamp>, String> {
    let expires_at = match (expires_at, expires_in_days) {
        (Some(at), _) => Some(at),
        (None, Some(days)) => {
            let ttl = SignedDuration::from_hours(i64::from(days) * 24);

            Some(
                now.checked_add(ttl)
                    .map_err(|error| format!("invalid expires-in-days: {error}"))?,
            )
        }
        (None, None) => None,
    };

    match expires_at {
        Some(at) if at <= now => Err("token expiry must be in the future".to_string()),
        other => Ok(other),
    }
}
