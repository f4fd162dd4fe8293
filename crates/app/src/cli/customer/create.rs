use clap::Args;
use storefront_app::{
    auth::PgAuthService,
    database::Db,
    domain::customers::{
        CustomersService, PgCustomersService,
        models::{CustomerUuid, NewCustomer},
    },
};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateCustomerArgs {
    /// Customer display name
    #[arg(long)]
    name: String,

    /// Customer email address
    #[arg(long)]
    email: String,

    /// Grant access to the administrative endpoints
    #[arg(long)]
    staff: bool,

    #[command(flatten)]
    database: DatabaseArgs,

    /// Optional customer UUID; generated when omitted
    #[arg(long)]
    customer_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateCustomerArgs) -> Result<(), String> {
    let pool = args.database.connect().await?;

    let service = PgCustomersService::new(Db::new(pool.clone()));
    let customer_uuid = args
        .customer_uuid
        .map_or_else(CustomerUuid::new, CustomerUuid::from_uuid);

    let customer = service
        .create_customer(NewCustomer {
            uuid: customer_uuid,
            name: args.name,
            email: args.email,
            phone: String::new(),
            tax_id: String::new(),
            is_staff: args.staff,
        })
        .await
        .map_err(|error| format!("failed to create customer: {error}"))?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(customer.uuid, None)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("customer_uuid: {}", customer.uuid);
    println!("customer_email: {}", customer.email);
    println!("customer_is_staff: {}", customer.is_staff);
    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
