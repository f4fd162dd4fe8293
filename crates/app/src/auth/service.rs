//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, NewApiToken,
        Principal, TokenRejection, build_verifier_input, format_api_token, generate_api_token_secret,
        hash_verifier, parse_api_token, repository::PgAuthRepository, verify_verifier,
    },
    domain::customers::models::CustomerUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given customer.
    ///
    /// # Errors
    ///
    /// Returns an error if database insertion fails, including an unknown customer.
    pub async fn issue_api_token(
        &self,
        customer_uuid: CustomerUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let verifier_input = build_verifier_input(&token_uuid, version, &customer_uuid, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                customer_uuid,
                version,
                token_hash: hash_verifier(&verifier_input),
                expires_at,
            })
            .await
            .map_err(AuthServiceError::from)?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        customer_uuid: CustomerUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_customer(customer_uuid.into_uuid())
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token)
            .map_err(|_error| AuthServiceError::Rejected(TokenRejection::Malformed))?;

        let token = self
            .repository
            .find_active_api_token(parsed_token.token_uuid, parsed_token.version)
            .await
            .map_err(AuthServiceError::from)?
            .ok_or(AuthServiceError::Rejected(TokenRejection::Unknown))?;

        let verifier_input = build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.customer_uuid,
            &parsed_token.secret,
        );

        if !verify_verifier(&verifier_input, &token.token_hash) {
            return Err(AuthServiceError::Rejected(TokenRejection::SecretMismatch));
        }

        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed_token.token_uuid)
            .await
        {
            debug!(%error, "failed to record token use");
        }

        Ok(Principal {
            customer_uuid: token.customer_uuid,
            is_staff: token.is_staff,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the customer it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers};

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_its_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let issued = ctx.auth.issue_api_token(customer.uuid, None).await?;

        let principal = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(principal.customer_uuid, customer.uuid);
        assert!(!principal.is_staff);

        let tokens = ctx.auth.list_api_tokens(customer.uuid).await?;

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].last_used_at.is_some(), "use should be recorded");

        Ok(())
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let issued = ctx.auth.issue_api_token(customer.uuid, None).await?;

        let mut tampered = issued.token.clone();
        let last = if tampered.ends_with('0') { '1' } else { '0' };
        tampered.pop();
        tampered.push(last);

        let result = ctx.auth.authenticate_bearer(&tampered).await;

        assert!(
            matches!(
                result,
                Err(AuthServiceError::Rejected(TokenRejection::SecretMismatch))
            ),
            "expected SecretMismatch rejection, got {result:?}"
        );

        let result = ctx.auth.authenticate_bearer("garbage").await;

        assert!(
            matches!(
                result,
                Err(AuthServiceError::Rejected(TokenRejection::Malformed))
            ),
            "expected Malformed rejection, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let issued = ctx.auth.issue_api_token(customer.uuid, None).await?;

        assert!(ctx.auth.revoke_api_token(issued.metadata.uuid).await?);
        assert!(!ctx.auth.revoke_api_token(issued.metadata.uuid).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(
                result,
                Err(AuthServiceError::Rejected(TokenRejection::Unknown))
            ),
            "expected Unknown rejection, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let issued = ctx
            .auth
            .issue_api_token(customer.uuid, Some(Timestamp::now().checked_sub(1.hour())?))
            .await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(
                result,
                Err(AuthServiceError::Rejected(TokenRejection::Unknown))
            ),
            "expected Unknown rejection, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn staff_flag_is_carried_on_the_principal() -> TestResult {
        let ctx = TestContext::new().await;
        let staff = helpers::create_staff(&ctx, "staff@example.com").await?;

        let issued = ctx.auth.issue_api_token(staff.uuid, None).await?;

        assert!(ctx.auth.authenticate_bearer(&issued.token).await?.is_staff);

        Ok(())
    }
}
