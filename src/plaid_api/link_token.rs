use plaid::{model::LinkTokenCreateRequestUser, request::LinkTokenCreateRequired};

use crate::error::ProviderError;

use super::{AccessToken, Plaid};

const CLIENT_NAME: &str = "hledger-plaid";
const COUNTRY_CODES: &[&str] = &["US", "CA"];
const LANGUAGE: &str = "en";
const USER_ID: &str = "user-id";

/// Short lived token that opens Plaid Link.
#[derive(Debug, Clone)]
pub struct LinkToken(pub String);

/// Create a link token that opens Plaid Link in update mode for the item behind `access_token`,
/// so the user can log in to the bank again. The access token stays the same.
pub async fn create_update_link_token(
    client: &Plaid,
    access_token: &AccessToken,
) -> Result<LinkToken, ProviderError> {
    let response = client
        .client()
        .link_token_create(LinkTokenCreateRequired {
            client_name: CLIENT_NAME,
            country_codes: COUNTRY_CODES,
            language: LANGUAGE,
            user: LinkTokenCreateRequestUser {
                client_user_id: USER_ID.to_string(),
                ..Default::default()
            },
        })
        .access_token(access_token.get())
        .await
        .map_err(|err| ProviderError::LinkToken(err.into()))?;
    Ok(LinkToken(response.link_token))
}
