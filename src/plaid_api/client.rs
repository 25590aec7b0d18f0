use plaid::{PlaidAuth, PlaidClient};

use crate::config::PlaidCredentials;

const PLAID_VERSION: &str = "2020-09-14";

pub struct Plaid {
    client: PlaidClient,
}

impl Plaid {
    /// The Plaid environment (sandbox, development, production) is picked from `PLAID_ENV`.
    pub fn new(credentials: &PlaidCredentials) -> Plaid {
        Plaid {
            client: PlaidClient::with_auth(PlaidAuth::ClientId {
                client_id: credentials.client_id.clone(),
                secret: credentials.secret.clone(),
                plaid_version: PLAID_VERSION.to_string(),
            }),
        }
    }

    pub(super) fn client(&self) -> &PlaidClient {
        &self.client
    }
}
