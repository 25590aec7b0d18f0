mod access_token;
mod client;
mod link_token;
mod transactions;

pub use access_token::AccessToken;
pub use client::Plaid;
pub use link_token::{create_update_link_token, LinkToken};
