use std::net::{IpAddr, Ipv4Addr};

use anyhow::{anyhow, bail, Result};
use console::style;
use rocket::{get, response::content::RawHtml, routes, Build, Config, Rocket, Shutdown, State};
use std::sync::Mutex;

use crate::plaid_api::LinkToken;

const LISTEN_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
const LISTEN_PORT: u16 = 9090;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Updated,
    Cancelled,
}

struct ServerState {
    link_token: LinkToken,
    outcome: Mutex<Option<Outcome>>,
}

/// Serve the Plaid Link page in update mode and wait until the user went through it.
pub async fn update_in_browser(link_token: LinkToken) -> Result<()> {
    let server = server(link_token, LISTEN_PORT).ignite().await?;

    let url = format!("http://{LISTEN_ADDR}:{LISTEN_PORT}");

    eprintln!("Starting in-browser update flow.");
    eprintln!("If it doesn't open automatically, please open the following URL in your browser:");
    eprintln!("{}", style(&url).cyan().italic());
    if let Err(err) = open::that(&url) {
        log::warn!("Failed to open browser: {err}");
    }

    // start server and wait for it to shutdown
    let server = server.launch().await?;
    let outcome = server
        .state::<ServerState>()
        .ok_or_else(|| anyhow!("Server state missing"))?
        .outcome
        .lock()
        .map_err(|_| anyhow!("Server state poisoned"))?
        .take();
    match outcome {
        Some(Outcome::Updated) => Ok(()),
        Some(Outcome::Cancelled) => bail!("Update flow was cancelled in the browser"),
        None => bail!("Server shut down before the update flow completed"),
    }
}

fn server(link_token: LinkToken, port: u16) -> Rocket<Build> {
    rocket::custom(Config {
        log_level: rocket::config::LogLevel::Critical,
        address: LISTEN_ADDR,
        port,
        ..Default::default()
    })
    .manage(ServerState {
        link_token,
        outcome: Mutex::new(None),
    })
    .mount("/", routes![show_update_page, done, cancelled])
}

#[get("/")]
fn show_update_page(state: &State<ServerState>) -> RawHtml<String> {
    let link_token = &state.link_token.0;
    RawHtml(format!(
        r#"
        <html>
            <body>
                <script src="https://cdn.plaid.com/link/v2/stable/link-initialize.js"></script>
                <script>
                    var linkHandler = Plaid.create({{
                        token: '{link_token}',
                        onLoad: function() {{
                            // Open the dialog right away, there's nothing else on this page
                            linkHandler.open();
                        }},
                        onSuccess: function(public_token, metadata) {{
                            // Update mode keeps the access token, the public token isn't needed
                            window.location.replace("/done");
                        }},
                        onExit: function(err, metadata) {{
                            if (err != null) {{
                                console.log('Plaid Link error: ' + JSON.stringify(err));
                            }}
                            window.location.replace("/cancelled");
                        }}
                    }});
                </script>
            </body>
        </html>
    "#
    ))
}

#[get("/done")]
fn done(state: &State<ServerState>, shutdown: Shutdown) -> RawHtml<&'static str> {
    finish(state, shutdown, Outcome::Updated);
    RawHtml(
        r#"
        <html>
            <body>
                <h1>Success</h1>
                <p>Your bank login was updated. You can close this page now.</p>
            </body>
        </html>
    "#,
    )
}

#[get("/cancelled")]
fn cancelled(state: &State<ServerState>, shutdown: Shutdown) -> RawHtml<&'static str> {
    finish(state, shutdown, Outcome::Cancelled);
    RawHtml(
        r#"
        <html>
            <body>
                <h1>Cancelled</h1>
                <p>Nothing was updated. You can close this page now.</p>
            </body>
        </html>
    "#,
    )
}

fn finish(state: &ServerState, shutdown: Shutdown, outcome: Outcome) {
    match state.outcome.lock() {
        Ok(mut current) => *current = Some(outcome),
        Err(_) => log::error!("Server state poisoned"),
    }
    shutdown.notify();
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client};

    use super::*;

    async fn client() -> Client {
        Client::tracked(server(LinkToken("link-development-1234".to_string()), 0))
            .await
            .unwrap()
    }

    fn outcome(client: &Client) -> Option<Outcome> {
        *client
            .rocket()
            .state::<ServerState>()
            .unwrap()
            .outcome
            .lock()
            .unwrap()
    }

    #[tokio::test]
    async fn page_embeds_link_token() {
        let client = client().await;

        let response = client.get("/").dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let body = response.into_string().await.unwrap();
        assert!(body.contains("token: 'link-development-1234'"));
        assert_eq!(None, outcome(&client));
    }

    #[tokio::test]
    async fn done_records_update() {
        let client = client().await;

        let response = client.get("/done").dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(Some(Outcome::Updated), outcome(&client));
    }

    #[tokio::test]
    async fn cancelled_records_cancellation() {
        let client = client().await;

        let response = client.get("/cancelled").dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(Some(Outcome::Cancelled), outcome(&client));
    }
}
