use calendar_scheduler::components::google_calendar::token::{
    AuthorizedUser, TokenGrant, TokenManager, CALENDAR_SCOPE, TOKEN_URI,
};
use calendar_scheduler::config::Config;
use calendar_scheduler::error::{config_error, other_error, ServiceResult};
use chrono::Utc;
use serde_json::Map;
use url::Url;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const REDIRECT_URI: &str = "http://localhost:8080";
const LISTEN_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> miette::Result<()> {
    run().await?;
    Ok(())
}

async fn run() -> ServiceResult<()> {
    // Load configuration
    let config = Config::load()?;

    let client_id = config
        .google_client_id
        .clone()
        .ok_or_else(|| config_error("GOOGLE_CLIENT_ID is required to authorize"))?;
    let client_secret = config
        .google_client_secret
        .clone()
        .ok_or_else(|| config_error("GOOGLE_CLIENT_SECRET is required to authorize"))?;

    let token_manager = TokenManager::new(&config.google_token_file);

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let mut auth_url =
        Url::parse(AUTH_URL).map_err(|e| other_error(&format!("Invalid auth URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &client_id)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", CALENDAR_SCOPE)
        .append_pair("state", &state);

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser. Visit this URL manually:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http(LISTEN_ADDR)
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback = Url::parse(REDIRECT_URI)
        .and_then(|base| base.join(request.url()))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(state.as_str()) {
        request.respond(tiny_http::Response::from_string("Authorization state mismatch."))?;
        return Err(other_error("State in callback does not match the request"));
    }

    let code = match param("code") {
        Some(code) => code,
        None => {
            request.respond(tiny_http::Response::from_string("Authorization was not granted."))?;
            let reason = param("error").unwrap_or_else(|| "no code in callback".to_string());
            return Err(other_error(&format!("No authorization code: {}", reason)));
        }
    };

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let response = client
        .post(TOKEN_URI)
        .form(&[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| other_error(&format!("Failed to exchange code: {}", e)))?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let grant: TokenGrant = response
        .json()
        .await
        .map_err(|e| other_error(&format!("Failed to parse token response: {}", e)))?;

    let refresh_token = grant
        .refresh_token
        .clone()
        .ok_or_else(|| other_error("Token response did not include a refresh token"))?;

    let mut credentials = AuthorizedUser {
        token: None,
        refresh_token,
        client_id,
        client_secret,
        expiry: None,
        token_uri: Some(TOKEN_URI.to_string()),
        extra: Map::new(),
    };
    credentials.apply_grant(grant, Utc::now());

    token_manager.save(&credentials).await?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!(
        "Token successfully saved to {}!",
        token_manager.path().display()
    );

    Ok(())
}
