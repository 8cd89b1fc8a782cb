use std::time::Duration;
use tracing::{debug, info};

use super::types::TokenResponse;
use crate::error::{BridgeError, Result};

pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

const TOKEN_TIMEOUT: Duration = Duration::from_secs(15);

/// Client-credentials grant against the identity platform
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub authority: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        )
    }

    pub async fn acquire_token(&self) -> Result<String> {
        let token_url = self.token_url();
        info!("Acquiring Graph access token for tenant {}", self.tenant_id);

        let client = reqwest::Client::new();

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
        ];

        let response = match tokio::time::timeout(
            TOKEN_TIMEOUT,
            client.post(&token_url).form(&params).send(),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                return Err(BridgeError::Authentication(format!("Token request failed: {}", e)));
            }
            Err(_) => {
                return Err(BridgeError::Authentication(
                    "Token request timed out after 15 seconds".to_string(),
                ));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BridgeError::Authentication(format!(
                "Token request failed: {} - {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::Authentication(format!("Unreadable token response: {}", e)))?;

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!("Token acquired, expires in {:?}s", token.expires_in);
                Ok(access_token)
            }
            _ => Err(BridgeError::Authentication(
                "Failed to acquire access token".to_string(),
            )),
        }
    }
}
