use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, AuthorizationCode, ClientId,
    ClientSecret, CsrfToken, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    pub verified_email: bool,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    pub picture: String,
}

/// What sign-in hands to the session layer: just enough identity to
/// resolve a console role by email.
#[derive(Debug, Clone)]
pub struct OAuthUserInfo {
    pub email: String,
    pub name: String,
}

impl From<GoogleUserInfo> for OAuthUserInfo {
    fn from(google_user: GoogleUserInfo) -> Self {
        Self {
            email: google_user.email,
            name: google_user.name,
        }
    }
}

#[derive(Clone)]
pub struct OAuthService {
    config: AuthConfig,
    http_client: HttpClient,
}

impl OAuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            http_client: HttpClient::new(),
        }
    }

    pub fn get_authorize_url(&self) -> Result<(String, String), AppError> {
        let client = self.create_oauth_client()?;
        let (auth_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid email profile".to_string()))
            .url();

        Ok((auth_url.to_string(), csrf_token.secret().clone()))
    }

    pub async fn exchange_code_for_user_info(
        &self,
        code: String,
    ) -> Result<OAuthUserInfo, AppError> {
        let client = self.create_oauth_client()?;

        let token = client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await
            .map_err(|e| AppError::Internal(format!("Token exchange failed: {e}")))?;

        let user_info = self
            .get_google_user_info(token.access_token().secret())
            .await?;
        Ok(user_info.into())
    }

    fn create_oauth_client(&self) -> Result<BasicClient, AppError> {
        let redirect_url = format!("{}/api/auth/google/callback", self.config.redirect_base_url);

        let client = BasicClient::new(
            ClientId::new(self.config.google_client_id.clone()),
            Some(ClientSecret::new(self.config.google_client_secret.clone())),
            AuthUrl::new("https://accounts.google.com/o/oauth2/v2/auth".to_string())
                .map_err(|e| AppError::Internal(format!("Invalid auth URL: {e}")))?,
            Some(
                TokenUrl::new("https://www.googleapis.com/oauth2/v4/token".to_string())
                    .map_err(|e| AppError::Internal(format!("Invalid token URL: {e}")))?,
            ),
        )
        .set_redirect_uri(
            RedirectUrl::new(redirect_url)
                .map_err(|e| AppError::Internal(format!("Invalid redirect URL: {e}")))?,
        );

        Ok(client)
    }

    async fn get_google_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let url = "https://www.googleapis.com/oauth2/v2/userinfo";
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch user info: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Failed to fetch user info: {}",
                response.status()
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse user info: {e}")))
    }
}
