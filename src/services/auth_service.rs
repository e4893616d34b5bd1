use crate::{
    config::{GoogleOAuthSettings, JwtSettings},
    database::{collections, JsonStore},
    models::{User, UsersFile},
    utils::{ids, AppError},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id (google_<googleId>)
    pub email: String,
    pub name: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

/// Profile returned by Google's userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

pub fn issue_session_token(jwt: &JwtSettings, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(jwt.ttl_days)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: jwt.audience.clone(),
        iss: jwt.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_ref()),
    )
    .map_err(|e| AppError::ConfigError(format!("Failed to sign session token: {}", e)))
}

pub fn verify_token(jwt: &JwtSettings, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[jwt.audience.as_str()]);
    validation.set_issuer(&[jwt.issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid session: {}", e)))
}

/// Google consent page for the `openid email profile` scopes.
pub fn google_consent_url(google: &GoogleOAuthSettings, state: &str) -> Result<String, AppError> {
    let client_id = google
        .client_id
        .as_deref()
        .ok_or_else(|| AppError::ConfigError("GOOGLE_CLIENT_ID not configured".to_string()))?;

    let params = [
        ("client_id", client_id),
        ("redirect_uri", google.redirect_uri.as_str()),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("state", state),
        ("prompt", "select_account"),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!("{}?{}", GOOGLE_AUTH_URL, query_string))
}

/// Trades an authorization code for the signed-in Google profile.
pub async fn fetch_google_profile(
    google: &GoogleOAuthSettings,
    code: &str,
) -> Result<GoogleProfile, AppError> {
    let (client_id, client_secret) = match (&google.client_id, &google.client_secret) {
        (Some(id), Some(secret)) => (id, secret),
        _ => {
            return Err(AppError::ConfigError(
                "GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET not configured".to_string(),
            ))
        }
    };

    let upstream = |message: &str, e: reqwest::Error| AppError::UpstreamError {
        message: message.to_string(),
        details: e.to_string(),
    };

    let client = reqwest::Client::new();
    let token_response = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("redirect_uri", google.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| upstream("Failed to exchange authorization code", e))?;

    if !token_response.status().is_success() {
        return Err(AppError::UpstreamError {
            message: "Failed to exchange authorization code".to_string(),
            details: format!("HTTP {}", token_response.status()),
        });
    }

    let tokens: GoogleTokenResponse = token_response
        .json()
        .await
        .map_err(|e| upstream("Failed to parse token response", e))?;

    client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(&tokens.access_token)
        .send()
        .await
        .map_err(|e| upstream("Failed to get user info", e))?
        .error_for_status()
        .map_err(|e| upstream("Failed to get user info", e))?
        .json::<GoogleProfile>()
        .await
        .map_err(|e| upstream("Failed to parse user info", e))
}

/// Returning users get their last login (and Google name/picture) refreshed.
pub async fn find_or_create_user(store: &JsonStore, profile: &GoogleProfile) -> Result<User, AppError> {
    let now = ids::now_iso();

    store
        .update(collections::USERS, |file: &mut UsersFile| {
            if let Some(existing) = file.users.iter_mut().find(|u| u.google_id == profile.id) {
                existing.last_login = now.clone();
                if let Some(name) = &profile.name {
                    existing.name = name.clone();
                }
                if let Some(picture) = &profile.picture {
                    existing.picture = picture.clone();
                }
                log::info!("✅ User logged in: {}", existing.email);
                return Ok(existing.clone());
            }

            let user = User {
                id: format!("google_{}", profile.id),
                google_id: profile.id.clone(),
                email: profile.email.clone(),
                name: profile.name.clone().unwrap_or_default(),
                picture: profile.picture.clone().unwrap_or_default(),
                created_at: now.clone(),
                last_login: now.clone(),
            };
            log::info!("✅ Created new user: {}", user.email);
            file.users.push(user.clone());
            Ok(user)
        })
        .await
}

pub async fn find_user(store: &JsonStore, user_id: &str) -> Option<User> {
    let file: UsersFile = store.read(collections::USERS).await;
    file.users.into_iter().find(|u| u.id == user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtSettings {
        JwtSettings {
            secret: "test-secret".into(),
            issuer: "feed-mockup-service".into(),
            audience: "feed-mockup-web".into(),
            ttl_days: 30,
        }
    }

    fn profile(id: &str, name: &str) -> GoogleProfile {
        GoogleProfile {
            id: id.into(),
            email: format!("{}@example.com", id),
            name: Some(name.into()),
            picture: None,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = User {
            id: "google_1".into(),
            google_id: "1".into(),
            email: "a@b.co".into(),
            name: "Ana".into(),
            picture: String::new(),
            created_at: ids::now_iso(),
            last_login: ids::now_iso(),
        };

        let token = issue_session_token(&jwt(), &user).unwrap();
        let claims = verify_token(&jwt(), &token).unwrap();
        assert_eq!(claims.sub, "google_1");
        assert_eq!(claims.email, "a@b.co");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let user = User {
            id: "google_1".into(),
            google_id: "1".into(),
            email: "a@b.co".into(),
            name: String::new(),
            picture: String::new(),
            created_at: String::new(),
            last_login: String::new(),
        };
        let mut other = jwt();
        other.secret = "another".into();

        let token = issue_session_token(&other, &user).unwrap();
        assert!(matches!(verify_token(&jwt(), &token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_consent_url_requires_client_id() {
        let mut google = GoogleOAuthSettings {
            client_id: None,
            client_secret: None,
            redirect_uri: "http://localhost:3001/auth/google/callback".into(),
        };
        assert!(google_consent_url(&google, "s").is_err());

        google.client_id = Some("abc.apps.googleusercontent.com".into());
        let url = google_consent_url(&google, "state-1").unwrap();
        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("state=state-1"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3001%2Fauth%2Fgoogle%2Fcallback"));
    }

    #[tokio::test]
    async fn test_find_or_create_user_reuses_account() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let first = find_or_create_user(&store, &profile("42", "Ana")).await.unwrap();
        assert_eq!(first.id, "google_42");

        let again = find_or_create_user(&store, &profile("42", "Ana Maria")).await.unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.created_at, first.created_at);
        assert_eq!(again.name, "Ana Maria");

        let file: UsersFile = store.read(collections::USERS).await;
        assert_eq!(file.users.len(), 1);
        assert_eq!(find_user(&store, "google_42").await.unwrap().email, "42@example.com");
        assert!(find_user(&store, "google_7").await.is_none());
    }
}
