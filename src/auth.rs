use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ROLE_ADMIN: &str = "admin";

/// Claims carried by the HS256 tokens the booking system mints. The secret,
/// issuer and audience must match what the upstream Laravel app signs with.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
}

pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let verifier = parts
            .extensions
            .get::<Arc<JwtVerifier>>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Token verifier is not configured",
                )
                    .into_response()
            })?;

        let token = bearer_token(parts).ok_or_else(unauthorized)?;

        match verifier.verify(token) {
            Ok(claims) => Ok(Self {
                user_id: claims.sub,
                email: claims.email,
                role: claims.role,
            }),
            Err(e) => {
                warn!("Failed to validate bearer token due to: {}", e);
                Err(unauthorized())
            }
        }
    }
}

/// Authenticated user holding the admin role, for the analytics endpoints.
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if user.role.as_deref() == Some(ROLE_ADMIN) {
            Ok(Self(user))
        } else {
            Err((StatusCode::FORBIDDEN, "Administrator role required").into_response())
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, "Bearer")],
        "Invalid or expired token",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "travelink-laravel";
    const AUDIENCE: &str = "travelink-api";

    fn make_token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn admin_claims(exp_offset_secs: i64) -> Claims {
        Claims {
            sub: "42".to_string(),
            email: Some("admin@example.com".to_string()),
            role: Some(ROLE_ADMIN.to_string()),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            exp: (OffsetDateTime::now_utc().unix_timestamp() + exp_offset_secs) as usize,
        }
    }

    #[test]
    fn accepts_a_valid_token() {
        let verifier = JwtVerifier::new(SECRET, ISSUER, AUDIENCE);
        let token = make_token(&admin_claims(3600), SECRET);

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role.as_deref(), Some(ROLE_ADMIN));
        assert_eq!(claims.email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn rejects_an_expired_token() {
        let verifier = JwtVerifier::new(SECRET, ISSUER, AUDIENCE);
        let token = make_token(&admin_claims(-3600), SECRET);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_a_token_for_another_audience() {
        let verifier = JwtVerifier::new(SECRET, ISSUER, "some-other-api");
        let token = make_token(&admin_claims(3600), SECRET);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        let verifier = JwtVerifier::new(SECRET, ISSUER, AUDIENCE);
        let token = make_token(&admin_claims(3600), "not-the-secret");

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_garbage_tokens() {
        let verifier = JwtVerifier::new(SECRET, ISSUER, AUDIENCE);

        assert!(verifier.verify("not.a.jwt").is_err());
        assert!(verifier.verify("").is_err());
    }

    mod extractors {
        use super::*;
        use axum::body::Body;
        use axum::http::Request;
        use axum::routing::get;
        use axum::{Extension, Router};
        use tower::ServiceExt;

        async fn protected(AdminUser(_admin): AdminUser) -> StatusCode {
            StatusCode::OK
        }

        fn protected_router() -> Router {
            Router::new()
                .route("/protected", get(protected))
                .layer(Extension(Arc::new(JwtVerifier::new(
                    SECRET, ISSUER, AUDIENCE,
                ))))
        }

        fn request(token: Option<&str>) -> Request<Body> {
            let builder = Request::builder().uri("/protected");
            let builder = match token {
                Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
                None => builder,
            };
            builder.body(Body::empty()).unwrap()
        }

        #[tokio::test]
        async fn missing_token_is_unauthorized() {
            let response = protected_router().oneshot(request(None)).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }

        #[tokio::test]
        async fn non_admin_token_is_forbidden() {
            let mut claims = admin_claims(3600);
            claims.role = Some("client".to_string());
            let token = make_token(&claims, SECRET);

            let response = protected_router()
                .oneshot(request(Some(&token)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        #[tokio::test]
        async fn admin_token_is_accepted() {
            let token = make_token(&admin_claims(3600), SECRET);

            let response = protected_router()
                .oneshot(request(Some(&token)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
