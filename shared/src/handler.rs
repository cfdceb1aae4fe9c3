use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    AuthError, AuthResult, ConfirmSignUpRequest, IdentityProvider, SignInRequest, SignUpRequest,
};

const INVALID_BODY: &str = "Invalid request body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignUp,
    SignIn,
    ConfirmSignUp,
}

impl Route {
    /// Exact match on the proxy path; the HTTP method is not inspected
    pub fn from_path(path: &str) -> AuthResult<Self> {
        match path {
            "/signup" => Ok(Route::SignUp),
            "/signin" => Ok(Route::SignIn),
            "/confirm-signup" => Ok(Route::ConfirmSignUp),
            other => Err(AuthError::RouteNotFound(other.to_string())),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::SignUp => "/signup",
            Route::SignIn => "/signin",
            Route::ConfirmSignUp => "/confirm-signup",
        }
    }
}

/// Status and body produced for one request, before it is shaped into a proxy response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: String,
    pub content_type: &'static str,
}

impl HandlerResponse {
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/plain",
        }
    }

    pub fn json(status: StatusCode, body: String) -> Self {
        Self {
            status,
            body,
            content_type: "application/json",
        }
    }

    pub fn into_proxy_response(self) -> ApiGatewayProxyResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));

        ApiGatewayProxyResponse {
            status_code: i64::from(self.status.as_u16()),
            headers,
            body: Some(Body::Text(self.body)),
            ..Default::default()
        }
    }
}

/// Routes API Gateway proxy requests to the identity provider
pub struct AuthHandler {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthHandler {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, request: &ApiGatewayProxyRequest) -> ApiGatewayProxyResponse {
        let path = request.path.as_deref().unwrap_or_default();
        let body = request.body.as_deref().unwrap_or_default();

        self.dispatch(path, body).await.into_proxy_response()
    }

    pub async fn dispatch(&self, path: &str, body: &str) -> HandlerResponse {
        let route = match Route::from_path(path) {
            Ok(route) => route,
            Err(e) => {
                warn!("{}", e);
                return HandlerResponse::text(StatusCode::NOT_FOUND, "Not Found");
            }
        };

        info!("Handling {}", route.path());

        match route {
            Route::SignUp => self.sign_up(body).await,
            Route::SignIn => self.sign_in(body).await,
            Route::ConfirmSignUp => self.confirm_sign_up(body).await,
        }
    }

    async fn sign_up(&self, body: &str) -> HandlerResponse {
        let request: SignUpRequest = match decode_body(body) {
            Ok(request) => request,
            Err(e) => return bad_request(e),
        };

        match self.provider.sign_up(&request.email, &request.password).await {
            Ok(()) => {
                info!("Signed up user: {}", request.email);
                HandlerResponse::text(StatusCode::CREATED, "User signed up successfully!")
            }
            Err(e) => {
                error!("Sign-up failed for {}: {}", request.email, e);
                HandlerResponse::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("failed to sign up user: {}", e),
                )
            }
        }
    }

    async fn sign_in(&self, body: &str) -> HandlerResponse {
        let request: SignInRequest = match decode_body(body) {
            Ok(request) => request,
            Err(e) => return bad_request(e),
        };

        let outcome = match self.provider.sign_in(&request.email, &request.password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Sign-in failed for {}: {}", request.email, e);
                return HandlerResponse::text(
                    StatusCode::UNAUTHORIZED,
                    format!("failed to sign in user: {}", e),
                );
            }
        };

        match serde_json::to_string(&outcome).map_err(AuthError::from) {
            Ok(payload) => {
                info!("Signed in user: {}", request.email);
                HandlerResponse::json(StatusCode::OK, payload)
            }
            Err(e) => {
                error!("Failed to serialize sign-in result: {}", e);
                HandlerResponse::text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }

    async fn confirm_sign_up(&self, body: &str) -> HandlerResponse {
        let request: ConfirmSignUpRequest = match decode_body(body) {
            Ok(request) => request,
            Err(e) => return bad_request(e),
        };

        match self.provider.confirm_sign_up(&request.email, &request.code).await {
            Ok(()) => {
                info!("Confirmed user: {}", request.email);
                HandlerResponse::text(StatusCode::OK, "User confirmed successfully!")
            }
            Err(e) => {
                error!("Confirmation failed for {}: {}", request.email, e);
                HandlerResponse::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("failed to confirm sign-up: {}", e),
                )
            }
        }
    }
}

/// A `null` body decodes to an empty request; only unparseable JSON is rejected
fn decode_body<T: DeserializeOwned + Default>(body: &str) -> AuthResult<T> {
    serde_json::from_str::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| AuthError::ValidationError(e.to_string()))
}

fn bad_request(err: AuthError) -> HandlerResponse {
    warn!("Rejecting request: {}", err);
    HandlerResponse::text(StatusCode::BAD_REQUEST, INVALID_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockIdentityProvider;
    use crate::{AuthenticationOutcome, AuthenticationTokens};

    fn handler_with(mock: MockIdentityProvider) -> AuthHandler {
        AuthHandler::new(Arc::new(mock))
    }

    fn token_outcome() -> AuthenticationOutcome {
        AuthenticationOutcome {
            authentication_result: Some(AuthenticationTokens {
                access_token: Some("access-token".to_string()),
                expires_in: 3600,
                id_token: Some("id-token".to_string()),
                refresh_token: Some("refresh-token".to_string()),
                token_type: Some("Bearer".to_string()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/signup").unwrap(), Route::SignUp);
        assert_eq!(Route::from_path("/signin").unwrap(), Route::SignIn);
        assert_eq!(Route::from_path("/confirm-signup").unwrap(), Route::ConfirmSignUp);
        assert!(matches!(Route::from_path("/signup/"), Err(AuthError::RouteNotFound(_))));
        assert!(matches!(Route::from_path(""), Err(AuthError::RouteNotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request_on_every_route() {
        for path in ["/signup", "/signin", "/confirm-signup"] {
            // No expectations set: the provider must never be called
            let handler = handler_with(MockIdentityProvider::new());

            for body in ["", "not json", "42", r#"{"email":1,"password":2}"#] {
                let response = handler.dispatch(path, body).await;
                assert_eq!(response.status, StatusCode::BAD_REQUEST, "{} with {:?}", path, body);
                assert_eq!(response.body, INVALID_BODY);
            }
        }
    }

    #[tokio::test]
    async fn test_loosely_shaped_bodies_reach_the_provider() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_up()
            .withf(|email: &str, password: &str| email == "a@b.co" && password.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));
        mock.expect_sign_up()
            .withf(|email: &str, password: &str| email.is_empty() && password.is_empty())
            .times(1)
            .returning(|_, _| {
                Err(AuthError::IdentityProvider(
                    "InvalidParameterException: Username cannot be empty".to_string(),
                ))
            });
        mock.expect_sign_up()
            .withf(|email: &str, password: &str| email == "a@b.co" && password == "Passw0rdX")
            .times(1)
            .returning(|_, _| Ok(()));
        let handler = handler_with(mock);

        let response = handler.dispatch("/signup", r#"{"email":"a@b.co"}"#).await;
        assert_eq!(response.status, StatusCode::CREATED);

        let response = handler.dispatch("/signup", "null").await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.contains("Username cannot be empty"));

        let response = handler
            .dispatch("/signup", r#"{"Email":"a@b.co","Password":"Passw0rdX"}"#)
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_signup_success_is_created() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_up()
            .withf(|email: &str, password: &str| email == "user@example.com" && password == "Passw0rdX")
            .times(1)
            .returning(|_, _| Ok(()));

        let response = handler_with(mock)
            .dispatch("/signup", r#"{"email":"user@example.com","password":"Passw0rdX"}"#)
            .await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, "User signed up successfully!");
    }

    #[tokio::test]
    async fn test_signup_provider_failure_is_internal_error() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_up().times(1).returning(|_, _| {
            Err(AuthError::IdentityProvider(
                "UsernameExistsException: User already exists".to_string(),
            ))
        });

        let response = handler_with(mock)
            .dispatch("/signup", r#"{"email":"user@example.com","password":"Passw0rdX"}"#)
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body,
            "failed to sign up user: UsernameExistsException: User already exists"
        );
    }

    #[tokio::test]
    async fn test_signin_success_returns_serialized_tokens() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_in()
            .withf(|email: &str, password: &str| email == "user@example.com" && password == "Passw0rdX")
            .times(1)
            .returning(|_, _| Ok(token_outcome()));

        let response = handler_with(mock)
            .dispatch("/signin", r#"{"email":"user@example.com","password":"Passw0rdX"}"#)
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type, "application/json");

        let payload: AuthenticationOutcome = serde_json::from_str(&response.body).unwrap();
        assert_eq!(payload, token_outcome());

        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(json["AuthenticationResult"]["AccessToken"], "access-token");
    }

    #[tokio::test]
    async fn test_signin_provider_failure_is_unauthorized() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_in().times(1).returning(|_, _| {
            Err(AuthError::IdentityProvider(
                "NotAuthorizedException: Incorrect username or password.".to_string(),
            ))
        });

        let response = handler_with(mock)
            .dispatch("/signin", r#"{"email":"user@example.com","password":"wrong"}"#)
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response
            .body
            .contains("NotAuthorizedException: Incorrect username or password."));
    }

    #[tokio::test]
    async fn test_confirm_signup_success_is_ok() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_confirm_sign_up()
            .withf(|email: &str, code: &str| email == "user@example.com" && code == "123456")
            .times(1)
            .returning(|_, _| Ok(()));

        let response = handler_with(mock)
            .dispatch("/confirm-signup", r#"{"email":"user@example.com","code":"123456"}"#)
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "User confirmed successfully!");
    }

    #[tokio::test]
    async fn test_confirm_signup_provider_failure_is_internal_error() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_confirm_sign_up().times(1).returning(|_, _| {
            Err(AuthError::IdentityProvider(
                "CodeMismatchException: Invalid verification code provided".to_string(),
            ))
        });

        let response = handler_with(mock)
            .dispatch("/confirm-signup", r#"{"email":"user@example.com","code":"000000"}"#)
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response
            .body
            .contains("CodeMismatchException: Invalid verification code provided"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found_regardless_of_body() {
        let handler = handler_with(MockIdentityProvider::new());

        for path in ["/", "/login", "/SIGNUP", "/signup/extra"] {
            let response = handler
                .dispatch(path, r#"{"email":"user@example.com","password":"Passw0rdX"}"#)
                .await;
            assert_eq!(response.status, StatusCode::NOT_FOUND);
            assert_eq!(response.body, "Not Found");
        }
    }

    #[tokio::test]
    async fn test_handle_shapes_proxy_response() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_up().times(1).returning(|_, _| Ok(()));
        let handler = handler_with(mock);

        let request = ApiGatewayProxyRequest {
            path: Some("/signup".to_string()),
            body: Some(r#"{"email":"user@example.com","password":"Passw0rdX"}"#.to_string()),
            ..Default::default()
        };
        let response = handler.handle(&request).await;

        assert_eq!(response.status_code, 201);
        assert_eq!(
            response.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/plain")
        );
        match response.body {
            Some(Body::Text(text)) => assert_eq!(text, "User signed up successfully!"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handle_missing_path_and_body() {
        let handler = handler_with(MockIdentityProvider::new());

        let response = handler.handle(&ApiGatewayProxyRequest::default()).await;
        assert_eq!(response.status_code, 404);

        let request = ApiGatewayProxyRequest {
            path: Some("/signin".to_string()),
            body: None,
            ..Default::default()
        };
        let response = handler.handle(&request).await;
        assert_eq!(response.status_code, 400);
    }
}
