//! Auth endpoints. A successful response starts the session.

use super::ApiClient;
use crate::errors::AppError;
use crate::models::{AuthResponse, LoginRequest, Session, SignupRequest};

impl ApiClient {
    /// POST /auth/register - Create an account and sign in with it.
    pub async fn register(&self, request: &SignupRequest) -> Result<Session, AppError> {
        request.validate().into_result()?;
        let response: AuthResponse = self.post(&["auth", "register"], request).await?;
        Ok(self.start_session(response))
    }

    /// POST /auth/login - Sign in with email and password.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, AppError> {
        request.validate().into_result()?;
        let response: AuthResponse = self.post(&["auth", "login"], request).await?;
        Ok(self.start_session(response))
    }

    /// End the session locally. The backend keeps no server-side session to revoke.
    pub fn logout(&self) {
        self.auth.logout();
    }

    fn start_session(&self, response: AuthResponse) -> Session {
        let AuthResponse { token, user } = response;
        self.auth.login(&token, user.clone());
        Session::new(token, user)
    }
}
