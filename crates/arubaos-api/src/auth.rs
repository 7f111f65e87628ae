// Session login/logout
//
// `POST /login-sessions` returns the cookie to present on every later
// request; `DELETE /login-sessions` ends the session. There is no token
// refresh: an expired session surfaces as an ordinary API error.

use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

use crate::client::{LOGIN_SESSIONS, SwitchClient};
use crate::error::Error;
use crate::models::LoginSession;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Credentials<'a> {
    user_name: &'a str,
    password: &'a str,
}

impl SwitchClient {
    /// Authenticate and keep the returned session cookie.
    pub(crate) async fn login(&mut self) -> Result<(), Error> {
        debug!(host = self.config().hostname(), "logging in");

        let body = Credentials {
            user_name: self.config().username(),
            password: self.config().password().expose_secret(),
        };
        let session: LoginSession =
            self.post(LOGIN_SESSIONS, &body)
                .await
                .map_err(|e| match e {
                    Error::Api { status, message } => Error::Authentication {
                        message: format!("login rejected (HTTP {status}): {message}"),
                    },
                    other => other,
                })?;

        match session.cookie.filter(|cookie| !cookie.is_empty()) {
            Some(cookie) => {
                self.set_token(cookie);
                debug!("login successful");
                Ok(())
            }
            None => Err(Error::Authentication {
                message: "login response carried no session cookie".into(),
            }),
        }
    }

    /// End the session. The cookie is forgotten even if the request fails,
    /// so a session is only ever logged out once.
    pub(crate) async fn logout(&mut self) -> Result<(), Error> {
        if !self.is_authenticated() {
            return Ok(());
        }

        debug!(host = self.config().hostname(), "logging out");
        let result = self.delete(LOGIN_SESSIONS).await;
        self.clear_token();
        self.cache.clear_all();
        result.map(|_| ())
    }
}
