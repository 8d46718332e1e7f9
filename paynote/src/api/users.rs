// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{read_json, Backend, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A user as listed or returned on registration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "userId", alias = "user_id")]
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: Option<String>,
}

/// Successful login. The user id shows up under different names depending on the endpoint.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default, rename = "userId")]
    user_id_camel: Option<u64>,
    #[serde(default, rename = "user_id")]
    user_id_snake: Option<u64>,
    pub username: String,
    pub email: String,
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// `id`, then `userId`, then `user_id`.
    pub fn user_id(&self) -> Option<u64> {
        self.id.or(self.user_id_camel).or(self.user_id_snake)
    }
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user_id", &self.user_id())
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// `/users` over HTTP.
#[derive(Clone, Debug)]
pub struct UsersClient {
    backend: Backend,
}

impl UsersClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            backend: Backend::new(base_url)?,
        })
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserRecord> {
        let url = self.backend.url("users/register")?;
        let response = self.backend.http().post(url).json(request).send().await?;
        let user: UserRecord = read_json(response).await?;
        info!("Registered user {} as {}", user.id, user.username);
        Ok(user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let url = self.backend.url("users/login")?;
        let response = self.backend.http().post(url).json(request).send().await?;
        let login: LoginResponse = read_json(response).await?;
        if login.user_id().is_none() {
            return Err(Error::MissingField("a user id"));
        }
        info!("Logged in as {}", login.username);
        Ok(login)
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        let url = self.backend.url("users")?;
        let response = self.backend.http().get(url).send().await?;
        read_json(response).await
    }

    pub fn base_url(&self) -> &str {
        self.backend.base_url().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn login_user_id_under_any_name() -> serde_json::Result<()> {
        for (field, id) in [("id", 1), ("userId", 2), ("user_id", 3)] {
            let response: LoginResponse = serde_json::from_value(json!({
                field: id,
                "username": "ada",
                "email": "ada@example.com",
            }))?;
            assert_eq!(response.user_id(), Some(id));
        }
        Ok(())
    }

    #[test]
    fn debug_output_hides_secrets() {
        let request = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn login_posts_credentials() -> eyre::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .and(body_json(json!({ "email": "ada@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": 9,
                "username": "ada",
                "email": "ada@example.com",
                "avatarUrl": null,
                "token": "tok",
            })))
            .mount(&server)
            .await;

        let client = UsersClient::new(&server.uri())?;
        let login = client
            .login(&LoginRequest {
                email: "ada@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await?;
        assert_eq!(login.user_id(), Some(9));
        assert_eq!(login.token.as_deref(), Some("tok"));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_keeps_backend_message() -> eyre::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid email or password."))
            .mount(&server)
            .await;

        let client = UsersClient::new(&server.uri())?;
        let result = client
            .login(&LoginRequest {
                email: "ada@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert_matches!(&result, Err(err) if err.is_unauthorized());
        assert_matches!(result, Err(Error::Status { body, .. }) if body == "Invalid email or password.");
        Ok(())
    }
}
