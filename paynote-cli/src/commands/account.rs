// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::access::{input::password_or_prompt, session::session_store};
use color_eyre::{eyre::Context, Result, Section};
use paynote::{
    api::{LoginRequest, RegisterRequest},
    AuthSession, Client,
};

pub async fn register(
    client: &Client,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let request = RegisterRequest {
        username,
        email,
        password: password_or_prompt(password)?,
    };
    let user = client
        .users()
        .register(&request)
        .await
        .wrap_err("Failed to register")?;

    println!("✅ Registered {} with user id {}", user.username, user.id);
    println!("Log in with `paynote account login {}`", user.email);
    Ok(())
}

pub async fn login(client: &Client, email: String, password: Option<String>) -> Result<()> {
    let request = LoginRequest {
        email,
        password: password_or_prompt(password)?,
    };
    let response = client
        .users()
        .login(&request)
        .await
        .wrap_err("Failed to log in")
        .with_suggestion(|| "check your email and password")?;
    let session = AuthSession::try_from(response)?;

    let store = session_store()?;
    store.save(&session)?;
    info!("Stored session for user {} at {:?}", session.id, store.path());
    println!("✅ Logged in as {} (user id {})", session.username, session.id);
    Ok(())
}

pub fn logout() -> Result<()> {
    session_store()?.clear()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami() -> Result<()> {
    match session_store()?.load()? {
        Some(session) => {
            println!("User id: {}", session.id);
            println!("Username: {}", session.username);
            println!("Email: {}", session.email);
        }
        None => println!("Not logged in"),
    }
    Ok(())
}
