// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::{
    eyre::{eyre, Context},
    Result, Section,
};
use std::io::IsTerminal;

pub(crate) fn get_password_input(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(prompt).wrap_err("Failed to read the password")?;
    Ok(password.trim().into())
}

/// The given password, or one read from the terminal until it is not empty.
/// Without a terminal there is nobody to ask, so that is an error.
pub(crate) fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    if !std::io::stdin().is_terminal() {
        return Err(eyre!("No password given and stdin is not a terminal"))
            .suggestion("pass --password");
    }
    loop {
        let password = get_password_input("Enter password: ")?;
        if !password.is_empty() {
            return Ok(password);
        }
        println!("Password is required.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_password_is_used_without_prompting() -> Result<()> {
        assert_eq!(password_or_prompt(Some("hunter2".to_string()))?, "hunter2");
        Ok(())
    }
}
