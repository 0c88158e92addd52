//! Service sketch: authenticate a user with a short-circuiting chain.
//!
//! Every way the login can end — success, unknown email, archived
//! account, provider trouble — is one variant of `LoginResponse`, and
//! each step either passes a value forward or seals the chain with the
//! response it has already decided on.

use std::collections::HashMap;
use std::rc::Rc;

use sealway::{Direct, Sealed};
use thiserror::Error;

#[derive(Debug, PartialEq)]
enum LoginResponse {
    LoggedIn(String),
    InvalidCredentials,
    Deleted,
    ProviderAuthFailed,
}

#[derive(Debug, Error)]
enum ProviderError {
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone)]
struct User {
    id: u64,
    archived: bool,
}

struct UserStore {
    users: HashMap<String, User>,
}

fn provider_handshake(email: &str) -> Result<String, ProviderError> {
    if email.ends_with("@example.com") {
        Ok(format!("session-for-{email}"))
    } else {
        Err(ProviderError::Unavailable("unknown tenant".to_string()))
    }
}

fn login(store: Rc<UserStore>, email: &str) -> LoginResponse {
    let email = email.to_string();
    let handshake_email = email.clone();
    let lookup = move || store.users.get(&email).cloned();

    Sealed::<Direct, String, LoginResponse>::merge_either(
        move || provider_handshake(&handshake_email),
        |_err| LoginResponse::ProviderAuthFailed,
    )
    .flat_map(move |session| {
        Sealed::value_or(lookup, LoginResponse::InvalidCredentials)
            .map(move |user| (session, user))
    })
    .ensure(|(_, user)| !user.archived, LoginResponse::Deleted)
    .tap(|(_, user)| println!("authenticating user {}", user.id))
    .complete(|(session, user)| LoginResponse::LoggedIn(format!("{session}/token-{}", user.id)))
    .run()
}

fn main() {
    let store = Rc::new(UserStore {
        users: HashMap::from([
            (
                "ada@example.com".to_string(),
                User {
                    id: 1,
                    archived: false,
                },
            ),
            (
                "gone@example.com".to_string(),
                User {
                    id: 2,
                    archived: true,
                },
            ),
        ]),
    });

    for email in [
        "ada@example.com",
        "gone@example.com",
        "nobody@example.com",
        "ada@elsewhere.net",
    ] {
        let response = login(Rc::clone(&store), email);
        println!("{email} -> {response:?}");
    }
}
