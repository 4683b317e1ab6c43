use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{PublicUser, SignupRequest},
        repo_types::NewUser,
    },
    error::AppError,
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;

/// A freshly issued token together with the user it was issued for.
#[derive(Debug)]
pub struct Authenticated {
    pub token: String,
    pub user: PublicUser,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
                .unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<Authenticated, AppError> {
    let email = normalize_email(email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::not_found(
            "User does not exist, please sign up first",
        ));
    };

    let ok = state
        .passwords
        .verify(password.to_owned(), user.password_hash.clone())
        .await
        .map_err(AppError::fault)?;
    if !ok {
        warn!(user_id = user.id, "login wrong password");
        return Err(AppError::unauthorized("Wrong password"));
    }

    let token = state.keys.issue(user.id).map_err(AppError::fault)?;
    info!(user_id = user.id, "user logged in");
    Ok(Authenticated {
        token,
        user: user.into(),
    })
}

pub async fn signup(state: &AppState, req: SignupRequest) -> Result<Authenticated, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::invalid_input("Invalid email"));
    }
    check_password(&req.password)?;
    let name = req.name.trim().to_owned();
    if name.is_empty() {
        return Err(AppError::invalid_input("Name is required"));
    }
    let gender = req.gender.trim().to_owned();
    if gender.is_empty() || gender.eq_ignore_ascii_case("select") {
        return Err(AppError::invalid_input("Please fill all the fields"));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = state
        .passwords
        .hash(req.password)
        .await
        .map_err(AppError::fault)?;

    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
            city: req.city.trim().to_owned(),
            dob: req.dob,
            phone: req.phone.trim().to_owned(),
            gender,
        })
        .await?;

    let token = state.keys.issue(user.id).map_err(AppError::fault)?;
    info!(user_id = user.id, "user signed up");
    Ok(Authenticated {
        token,
        user: user.into(),
    })
}

pub async fn reset_password(state: &AppState, email: &str, password: String) -> Result<(), AppError> {
    let email = normalize_email(email);
    check_password(&password)?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        return Err(AppError::not_found("This email does not exist"));
    };

    let hash = state.passwords.hash(password).await.map_err(AppError::fault)?;
    if !state.users.set_password(user.id, &hash).await? {
        return Err(AppError::not_found("This email does not exist"));
    }
    info!(user_id = user.id, "password reset");
    Ok(())
}
