//! Command implementations.
//!
//! Authenticated commands check the session first: they refuse to call the
//! server at all while anonymous.

use anyhow::{bail, Context, Result};
use wares_core::{CreateProductRequest, LoginRequest, SignupRequest};

use crate::api::ApiClient;
use crate::config::Config;
use crate::session::Session;
use crate::store::TokenStore;

/// The current token, or a friendly refusal when anonymous
fn require_token<S: TokenStore>(session: &Session<S>) -> Result<&str> {
    session
        .current_token()
        .context("You are not logged in. Run `wares login --email <email>` first.")
}

pub async fn signup(
    api: &ApiClient,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = prompt_password_if_missing(password)?;

    let user = api
        .signup(&SignupRequest {
            name,
            email,
            password,
        })
        .await?;

    println!("Account created for {} <{}>.", user.name, user.email);
    println!("Log in with: wares login --email {}", user.email);
    Ok(())
}

pub async fn login<S: TokenStore>(
    api: &ApiClient,
    session: &mut Session<S>,
    config: &mut Config,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = prompt_password_if_missing(password)?;

    // The session manager is only told about successful logins; an API
    // failure surfaces here and leaves the session untouched.
    let response = api
        .login(&LoginRequest {
            email: email.clone(),
            password,
        })
        .await?;

    session.login(response.jwt_token)?;

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        tracing::debug!("Failed to save config: {e}");
    }

    println!(
        "Logged in as {} <{}>.",
        response.user.name, response.user.email
    );
    Ok(())
}

pub fn logout<S: TokenStore>(session: &mut Session<S>) -> Result<()> {
    let was_authenticated = session.is_authenticated();
    session.logout()?;

    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("Already logged out.");
    }
    Ok(())
}

pub async fn products<S: TokenStore>(api: &ApiClient, session: &Session<S>) -> Result<()> {
    let token = require_token(session)?;
    let products = api.products(token).await?;

    if products.is_empty() {
        println!("No products available");
        return Ok(());
    }

    for product in products {
        println!("{} - {}", product.name, product.price_display());
    }
    Ok(())
}

pub async fn add_product<S: TokenStore>(
    api: &ApiClient,
    session: &Session<S>,
    name: String,
    price: &str,
) -> Result<()> {
    let token = require_token(session)?;
    let price_cents = parse_price(price)?;

    let product = api
        .create_product(token, &CreateProductRequest { name, price_cents })
        .await?;

    println!("Added {} - {}", product.name, product.price_display());
    Ok(())
}

pub async fn whoami<S: TokenStore>(api: &ApiClient, session: &Session<S>) -> Result<()> {
    let token = require_token(session)?;
    let user = api.me(token).await?;

    println!("{} <{}>", user.name, user.email);
    Ok(())
}

pub fn status<S: TokenStore>(session: &Session<S>) -> Result<()> {
    if session.is_authenticated() {
        println!("Status: logged in");
        println!("Available: products, add-product, whoami, logout");
    } else {
        println!("Status: not logged in");
        println!("Available: signup, login");
    }
    Ok(())
}

/// Parse a dollar amount like "12.99", "5", or "$3.50" into cents
fn parse_price(input: &str) -> Result<i64> {
    let cleaned = input.trim().trim_start_matches('$');
    if cleaned.starts_with('-') {
        bail!("Price must not be negative");
    }

    let (dollars, cents) = match cleaned.split_once('.') {
        Some((dollars, cents)) => (dollars, cents),
        None => (cleaned, ""),
    };

    if dollars.is_empty() && cents.is_empty() {
        bail!("Invalid price: {input}");
    }
    if dollars.chars().any(|c| !c.is_ascii_digit()) || cents.chars().any(|c| !c.is_ascii_digit()) {
        bail!("Invalid price: {input}");
    }

    let dollars: i64 = if dollars.is_empty() {
        0
    } else {
        dollars
            .parse()
            .with_context(|| format!("Invalid price: {input}"))?
    };

    let cents: i64 = match cents.len() {
        0 => 0,
        1 => cents.parse::<i64>()? * 10,
        2 => cents.parse()?,
        _ => bail!("Price can have at most two decimal places"),
    };

    dollars
        .checked_mul(100)
        .and_then(|d| d.checked_add(cents))
        .context("Price is too large")
}

fn prompt_password_if_missing(password: Option<String>) -> Result<String> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;

    #[test]
    fn test_guard_refuses_anonymous() {
        let session = Session::initialize(MemoryTokenStore::new()).unwrap();
        assert!(require_token(&session).is_err());
    }

    #[test]
    fn test_guard_passes_token_through() {
        let mut session = Session::initialize(MemoryTokenStore::new()).unwrap();
        session.login("tok-1".to_string()).unwrap();

        assert_eq!(require_token(&session).unwrap(), "tok-1");
    }

    #[test]
    fn test_price_parsing() {
        assert_eq!(parse_price("12.99").unwrap(), 1299);
        assert_eq!(parse_price("5").unwrap(), 500);
        assert_eq!(parse_price("0.07").unwrap(), 7);
        assert_eq!(parse_price(".5").unwrap(), 50);
        assert_eq!(parse_price("$3.50").unwrap(), 350);

        assert!(parse_price("abc").is_err());
        assert!(parse_price("999999999999999999").is_err());
        assert!(parse_price("-1").is_err());
        assert!(parse_price("1.999").is_err());
        assert!(parse_price("12.-5").is_err());
        assert!(parse_price("").is_err());
    }
}
