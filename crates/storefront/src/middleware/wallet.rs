//! Pi wallet session extractors.
//!
//! A connected wallet is the `PiUser` returned by the platform for the access
//! token the browser SDK handed us, stored in the session by `POST /auth/pi`.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::pi::PiUser;

/// Session keys.
pub mod session_keys {
    /// The connected Pi user.
    pub const PI_USER: &str = "pi_user";
    /// The shopping cart.
    pub const CART: &str = "cart";
    /// Restaurant of the most recently added cart item.
    pub const CART_RESTAURANT: &str = "cart_restaurant";
}

/// Extractor that requires a connected Pi wallet.
///
/// Rejects with `401 {"error": "Pi Wallet not connected"}`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireWallet(user): RequireWallet) -> impl IntoResponse {
///     format!("Hello, {}!", user.uid)
/// }
/// ```
pub struct RequireWallet(pub PiUser);

impl<S> FromRequestParts<S> for RequireWallet
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalWallet(user) = OptionalWallet::from_request_parts(parts, state)
            .await
            .unwrap_or(OptionalWallet(None));

        user.map(Self)
            .ok_or_else(|| AppError::Unauthorized("Pi Wallet not connected".to_string()))
    }
}

/// Extractor that optionally gets the connected Pi user.
///
/// Unlike `RequireWallet`, this does not reject the request when no wallet is
/// connected.
pub struct OptionalWallet(pub Option<PiUser>);

impl<S> FromRequestParts<S> for OptionalWallet
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<PiUser>(session_keys::PI_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the connected Pi user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_pi_user(
    session: &Session,
    user: &PiUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::PI_USER, user).await
}

/// Disconnect the wallet (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_pi_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<PiUser>(session_keys::PI_USER).await?;
    Ok(())
}
