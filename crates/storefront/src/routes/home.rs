//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::views::{RestaurantView, WalletView};
use crate::middleware::OptionalWallet;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub wallet: Option<WalletView>,
    pub sandbox: bool,
    pub restaurants: Vec<RestaurantView>,
}

/// Display the restaurant list.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalWallet(user): OptionalWallet,
) -> impl IntoResponse {
    HomeTemplate {
        wallet: WalletView::from_user(user.as_ref()),
        sandbox: state.config().pi.sandbox,
        restaurants: state
            .catalog()
            .restaurants()
            .iter()
            .map(RestaurantView::from)
            .collect(),
    }
}
