use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    state::AppState,
    users::{
        dto::{MessageResponse, ProfileQuery, SignupRequest},
        error::UserError,
        password::hash_password_off_thread,
        repo_types::UserProfile,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/myprofile", get(my_profile))
}

/// POST /signup
///
/// Validates presence of every field, refuses a registered email, hashes the
/// password and inserts the row. A failed email check does not stop the
/// signup; only a failed insert does. The email check and the insert are two
/// separate store calls; two concurrent signups for one email can both pass
/// the check, and only the store's unique constraint stops the second insert.
#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), UserError> {
    let payload = match payload {
        Ok(Json(p)) => p,
        Err(rejection) => {
            debug!(error = %rejection, "signup body is not a JSON object; treating as empty");
            SignupRequest::default()
        }
    };

    let mut fields = payload
        .validate()
        .inspect_err(|e| warn!(error = %e, "signup rejected"))?;

    match state.users.email_exists(&fields.email).await {
        Ok(true) => {
            warn!(email = %fields.email, "email already registered");
            return Err(UserError::Conflict);
        }
        Ok(false) => {}
        // the insert still meets the unique constraint on email
        Err(e) => warn!(error = %e, "duplicate check failed; continuing"),
    }

    let plain = std::mem::take(&mut fields.password);
    let hash = hash_password_off_thread(plain, state.config.bcrypt_cost).await?;
    let new_user = fields.into_new_user(hash);

    state.users.insert(&new_user).await?;

    info!(email = %new_user.email, name = %new_user.name, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// GET /myprofile?name=
///
/// A missing row, several rows with that name and a failing store all answer
/// 404 alike.
#[instrument(skip(state, query))]
pub async fn my_profile(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<UserProfile>, UserError> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let name = ProfileQuery::from_pairs(pairs).validate()?;

    match state.users.find_by_name(&name).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => {
            debug!(%name, "no user with that name");
            Err(UserError::NotFound)
        }
        Err(e) => {
            warn!(error = %e, %name, "profile lookup failed");
            Err(UserError::NotFound)
        }
    }
}
