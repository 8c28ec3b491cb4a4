use axum::{extract::State, Json};

use crate::enhancement::improve_document;
use crate::errors::AppError;
use crate::state::{Action, AppState};
use crate::wizard::SessionView;

/// POST /api/v1/session/improve
///
/// Runs the whole improve batch on a snapshot. The session lock is released
/// while the enhancer runs. The result replaces the document only if every
/// rewrite succeeded and nothing was edited in the meantime (409 otherwise).
pub async fn handle_improve(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let guard = state
        .in_flight
        .begin(Action::Improve)
        .ok_or(AppError::Busy(Action::Improve.label()))?;

    let (snapshot, based_on) = {
        let session = state.session.lock().await;
        (session.document().clone(), session.revision())
    };
    let improved = improve_document(state.enhancer.as_ref(), &snapshot).await?;

    let mut session = state.session.lock().await;
    session.apply_improved(improved, based_on)?;
    drop(guard);
    Ok(Json(session.view(state.in_flight.flags())))
}
