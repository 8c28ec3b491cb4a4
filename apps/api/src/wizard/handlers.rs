use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::document::{EntryId, EntryKind, EntryPatch, PersonalField, SkillCategory};
use crate::state::AppState;
use crate::wizard::{SessionView, Step, StepData, WizardSession};

#[derive(Deserialize)]
pub struct FieldValue {
    pub value: String,
}

#[derive(Deserialize)]
pub struct SkillText {
    pub text: String,
}

#[derive(Serialize)]
pub struct EntryCreated {
    pub id: EntryId,
    pub session: SessionView,
}

fn view(state: &AppState, session: &WizardSession) -> SessionView {
    session.view(state.in_flight.flags())
}

fn parse_path<T>(raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse::<T>().map_err(AppError::Validation)
}


/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(view(&state, &session))
}

/// DELETE /api/v1/session
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.reset()?;
    Ok(Json(view(&state, &session)))
}

/// POST /api/v1/session/next
pub async fn handle_next(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.go_next()?;
    Ok(Json(view(&state, &session)))
}

/// POST /api/v1/session/back
pub async fn handle_back(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.go_back();
    Json(view(&state, &session))
}

/// PUT /api/v1/session/steps/:step
pub async fn handle_update_step(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SessionView>, AppError> {
    let step: Step = parse_path(&step)?;
    let data = StepData::from_json(step, body)
        .map_err(|e| AppError::Validation(format!("invalid {step} data: {e}")))?;

    let mut session = state.session.lock().await;
    session.update_step_data(data)?;
    Ok(Json(view(&state, &session)))
}

/// PUT /api/v1/session/personal/:field
pub async fn handle_set_personal_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(body): Json<FieldValue>,
) -> Result<Json<SessionView>, AppError> {
    let field: PersonalField = parse_path(&field)?;
    let mut session = state.session.lock().await;
    session.set_personal_field(field, body.value);
    Ok(Json(view(&state, &session)))
}

/// POST /api/v1/session/entries/:kind
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<(StatusCode, Json<EntryCreated>), AppError> {
    let kind: EntryKind = parse_path(&kind)?;
    let mut session = state.session.lock().await;
    let id = session.add_entry(kind);
    Ok((
        StatusCode::CREATED,
        Json(EntryCreated {
            id,
            session: view(&state, &session),
        }),
    ))
}

/// PATCH /api/v1/session/entries/:kind/:id
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<SessionView>, AppError> {
    let kind: EntryKind = parse_path(&kind)?;
    let id: EntryId = parse_path(&id)?;
    let mut session = state.session.lock().await;
    session.update_entry(kind, id, &patch)?;
    Ok(Json(view(&state, &session)))
}

/// DELETE /api/v1/session/entries/:kind/:id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<SessionView>, AppError> {
    let kind: EntryKind = parse_path(&kind)?;
    let id: EntryId = parse_path(&id)?;
    let mut session = state.session.lock().await;
    session.remove_entry(kind, id)?;
    Ok(Json(view(&state, &session)))
}

/// POST /api/v1/session/skills/:category
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(body): Json<SkillText>,
) -> Result<Json<SessionView>, AppError> {
    let category: SkillCategory = parse_path(&category)?;
    let mut session = state.session.lock().await;
    session.add_skill(category, &body.text)?;
    Ok(Json(view(&state, &session)))
}

/// DELETE /api/v1/session/skills/:category
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(body): Json<SkillText>,
) -> Result<Json<SessionView>, AppError> {
    let category: SkillCategory = parse_path(&category)?;
    let mut session = state.session.lock().await;
    session.remove_skill(category, &body.text)?;
    Ok(Json(view(&state, &session)))
}
