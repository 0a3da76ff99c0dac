// handlers/protected/entity.rs - Generic list/editor screen for any managed entity
//
// GET  /<table>            list, optionally with ?filter=
// GET  /<table>/new        open the editor on a blank draft
// GET  /<table>/:id/edit   open the editor on a stored row
// POST /<table>/editor     editor actions (save, cancel, delete, confirm-delete, dismiss-delete)

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::AdminError;
use crate::handlers::AppState;
use crate::middleware::CurrentSession;
use crate::schema::FieldError;
use crate::ui::editor::{ConfirmDialog, Confirmation, EditorEvent, EditorView};
use crate::ui::{templates, Managed, UiSession};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    filter: Option<String>,
}

/// Confirmation answered by the form that was posted
#[derive(Debug, Clone, Copy)]
pub struct FormDialog {
    answer: Option<bool>,
}

impl FormDialog {
    /// No answer yet; the question is rendered with the next page
    pub fn unanswered() -> Self {
        Self { answer: None }
    }

    pub fn answered(confirmed: bool) -> Self {
        Self { answer: Some(confirmed) }
    }
}

impl ConfirmDialog for FormDialog {
    fn confirm(&mut self, _title: &str, _message: &str) -> Confirmation {
        match self.answer {
            Some(true) => Confirmation::Confirmed,
            Some(false) => Confirmation::Dismissed,
            None => Confirmation::Pending,
        }
    }
}

/// Map the posted `action` to an editor event and the dialog answering it
pub fn parse_action(action: &str) -> Result<(EditorEvent, FormDialog), AdminError> {
    let parsed = match action {
        "save" => (EditorEvent::Save, FormDialog::unanswered()),
        "cancel" => (EditorEvent::Cancel, FormDialog::unanswered()),
        "delete" => (EditorEvent::DeleteClicked, FormDialog::unanswered()),
        "confirm-delete" => (EditorEvent::DeleteClicked, FormDialog::answered(true)),
        "dismiss-delete" => (EditorEvent::DeleteClicked, FormDialog::answered(false)),
        other => return Err(AdminError::bad_request(format!("Unknown editor action '{}'", other))),
    };
    Ok(parsed)
}

fn render<E: Managed>(state: &AppState, session: &UiSession) -> Html<String> {
    Html(templates::entity_page(
        &state.title,
        &state.messages,
        session.client.username(),
        session.console::<E>(),
    ))
}

fn back_to_list<E: Managed>() -> Response {
    Redirect::to(&format!("/{}", E::TABLE)).into_response()
}

/// GET /<table>
pub async fn list_get<E: Managed>(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, AdminError> {
    let mut session = session.lock().await;
    let console = session.console_mut::<E>();
    match query.filter {
        Some(filter) => console.apply_filter(&filter).await?,
        None => console.refresh().await?,
    }
    Ok(render::<E>(&state, &session))
}

/// GET /<table>/new
pub async fn new_get<E: Managed>(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Response, AdminError> {
    let mut session = session.lock().await;
    session.console_mut::<E>().add_new_clicked().await?;
    Ok(back_to_list::<E>())
}

/// GET /<table>/:id/edit
pub async fn edit_get<E: Managed>(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Result<Response, AdminError> {
    let mut session = session.lock().await;
    session.console_mut::<E>().select(id).await?;
    Ok(back_to_list::<E>())
}

/// POST /<table>/editor
pub async fn editor_post<E: Managed>(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AdminError> {
    let action = form.get("action").map(String::as_str).unwrap_or("save");
    let (event, mut dialog) = parse_action(action)?;

    let mut session = session.lock().await;
    let console = session.console_mut::<E>();
    if !console.editor().is_open() {
        debug!(table = E::TABLE, action, "Editor action without open editor");
        return Ok(back_to_list::<E>());
    }

    // Posted values replace the widget contents; fields absent from the form stay untouched
    for descriptor in E::schema().describe_fields() {
        let Some(value) = form.get(descriptor.name) else {
            continue;
        };
        if let Some(choices) = descriptor.choices() {
            if !choices.contains(&value.as_str()) {
                return Err(FieldError::InvalidChoice {
                    field: descriptor.name.to_string(),
                    value: value.clone(),
                }
                .into());
            }
        }
        console.editor_mut().view_mut().set_field_value(descriptor.name, value);
    }

    console.handle_editor_event(event, &mut dialog).await?;
    Ok(back_to_list::<E>())
}
