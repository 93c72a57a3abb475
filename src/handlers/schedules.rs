use axum::{
    Json, Router,
    extract::{Query, State},
    response::Response,
    routing::{get, post},
};
use tracing::warn;

use super::{
    Failure, FlashQuery, FormBody, IdQuery, IndexView, Resource, Success, decode_form,
    form_response, parse_id,
};
use crate::AppState;
use crate::entities::schedule;
use crate::error::AppError;
use crate::repository::ScheduleRepository;
use crate::validation::{
    DAY_TAKEN, FieldErrors, ScheduleForm, unique_violation_errors, validate_schedule,
};

const RESOURCE: Resource = Resource::Schedule;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(index))
        .route("/schedules/create", get(create))
        .route("/schedules/store", post(store))
        .route("/schedules/edit", get(edit))
        .route("/schedules/update", post(update))
        .route("/schedules/delete", get(delete))
}

#[utoipa::path(
    get,
    path = "/schedules",
    params(FlashQuery),
    responses((status = 200, description = "Schedules from Monday to Sunday")),
    tag = "schedules"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Json<IndexView<schedule::Model>>, AppError> {
    let items = ScheduleRepository::new(&state.db).list_all().await?;
    Ok(Json(IndexView {
        flash: RESOURCE.flash(&flash),
        items,
    }))
}

#[utoipa::path(get, path = "/schedules/create", tag = "schedules")]
pub async fn create() -> Response {
    form_response(ScheduleForm::default(), FieldErrors::new())
}

#[utoipa::path(
    post,
    path = "/schedules/store",
    request_body(content = ScheduleForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirects to /schedules?success=created"),
        (status = 422, description = "Form with field errors")
    ),
    tag = "schedules"
)]
pub async fn store(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Response, AppError> {
    let form: ScheduleForm = decode_form(body);
    let repo = ScheduleRepository::new(&state.db);
    let input = match validate_schedule(&form, &repo, None).await? {
        Ok(input) => input,
        Err(errors) => return Ok(form_response(form, errors)),
    };

    match repo.create(input).await {
        Ok(_) => Ok(RESOURCE.redirect_success(Success::Created)),
        Err(err) => match unique_violation_errors(&err, "day_of_week", DAY_TAKEN) {
            Some(errors) => {
                warn!("Schedule day taken by a concurrent request: {err}");
                Ok(form_response(form, errors))
            }
            None => Err(err.into()),
        },
    }
}

#[utoipa::path(get, path = "/schedules/edit", params(IdQuery), tag = "schedules")]
pub async fn edit(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(query.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::NotFound));
    };
    let repo = ScheduleRepository::new(&state.db);
    show_edit_form(&repo, id, FieldErrors::new()).await
}

#[utoipa::path(
    post,
    path = "/schedules/update",
    request_body(content = ScheduleForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirects to /schedules with a status token"),
        (status = 422, description = "Stored schedule with field errors")
    ),
    tag = "schedules"
)]
pub async fn update(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Response, AppError> {
    let form: ScheduleForm = decode_form(body);
    let Some(id) = parse_id(form.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::NotFound));
    };
    let repo = ScheduleRepository::new(&state.db);
    let input = match validate_schedule(&form, &repo, Some(id)).await? {
        Ok(input) => input,
        Err(errors) => return show_edit_form(&repo, id, errors).await,
    };

    match repo.update(id, input).await {
        Ok(true) => Ok(RESOURCE.redirect_success(Success::Updated)),
        Ok(false) => Ok(RESOURCE.redirect_failure(Failure::NotFound)),
        Err(err) => match unique_violation_errors(&err, "day_of_week", DAY_TAKEN) {
            Some(errors) => show_edit_form(&repo, id, errors).await,
            None => Err(err.into()),
        },
    }
}

#[utoipa::path(
    get,
    path = "/schedules/delete",
    params(IdQuery),
    responses((status = 303, description = "Redirects to /schedules with a status token")),
    tag = "schedules"
)]
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(query.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::DeleteFailed));
    };
    if ScheduleRepository::new(&state.db).delete(id).await? {
        Ok(RESOURCE.redirect_success(Success::Deleted))
    } else {
        Ok(RESOURCE.redirect_failure(Failure::DeleteFailed))
    }
}

/// Edit form populated from the stored row, which is reloaded so the page always
/// reflects what is persisted.
async fn show_edit_form(
    repo: &ScheduleRepository<'_>,
    id: i64,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    match repo.get_by_id(id).await? {
        Some(schedule) => Ok(form_response(schedule, errors)),
        None => Ok(RESOURCE.redirect_failure(Failure::NotFound)),
    }
}
