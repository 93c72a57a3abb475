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
use crate::entities::instructor;
use crate::error::AppError;
use crate::repository::InstructorRepository;
use crate::validation::{
    EMAIL_TAKEN, FieldErrors, InstructorForm, unique_violation_errors, validate_instructor,
};

const RESOURCE: Resource = Resource::Instructor;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/instructors", get(index))
        .route("/instructors/create", get(create))
        .route("/instructors/store", post(store))
        .route("/instructors/edit", get(edit))
        .route("/instructors/update", post(update))
        .route("/instructors/delete", get(delete))
}

#[utoipa::path(
    get,
    path = "/instructors",
    params(FlashQuery),
    responses((status = 200, description = "Instructors, newest first")),
    tag = "instructors"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Json<IndexView<instructor::Model>>, AppError> {
    let items = InstructorRepository::new(&state.db).list_all().await?;
    Ok(Json(IndexView {
        flash: RESOURCE.flash(&flash),
        items,
    }))
}

#[utoipa::path(get, path = "/instructors/create", tag = "instructors")]
pub async fn create() -> Response {
    form_response(InstructorForm::default(), FieldErrors::new())
}

#[utoipa::path(
    post,
    path = "/instructors/store",
    request_body(content = InstructorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirects to /instructors?success=created"),
        (status = 422, description = "Form with field errors")
    ),
    tag = "instructors"
)]
pub async fn store(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Response, AppError> {
    let form: InstructorForm = decode_form(body);
    let repo = InstructorRepository::new(&state.db);
    let input = match validate_instructor(&form, &repo, None).await? {
        Ok(input) => input,
        Err(errors) => return Ok(form_response(form, errors)),
    };

    match repo.create(input).await {
        Ok(_) => Ok(RESOURCE.redirect_success(Success::Created)),
        Err(err) => match unique_violation_errors(&err, "email", EMAIL_TAKEN) {
            Some(errors) => {
                warn!("Instructor email taken by a concurrent request: {err}");
                Ok(form_response(form, errors))
            }
            None => Err(err.into()),
        },
    }
}

#[utoipa::path(get, path = "/instructors/edit", params(IdQuery), tag = "instructors")]
pub async fn edit(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(query.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::NotFound));
    };
    show_edit_form(&InstructorRepository::new(&state.db), id, FieldErrors::new()).await
}

#[utoipa::path(
    post,
    path = "/instructors/update",
    request_body(content = InstructorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirects to /instructors with a status token"),
        (status = 422, description = "Stored instructor with field errors")
    ),
    tag = "instructors"
)]
pub async fn update(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Response, AppError> {
    let form: InstructorForm = decode_form(body);
    let Some(id) = parse_id(form.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::NotFound));
    };
    let repo = InstructorRepository::new(&state.db);
    let input = match validate_instructor(&form, &repo, Some(id)).await? {
        Ok(input) => input,
        Err(errors) => return show_edit_form(&repo, id, errors).await,
    };

    match repo.update(id, input).await {
        Ok(true) => Ok(RESOURCE.redirect_success(Success::Updated)),
        Ok(false) => Ok(RESOURCE.redirect_failure(Failure::NotFound)),
        Err(err) => match unique_violation_errors(&err, "email", EMAIL_TAKEN) {
            Some(errors) => show_edit_form(&repo, id, errors).await,
            None => Err(err.into()),
        },
    }
}

#[utoipa::path(
    get,
    path = "/instructors/delete",
    params(IdQuery),
    responses((status = 303, description = "Redirects to /instructors with a status token")),
    tag = "instructors"
)]
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(query.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::DeleteFailed));
    };
    if InstructorRepository::new(&state.db).delete(id).await? {
        Ok(RESOURCE.redirect_success(Success::Deleted))
    } else {
        Ok(RESOURCE.redirect_failure(Failure::DeleteFailed))
    }
}

async fn show_edit_form(
    repo: &InstructorRepository<'_>,
    id: i64,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    match repo.get_by_id(id).await? {
        Some(instructor) => Ok(form_response(instructor, errors)),
        None => Ok(RESOURCE.redirect_failure(Failure::NotFound)),
    }
}
