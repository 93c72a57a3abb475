use axum::{
    Json, Router,
    extract::{Query, State},
    response::Response,
    routing::{get, post},
};

use super::{
    Failure, FlashQuery, FormBody, IdQuery, IndexView, Resource, Success, decode_form,
    form_response, parse_id,
};
use crate::AppState;
use crate::entities::training_class;
use crate::error::AppError;
use crate::repository::ClassRepository;
use crate::validation::{ClassForm, FieldErrors, validate_class};

const RESOURCE: Resource = Resource::Class;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(index))
        .route("/classes/create", get(create))
        .route("/classes/store", post(store))
        .route("/classes/edit", get(edit))
        .route("/classes/update", post(update))
        .route("/classes/delete", get(delete))
}

#[utoipa::path(
    get,
    path = "/classes",
    params(FlashQuery),
    responses((status = 200, description = "Classes ordered by start time")),
    tag = "classes"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Json<IndexView<training_class::Model>>, AppError> {
    let items = ClassRepository::new(&state.db).list_all().await?;
    Ok(Json(IndexView {
        flash: RESOURCE.flash(&flash),
        items,
    }))
}

#[utoipa::path(get, path = "/classes/create", tag = "classes")]
pub async fn create() -> Response {
    form_response(ClassForm::default(), FieldErrors::new())
}

#[utoipa::path(
    post,
    path = "/classes/store",
    request_body(content = ClassForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirects to /classes?success=created"),
        (status = 422, description = "Form with field errors")
    ),
    tag = "classes"
)]
pub async fn store(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Response, AppError> {
    let form: ClassForm = decode_form(body);
    match validate_class(&form) {
        Ok(input) => {
            ClassRepository::new(&state.db).create(input).await?;
            Ok(RESOURCE.redirect_success(Success::Created))
        }
        Err(errors) => Ok(form_response(form, errors)),
    }
}

#[utoipa::path(get, path = "/classes/edit", params(IdQuery), tag = "classes")]
pub async fn edit(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(query.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::NotFound));
    };
    show_edit_form(&ClassRepository::new(&state.db), id, FieldErrors::new()).await
}

#[utoipa::path(
    post,
    path = "/classes/update",
    request_body(content = ClassForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirects to /classes with a status token"),
        (status = 422, description = "Stored class with field errors")
    ),
    tag = "classes"
)]
pub async fn update(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Response, AppError> {
    let form: ClassForm = decode_form(body);
    let Some(id) = parse_id(form.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::NotFound));
    };
    let repo = ClassRepository::new(&state.db);
    match validate_class(&form) {
        Ok(input) => {
            if repo.update(id, input).await? {
                Ok(RESOURCE.redirect_success(Success::Updated))
            } else {
                Ok(RESOURCE.redirect_failure(Failure::NotFound))
            }
        }
        Err(errors) => show_edit_form(&repo, id, errors).await,
    }
}

#[utoipa::path(
    get,
    path = "/classes/delete",
    params(IdQuery),
    responses((status = 303, description = "Redirects to /classes with a status token")),
    tag = "classes"
)]
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(query.id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::DeleteFailed));
    };
    if ClassRepository::new(&state.db).delete(id).await? {
        Ok(RESOURCE.redirect_success(Success::Deleted))
    } else {
        Ok(RESOURCE.redirect_failure(Failure::DeleteFailed))
    }
}

async fn show_edit_form(
    repo: &ClassRepository<'_>,
    id: i64,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    match repo.get_by_id(id).await? {
        Some(class) => Ok(form_response(class, errors)),
        None => Ok(RESOURCE.redirect_failure(Failure::NotFound)),
    }
}
