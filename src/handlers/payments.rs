use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::IntoParams;

use super::{
    Failure, FlashQuery, FormBody, IndexView, Resource, Success, decode_form, parse_id,
};
use crate::AppState;
use crate::entities::{member, membership_type};
use crate::error::{AppError, StoreViolation};
use crate::models::PaymentRecord;
use crate::repository::{MemberRepository, PaymentRepository};
use crate::validation::{
    FieldErrors, MEMBER_REQUIRED, MEMBERSHIP_TYPE_REQUIRED, PaymentForm, validate_payment,
};

const RESOURCE: Resource = Resource::Payment;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(index))
        .route("/payments/create", get(create))
        .route("/payments/store", post(store))
        .route("/payments/member", get(member_history))
}

/// The payment form also lists the members and plans to pick from.
#[derive(Debug, Serialize)]
pub struct PaymentFormView {
    pub values: PaymentForm,
    pub errors: FieldErrors,
    pub members: Vec<member::Model>,
    pub membership_types: Vec<membership_type::Model>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberQuery {
    pub member_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/payments",
    params(FlashQuery),
    responses((status = 200, description = "Payments, newest first", body = [PaymentRecord])),
    tag = "payments"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Json<IndexView<PaymentRecord>>, AppError> {
    let items = PaymentRepository::new(&state.db).list_all().await?;
    Ok(Json(IndexView {
        flash: RESOURCE.flash(&flash),
        items,
    }))
}

#[utoipa::path(get, path = "/payments/create", tag = "payments")]
pub async fn create(State(state): State<AppState>) -> Result<Response, AppError> {
    payment_form(&state, PaymentForm::default(), FieldErrors::new()).await
}

#[utoipa::path(
    post,
    path = "/payments/store",
    request_body(content = PaymentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered, redirects to /payments?success=created"),
        (status = 422, description = "Form with field errors")
    ),
    tag = "payments"
)]
pub async fn store(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Response, AppError> {
    let form: PaymentForm = decode_form(body);
    let input = match validate_payment(&form) {
        Ok(input) => input,
        Err(errors) => return payment_form(&state, form, errors).await,
    };
    let (member_id, membership_type_id) = (input.member_id, input.membership_type_id);

    let repo = PaymentRepository::new(&state.db);
    match repo.create(input).await {
        Ok(_) => Ok(RESOURCE.redirect_success(Success::Created)),
        Err(err) if StoreViolation::classify(&err) == Some(StoreViolation::ForeignKey) => {
            warn!("Payment references a missing member or plan: {err}");
            let mut errors = FieldErrors::new();
            if !MemberRepository::new(&state.db).exists(member_id).await? {
                errors.insert("member_id", MEMBER_REQUIRED.to_string());
            }
            if !repo.membership_type_exists(membership_type_id).await? {
                errors.insert("membership_type_id", MEMBERSHIP_TYPE_REQUIRED.to_string());
            }
            if errors.is_empty() {
                return Err(err.into());
            }
            payment_form(&state, form, errors).await
        }
        Err(err) => Err(err.into()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/member",
    params(MemberQuery),
    responses(
        (status = 200, description = "A member's payments, newest first", body = [PaymentRecord]),
        (status = 303, description = "Missing member id, redirects to /payments?error=not_found")
    ),
    tag = "payments"
)]
pub async fn member_history(
    State(state): State<AppState>,
    Query(query): Query<MemberQuery>,
) -> Result<Response, AppError> {
    let Some(member_id) = parse_id(query.member_id.as_deref()) else {
        return Ok(RESOURCE.redirect_failure(Failure::NotFound));
    };
    let payments = PaymentRepository::new(&state.db)
        .list_by_member(member_id)
        .await?;
    Ok(Json(payments).into_response())
}

async fn payment_form(
    state: &AppState,
    values: PaymentForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let member_repo = MemberRepository::new(&state.db);
    let payment_repo = PaymentRepository::new(&state.db);
    let (members, membership_types) = futures::try_join!(
        member_repo.list_all(),
        payment_repo.list_membership_types()
    )?;

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let view = PaymentFormView {
        values,
        errors,
        members,
        membership_types,
    };
    Ok((status, Json(view)).into_response())
}
