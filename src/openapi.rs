use utoipa::OpenApi;

use crate::handlers::{Flash, FlashKind};
use crate::models::PaymentRecord;
use crate::validation::{ClassForm, InstructorForm, PaymentForm, ScheduleForm};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::classes::index,
        crate::handlers::classes::create,
        crate::handlers::classes::store,
        crate::handlers::classes::edit,
        crate::handlers::classes::update,
        crate::handlers::classes::delete,
        crate::handlers::instructors::index,
        crate::handlers::instructors::create,
        crate::handlers::instructors::store,
        crate::handlers::instructors::edit,
        crate::handlers::instructors::update,
        crate::handlers::instructors::delete,
        crate::handlers::payments::index,
        crate::handlers::payments::create,
        crate::handlers::payments::store,
        crate::handlers::payments::member_history,
        crate::handlers::schedules::index,
        crate::handlers::schedules::create,
        crate::handlers::schedules::store,
        crate::handlers::schedules::edit,
        crate::handlers::schedules::update,
        crate::handlers::schedules::delete
    ),
    components(schemas(
        Flash,
        FlashKind,
        PaymentRecord,
        ClassForm,
        InstructorForm,
        PaymentForm,
        ScheduleForm
    )),
    tags(
        (name = "gym", description = "Service status"),
        (name = "classes", description = "Training classes"),
        (name = "instructors", description = "Instructors"),
        (name = "payments", description = "Membership payments"),
        (name = "schedules", description = "Gym opening hours")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in ["/classes", "/instructors/update", "/payments/member", "/schedules/delete"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
