use gym_admin::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    gym_admin::run().await
}
