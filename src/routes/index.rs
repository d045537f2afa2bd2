use axum::response::IntoResponse;

use crate::routes::Page;

pub async fn page(page: Page) -> impl IntoResponse {
    page.render(None).await
}
