use utoipa::OpenApi;

use crate::routes::{chat, health};

#[derive(OpenApi)]
#[openapi(info(
    title = "parley-server",
    description = "parley chat API",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(chat::ChatApi::openapi());
    root.merge(health::HealthApi::openapi());
    root
}
