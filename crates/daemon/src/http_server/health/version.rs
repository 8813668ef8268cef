use axum::Json;

use common::build_info;
use common::prelude::BuildInfo;

pub async fn handler() -> Json<BuildInfo> {
    Json(build_info!())
}
