//! Gallery page handler

use super::router::RequestContext;
use super::IMAGES_PREFIX;
use crate::config::AppState;
use crate::error::Result;
use crate::http::{self, HttpResponse};
use crate::storage;
use crate::template;

/// List stored images and render them through the gallery template
pub async fn serve_gallery(ctx: &RequestContext<'_>, state: &AppState) -> Result<HttpResponse> {
    let images = storage::list_images(state.store.dir()).await?;
    let html = template::render_gallery(&state.template_path, &images, IMAGES_PREFIX).await?;
    Ok(http::build_html_response(html, ctx.is_head))
}
