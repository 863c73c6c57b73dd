use utoipa::OpenApi;
use crate::modules::video::dto::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::video::handler::create_video,
        crate::modules::video::handler::list_videos,
        crate::modules::video::handler::get_video,
        crate::modules::video::handler::delete_video,
        crate::modules::video::handler::upload_video,
        crate::modules::thumbnail::handler::upload_thumbnail,
        crate::modules::thumbnail::handler::get_thumbnail,
    ),
    components(
        schemas(CreateVideoRequest, VideoResponse)
    ),
    tags(
        (name = "Videos", description = "Video metadata, upload and signed playback URLs"),
        (name = "Thumbnails", description = "Video thumbnails")
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
