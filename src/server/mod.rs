use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::error::{SnapmorphError, LIKELY_CAUSES, SUGGESTED_FIXES};
use crate::fetcher::{self, DOWNLOAD_FILENAME};
use crate::models::SourceImage;
use crate::presets::PRESETS;
use crate::replicate::ReplicateClient;

static INDEX_HTML: &str = include_str!("index.html");

/// Base64-inflated uploads need headroom above the raw image cap.
pub const JSON_PAYLOAD_LIMIT: usize = 32 * 1024 * 1024;

pub struct AppState {
    pub client: ReplicateClient,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(presets)
        .service(inspect)
        .service(transform)
        .service(download);
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[derive(Serialize)]
struct PresetEntry {
    label: &'static str,
    text: &'static str,
}

#[get("/api/presets")]
async fn presets() -> impl Responder {
    let entries: Vec<PresetEntry> = PRESETS
        .iter()
        .map(|(label, text)| PresetEntry { label, text })
        .collect();
    HttpResponse::Ok().json(entries)
}

#[derive(Deserialize)]
struct InspectBody {
    image: String,
}

#[derive(Serialize)]
struct ImageMeta {
    format: crate::models::ImageKind,
    width: u32,
    height: u32,
    size_kb: f64,
}

/// Decodes just enough of an upload to report preview metadata.
#[post("/api/inspect")]
async fn inspect(body: web::Json<InspectBody>) -> impl Responder {
    match SourceImage::from_data_url(&body.image) {
        Ok(image) => HttpResponse::Ok().json(ImageMeta {
            format: image.kind(),
            width: image.width(),
            height: image.height(),
            size_kb: image.size_kb(),
        }),
        Err(e) => input_error(&e),
    }
}

#[derive(Deserialize)]
struct TransformBody {
    prompt: String,
    image: String,
}

#[derive(Serialize)]
struct TransformReply {
    status: &'static str,
    result_url: String,
    model: String,
    prompt: String,
}

#[derive(Serialize)]
struct FailureReply {
    status: &'static str,
    error: String,
    likely_causes: &'static [&'static str],
    suggested_fixes: &'static [&'static str],
}

/// The single-shot transformation: intake, one blocking model call,
/// normalized locator out. Every failure is translated to user-visible
/// text here; nothing propagates further.
#[post("/api/transform")]
async fn transform(
    state: web::Data<AppState>,
    body: web::Json<TransformBody>,
) -> impl Responder {
    let body = body.into_inner();

    let image = match SourceImage::from_data_url(&body.image) {
        Ok(image) => image,
        Err(e) => return input_error(&e),
    };

    let request = crate::models::TransformRequest::new(body.prompt, image);
    if let Err(e) = request.validate() {
        return input_error(&e);
    }

    match state.client.transform(&request).await {
        Ok(response) => HttpResponse::Ok().json(TransformReply {
            status: "succeeded",
            result_url: response.result_url,
            model: response.model,
            prompt: request.prompt,
        }),
        Err(e) if e.is_input_error() => input_error(&e),
        Err(e) => {
            log::error!("❌ Transformation failed: {}", e);
            HttpResponse::BadGateway().json(FailureReply {
                status: "failed",
                error: e.to_string(),
                likely_causes: &LIKELY_CAUSES,
                suggested_fixes: &SUGGESTED_FIXES,
            })
        }
    }
}

#[derive(Deserialize)]
struct DownloadQuery {
    src: String,
}

#[derive(Serialize)]
struct DownloadFailure {
    error: String,
    fallback_url: String,
}

/// Fetches the result (10 s leash) and re-encodes it to PNG. Failure is
/// non-fatal: the page falls back to a plain link to `src`.
#[get("/api/download")]
async fn download(query: web::Query<DownloadQuery>) -> impl Responder {
    let src = query.into_inner().src;
    if !src.starts_with("http://") && !src.starts_with("https://") {
        return input_error(&SnapmorphError::InvalidInput(
            "result locator must be an http(s) URL".into(),
        ));
    }

    let png = match fetcher::fetch_result(&src)
        .await
        // normalize_png is synchronous CPU work
        .and_then(|bytes| fetcher::normalize_png(&bytes))
    {
        Ok(png) => png,
        Err(e) => {
            log::warn!("⚠️  Result fetch failed, falling back to link: {}", e);
            return HttpResponse::BadGateway().json(DownloadFailure {
                error: e.to_string(),
                fallback_url: src,
            });
        }
    };

    HttpResponse::Ok()
        .content_type("image/png")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
        ))
        .body(png)
}

fn input_error(e: &SnapmorphError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "status": "failed",
        "error": e.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::testutil::png_bytes;
    use actix_web::{test, App};
    use base64::Engine;

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            client: ReplicateClient::new("r8_test", "google/nano-banana"),
        })
    }

    fn png_data_url() -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png_bytes(2, 3))
        )
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(test_state())
                    .app_data(web::JsonConfig::default().limit(JSON_PAYLOAD_LIMIT))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_index_renders_controls() {
        let app = test_app!();
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains(r#"accept=".jpg,.jpeg,.png,.webp""#));
        assert!(body.contains("id=\"prompt\""));
        assert!(body.contains("id=\"transform\""));
    }

    #[actix_web::test]
    async fn test_presets_endpoint_lists_six() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/presets").to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let entries: Vec<serde_json::Value> = test::read_body_json(resp).await;
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0]["label"], "🎨 Artistic");
        assert!(entries[0]["text"].as_str().unwrap().contains("watercolor"));
    }

    #[actix_web::test]
    async fn test_inspect_reports_dimensions() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/inspect")
                .set_json(serde_json::json!({ "image": png_data_url() }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let meta: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(meta["format"], "png");
        assert_eq!(meta["width"], 2);
        assert_eq!(meta["height"], 3);
        assert!(meta["size_kb"].as_f64().unwrap() > 0.0);
    }

    #[actix_web::test]
    async fn test_inspect_rejects_malformed_payload() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/inspect")
                .set_json(serde_json::json!({ "image": "not a data url" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_transform_blank_prompt_is_input_error() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/transform")
                .set_json(serde_json::json!({ "prompt": "   ", "image": png_data_url() }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "failed");
        assert!(body["error"].as_str().unwrap().contains("describe"));
    }

    #[actix_web::test]
    async fn test_transform_missing_image_is_input_error() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/transform")
                .set_json(serde_json::json!({ "prompt": "make it royal", "image": "" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_download_rejects_non_http_locator() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/download?src=file:///etc/passwd")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }
}
