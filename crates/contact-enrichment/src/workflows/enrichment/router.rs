use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::plan::plan_for_fields;
use super::service::{ContactEnrichmentService, EnrichmentOutcome};
use super::store::{ContactReader, ContactWriter};

/// Router exposing the enrichment endpoints.
pub fn enrichment_router<R, W>(service: Arc<ContactEnrichmentService<R, W>>) -> Router
where
    R: ContactReader + 'static,
    W: ContactWriter + 'static,
{
    Router::new()
        .route("/api/v1/contacts/enrich", post(enrich_handler::<R, W>))
        .route(
            "/api/v1/contacts/:contact_id/enrich",
            post(enrich_path_handler::<R, W>),
        )
        .route("/api/v1/enrichment/preview", post(preview_handler::<R, W>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnrichRequest {
    #[serde(
        default,
        alias = "contact_id",
        deserialize_with = "string_or_number_id"
    )]
    pub(crate) contact_id: Option<String>,
}

/// CRM ids arrive as strings or bare numbers; any other JSON type counts as absent.
fn string_or_number_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PreviewRequest {
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default, alias = "jobtitle")]
    pub(crate) job_title: Option<String>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn enrich_handler<R, W>(
    State(service): State<Arc<ContactEnrichmentService<R, W>>>,
    payload: Result<Json<EnrichRequest>, JsonRejection>,
) -> Response
where
    R: ContactReader + 'static,
    W: ContactWriter + 'static,
{
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let outcome = service.enrich_contact(request.contact_id.as_deref()).await;
    outcome_response(outcome)
}

pub(crate) async fn enrich_path_handler<R, W>(
    State(service): State<Arc<ContactEnrichmentService<R, W>>>,
    Path(contact_id): Path<String>,
) -> Response
where
    R: ContactReader + 'static,
    W: ContactWriter + 'static,
{
    let outcome = service.enrich_contact(Some(&contact_id)).await;
    outcome_response(outcome)
}

pub(crate) async fn preview_handler<R, W>(
    State(service): State<Arc<ContactEnrichmentService<R, W>>>,
    Json(request): Json<PreviewRequest>,
) -> Response
where
    R: ContactReader + 'static,
    W: ContactWriter + 'static,
{
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
    let plan = plan_for_fields(
        request.email.as_deref(),
        request.job_title.as_deref(),
        service.reference(),
        today,
    );
    let has_updates = plan.has_updates();
    let payload = json!({
        "hasUpdates": has_updates,
        "plan": plan,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

/// Maps an outcome onto the HTTP status and envelope callers expect.
pub fn outcome_response(outcome: EnrichmentOutcome) -> Response {
    match outcome {
        EnrichmentOutcome::InvalidInput => {
            let payload = json!({ "error": "Contact ID is required" });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        EnrichmentOutcome::NoEnrichmentFound { domain } => {
            let payload = json!({
                "success": true,
                "message": "No enrichment data found for this contact",
                "domain": domain,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        EnrichmentOutcome::Enriched { updates, summary } => {
            let payload = json!({
                "success": true,
                "message": "Contact enriched successfully",
                "enrichedData": updates,
                "additionalInfo": summary,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        EnrichmentOutcome::Failure { message } => {
            let payload = json!({
                "success": false,
                "error": message,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
