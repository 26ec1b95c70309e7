use axum::{
    extract::{Path, RawQuery, State},
    http::{
        header::{CONTENT_TYPE, LOCATION},
        HeaderMap, HeaderValue, StatusCode, Uri,
    },
    response::Json,
};
use anyhow::Context;
use log::debug;

use crate::api::errors::ApiError;
use crate::api::handlers::{AppState, SharedState};
use crate::api::headers;
use crate::config::PaginationConfig;
use crate::model::{InstrumentDto, InstrumentId, PageRequest, SortOrder};
use crate::store::traits::InstrumentStore;

const ENTITY_NAME: &str = "instrument";
pub const RESOURCE_PATH: &str = "/api/instruments";

const MERGE_PATCH_CONTENT_TYPES: [&str; 2] = ["application/json", "application/merge-patch+json"];

/// Pagination parameters of a list request. `sort` may repeat, e.g.
/// `?sort=name,asc&sort=id`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    /// `property[,asc|desc]` values in request order
    pub sort: Vec<String>,
}

fn parse_number(key: &str, value: &str) -> Result<u64, ApiError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid value '{}' for parameter '{}'", value, key)))
}

impl PageQuery {
    /// Collect the pagination parameters from a raw query string, ignoring
    /// anything unrelated.
    pub fn parse(query: Option<&str>) -> Result<Self, ApiError> {
        let mut parsed = PageQuery::default();
        let Some(query) = query else {
            return Ok(parsed);
        };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "page" => parsed.page = Some(parse_number("page", &value)?),
                "size" => parsed.size = Some(parse_number("size", &value)?),
                "sort" if !value.trim().is_empty() => parsed.sort.push(value.into_owned()),
                _ => {}
            }
        }

        Ok(parsed)
    }

    pub fn into_page_request(self, config: &PaginationConfig) -> Result<PageRequest, ApiError> {
        let size = match self.size {
            None | Some(0) => config.default_size,
            Some(size) => size.min(config.max_size),
        };
        let mut request = PageRequest::new(self.page.unwrap_or(0), size);

        for sort in &self.sort {
            request = request.with_sort(SortOrder::parse(sort).map_err(ApiError::BadRequest)?);
        }

        Ok(request)
    }
}

fn bad_request<S: InstrumentStore>(state: &AppState<S>, message: &str, error_key: &str) -> ApiError {
    ApiError::bad_request_alert(&state.application_name, message, ENTITY_NAME, error_key)
}

/// Identity rules shared by PUT and PATCH: the body must carry an id, it must
/// match the path, and the record must already exist.
async fn check_identity<S: InstrumentStore>(
    state: &AppState<S>,
    id: InstrumentId,
    dto: &InstrumentDto,
) -> Result<(), ApiError> {
    let Some(body_id) = dto.id else {
        return Err(bad_request(state, "Invalid id", "idnull"));
    };
    if body_id != id {
        return Err(bad_request(state, "Invalid ID", "idinvalid"));
    }
    if !state.store.exists_by_id(id).await? {
        return Err(bad_request(state, "Entity not found", "idnotfound"));
    }
    Ok(())
}

fn accepts_merge_patch(request_headers: &HeaderMap) -> Result<(), ApiError> {
    let content_type = request_headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if MERGE_PATCH_CONTENT_TYPES.contains(&mime.as_str()) {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType(content_type.to_string()))
    }
}

/// `POST /api/instruments`
pub async fn create_instrument<S: InstrumentStore + 'static>(
    State(state): State<SharedState<S>>,
    Json(dto): Json<InstrumentDto>,
) -> Result<(StatusCode, HeaderMap, Json<InstrumentDto>), ApiError> {
    debug!("REST request to save Instrument: {:?}", dto);
    if dto.id.is_some() {
        return Err(bad_request(
            &state,
            "A new instrument cannot already have an ID",
            "idexists",
        ));
    }

    let result = state.service.save(dto).await?;
    let id = result
        .id
        .context("Store returned an instrument without an id")?
        .to_string();

    let mut response_headers = headers::entity_creation_alert(&state.application_name, ENTITY_NAME, &id);
    let location = HeaderValue::from_str(&format!("{}/{}", RESOURCE_PATH, id))
        .context("Invalid Location header")?;
    response_headers.insert(LOCATION, location);

    Ok((StatusCode::CREATED, response_headers, Json(result)))
}

/// `PUT /api/instruments/{id}`
pub async fn update_instrument<S: InstrumentStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<InstrumentId>,
    Json(dto): Json<InstrumentDto>,
) -> Result<(HeaderMap, Json<InstrumentDto>), ApiError> {
    debug!("REST request to update Instrument: {}, {:?}", id, dto);
    check_identity(&state, id, &dto).await?;

    let result = state.service.update(dto).await?;
    let response_headers =
        headers::entity_update_alert(&state.application_name, ENTITY_NAME, &id.to_string());

    Ok((response_headers, Json(result)))
}

/// `PATCH /api/instruments/{id}`, merge-patch semantics: absent fields are kept.
pub async fn partial_update_instrument<S: InstrumentStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<InstrumentId>,
    request_headers: HeaderMap,
    Json(dto): Json<InstrumentDto>,
) -> Result<(HeaderMap, Json<InstrumentDto>), ApiError> {
    debug!("REST request to partially update Instrument: {}, {:?}", id, dto);
    accepts_merge_patch(&request_headers)?;
    check_identity(&state, id, &dto).await?;

    let result = state
        .service
        .partial_update(dto)
        .await?
        .ok_or(ApiError::NotFound)?;
    let response_headers =
        headers::entity_update_alert(&state.application_name, ENTITY_NAME, &id.to_string());

    Ok((response_headers, Json(result)))
}

/// `GET /api/instruments?page=&size=&sort=`
pub async fn list_instruments<S: InstrumentStore + 'static>(
    State(state): State<SharedState<S>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> Result<(HeaderMap, Json<Vec<InstrumentDto>>), ApiError> {
    debug!("REST request to get a page of Instruments");
    let request = PageQuery::parse(query.as_deref())?.into_page_request(&state.pagination)?;

    let page = state.service.find_all(&request).await?;
    let response_headers = headers::pagination(uri.path(), query.as_deref(), &page);

    Ok((response_headers, Json(page.content)))
}

/// `GET /api/instruments/{id}`
pub async fn get_instrument<S: InstrumentStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<InstrumentId>,
) -> Result<Json<InstrumentDto>, ApiError> {
    debug!("REST request to get Instrument: {}", id);
    state
        .service
        .find_one(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// `DELETE /api/instruments/{id}`
pub async fn delete_instrument<S: InstrumentStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<InstrumentId>,
) -> Result<(StatusCode, HeaderMap), ApiError> {
    debug!("REST request to delete Instrument: {}", id);
    state.service.delete(id).await?;

    let response_headers =
        headers::entity_deletion_alert(&state.application_name, ENTITY_NAME, &id.to_string());
    Ok((StatusCode::NO_CONTENT, response_headers))
}
