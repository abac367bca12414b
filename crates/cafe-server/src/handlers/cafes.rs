//! Cafe handlers

use crate::error::ApiError;
use crate::extractors::CafeId;
use crate::AppState;
use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    Form, Json,
};
use cafe_types::{
    AddedResponse, CafeListResponse, CafeResponse, NewCafe, SuccessMessage, SuccessResponse,
};
use rand::seq::SliceRandom;
use serde::Deserialize;

pub async fn random(State(state): State<AppState>) -> Result<Json<CafeResponse>, ApiError> {
    let cafes = state.db.list_cafes().await?;
    let cafe = cafes
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or(ApiError::NoCafes)?;

    Ok(Json(CafeResponse { cafe }))
}

pub async fn all(State(state): State<AppState>) -> Result<Json<CafeListResponse>, ApiError> {
    let cafes = state.db.list_cafes().await?;
    Ok(Json(CafeListResponse { cafes }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    loc: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<CafeListResponse>, ApiError> {
    let Query(params) = params?;
    let location = params.loc.ok_or(ApiError::LocationNotFound)?;

    let cafes = state.db.find_by_location(&location).await?;
    if cafes.is_empty() {
        return Err(ApiError::LocationNotFound);
    }

    Ok(Json(CafeListResponse { cafes }))
}

/// Raw `POST /add` form; every field is optional until [`NewCafe::try_from`]
#[derive(Debug, Default, Deserialize)]
pub struct AddCafeForm {
    name: Option<String>,
    map_url: Option<String>,
    img_url: Option<String>,
    location: Option<String>,
    seats: Option<String>,
    has_toilet: Option<String>,
    has_wifi: Option<String>,
    has_sockets: Option<String>,
    can_take_calls: Option<String>,
    coffee_price: Option<String>,
}

impl TryFrom<AddCafeForm> for NewCafe {
    type Error = ApiError;

    fn try_from(form: AddCafeForm) -> Result<Self, Self::Error> {
        Ok(NewCafe {
            name: required("name", form.name)?,
            map_url: required("map_url", form.map_url)?,
            img_url: required("img_url", form.img_url)?,
            location: required("location", form.location)?,
            seats: required("seats", form.seats)?,
            has_toilet: flag("has_toilet", form.has_toilet)?,
            has_wifi: flag("has_wifi", form.has_wifi)?,
            has_sockets: flag("has_sockets", form.has_sockets)?,
            can_take_calls: flag("can_take_calls", form.can_take_calls)?,
            coffee_price: form
                .coffee_price
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(field, "is required")),
    }
}

/// Present and not blank; the value is kept exactly as sent
fn non_blank(field: &'static str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(field, "is required")),
    }
}

/// Missing or empty means false
fn flag(field: &'static str, value: Option<String>) -> Result<bool, ApiError> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" | "n" | "f" => Ok(false),
        "true" | "1" | "yes" | "on" | "y" | "t" => Ok(true),
        _ => Err(ApiError::validation(
            field,
            format!("expected a yes/no value, got '{}'", raw),
        )),
    }
}

pub async fn add(
    State(state): State<AppState>,
    form: Result<Form<AddCafeForm>, FormRejection>,
) -> Result<Json<AddedResponse>, ApiError> {
    let Form(form) = form?;
    let cafe = NewCafe::try_from(form)?;
    let id = state.db.insert_cafe(&cafe).await?;
    tracing::info!("Added cafe {} ({})", id, cafe.name);

    Ok(Json(AddedResponse {
        response: SuccessMessage::new("Successfully added the new cafe."),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceParams {
    new_price: Option<String>,
}

pub async fn update_price(
    State(state): State<AppState>,
    CafeId(id): CafeId,
    params: Result<Query<UpdatePriceParams>, QueryRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.db.get_cafe(id).await?.is_none() {
        return Err(ApiError::CafeNotFound);
    }

    let Query(params) = params?;
    let new_price = non_blank("new_price", params.new_price)?;

    if !state.db.update_coffee_price(id, &new_price).await? {
        return Err(ApiError::CafeNotFound);
    }
    tracing::info!("Updated coffee price of cafe {} to {}", id, new_price);

    Ok(Json(SuccessResponse {
        success: SuccessMessage::new("Successfully updated the price."),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReportClosedParams {
    #[serde(rename = "api-key")]
    api_key: Option<String>,
}

pub async fn report_closed(
    State(state): State<AppState>,
    CafeId(id): CafeId,
    params: Result<Query<ReportClosedParams>, QueryRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.db.get_cafe(id).await?.is_none() {
        return Err(ApiError::CafeNotFound);
    }

    let Query(params) = params?;

    if !state.api_keys.verify(params.api_key.as_deref()) {
        tracing::warn!("Rejected delete of cafe {}: bad api-key", id);
        return Err(ApiError::Forbidden);
    }

    // Gone between the lookup and the delete
    if !state.db.delete_cafe(id).await? {
        return Err(ApiError::CafeNotFound);
    }
    tracing::info!("Deleted cafe {}", id);

    Ok(Json(SuccessResponse {
        success: SuccessMessage::new("Successfully deleted the cafe."),
    }))
}
