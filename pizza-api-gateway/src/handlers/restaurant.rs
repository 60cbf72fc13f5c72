use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use pizza_restaurant_service::store;
use tracing::instrument;

use crate::error::ApiError;
use crate::models::*;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

// Ids that are not integers cannot name a restaurant.
fn parse_restaurant_id(id: &str) -> Result<i32, ApiError> {
    id.parse().map_err(|_| ApiError::RestaurantNotFound)
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = [Restaurant]),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    let restaurants = state
        .with_conn(|conn| Ok(store::list_restaurants(conn)?))
        .await?;

    Ok(Json(restaurants.into_iter().map(Restaurant::from).collect()))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant with the pizzas it offers", body = RestaurantDetails),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantDetails>, ApiError> {
    let id = parse_restaurant_id(&id)?;
    let (restaurant, restaurant_pizzas) = state
        .with_conn(move |conn| Ok(store::get_restaurant_with_pizzas(conn, id)?))
        .await?;

    Ok(Json(RestaurantDetails {
        id: restaurant.id,
        name: restaurant.name,
        address: restaurant.address,
        restaurant_pizzas: restaurant_pizzas
            .into_iter()
            .map(RestaurantPizza::from)
            .collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_restaurant_id(&id)?;
    state
        .with_conn(move |conn| Ok(store::delete_restaurant(conn, id)?))
        .await?;

    tracing::info!(restaurant_id = id, "restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}
