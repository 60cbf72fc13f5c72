use axum::{Router, extract::State, http::StatusCode, response::Json, routing::post};
use pizza_restaurant_service::store::{self, StoreError};
use tracing::instrument;

use crate::error::ApiError;
use crate::models::*;

use super::{ApiJson, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = RestaurantPizza),
        (status = 400, description = "Invalid price, unknown ids or persistence failure", body = ApiErrorsResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateRestaurantPizzaRequest>,
) -> Result<(StatusCode, Json<RestaurantPizza>), ApiError> {
    let new_restaurant_pizza = payload.into_new_restaurant_pizza()?;

    let created = state
        .with_conn(move |conn| {
            store::create_restaurant_pizza(conn, &new_restaurant_pizza).map_err(|e| match e {
                StoreError::Database(e) => ApiError::Persistence(e.to_string()),
                e => e.into(),
            })
        })
        .await?;

    tracing::info!(
        restaurant_pizza_id = created.restaurant_pizza.id,
        "restaurant pizza created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}
