use pizza_restaurant_service::models::{self as db, PRICE_RANGE};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

pub const PRICE_OUT_OF_RANGE: &str = "Price must be between 1 and 30";
pub const INVALID_REFERENCE: &str = "Invalid pizza_id or restaurant_id";

pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Restaurant {
    /// Unique identifier for the restaurant
    pub id: i32,
    /// Name of the restaurant
    pub name: String,
    /// Address of the restaurant
    pub address: String,
}

impl From<db::Restaurant> for Restaurant {
    fn from(r: db::Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name,
            address: r.address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RestaurantDetails {
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Pizzas offered by the restaurant
    pub restaurant_pizzas: Vec<RestaurantPizza>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Pizza {
    /// Unique identifier for the pizza
    pub id: i32,
    /// Name of the pizza
    pub name: String,
    /// Comma separated ingredient list
    pub ingredients: String,
}

impl From<db::Pizza> for Pizza {
    fn from(p: db::Pizza) -> Self {
        Self {
            id: p.id,
            name: p.name,
            ingredients: p.ingredients,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RestaurantPizza {
    pub id: i32,
    /// Price of the pizza at this restaurant
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: Pizza,
    pub restaurant: Restaurant,
}

impl From<db::RestaurantPizzaDetails> for RestaurantPizza {
    fn from(d: db::RestaurantPizzaDetails) -> Self {
        Self {
            id: d.restaurant_pizza.id,
            price: d.restaurant_pizza.price,
            pizza_id: d.restaurant_pizza.pizza_id,
            restaurant_id: d.restaurant_pizza.restaurant_id,
            pizza: d.pizza.into(),
            restaurant: d.restaurant.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price between 1 and 30, inclusive
    #[schema(minimum = 1, maximum = 30)]
    pub price: i32,
    pub pizza_id: Option<i32>,
    pub restaurant_id: Option<i32>,
}

impl Validate for CreateRestaurantPizzaRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if !PRICE_RANGE.contains(&self.price) {
            return Err(ApiError::validation(PRICE_OUT_OF_RANGE));
        }
        Ok(())
    }
}

impl CreateRestaurantPizzaRequest {
    /// Validates the request and turns it into an insertable row. Absent ids
    /// are reported the same way as ids that match nothing.
    pub fn into_new_restaurant_pizza(self) -> Result<db::NewRestaurantPizza, ApiError> {
        self.validate()?;
        match (self.pizza_id, self.restaurant_id) {
            (Some(pizza_id), Some(restaurant_id)) => Ok(db::NewRestaurantPizza {
                price: self.price,
                restaurant_id,
                pizza_id,
            }),
            _ => Err(ApiError::validation(INVALID_REFERENCE)),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorsResponse {
    /// Validation or persistence error messages
    pub errors: Vec<String>,
}
