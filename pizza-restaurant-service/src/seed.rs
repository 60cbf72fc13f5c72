use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::store::{self, StoreError};

const RESTAURANTS: [NewRestaurant<'static>; 3] = [
    NewRestaurant {
        name: "Karen's Pizza Shack",
        address: "address1",
    },
    NewRestaurant {
        name: "Sanjay's Pizza",
        address: "address2",
    },
    NewRestaurant {
        name: "Kiki's Pizza",
        address: "address3",
    },
];

const PIZZAS: [NewPizza<'static>; 3] = [
    NewPizza {
        name: "Emma",
        ingredients: "Dough, Tomato Sauce, Cheese",
    },
    NewPizza {
        name: "Geri",
        ingredients: "Dough, Tomato Sauce, Cheese, Pepperoni",
    },
    NewPizza {
        name: "Melanie",
        ingredients: "Dough, Sauce, Ricotta, Red peppers, Mustard",
    },
];

/// (restaurant index, pizza index, price)
const PAIRINGS: [(usize, usize, i32); 3] = [(0, 0, 1), (1, 1, 4), (2, 2, 5)];

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

/// Replaces all rows with the sample data set.
pub fn seed(conn: &mut SqliteConnection) -> Result<SeedSummary, StoreError> {
    conn.immediate_transaction::<_, StoreError, _>(|conn| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;

        let restaurants = RESTAURANTS
            .iter()
            .map(|r| store::insert_restaurant(conn, r))
            .collect::<QueryResult<Vec<_>>>()?;
        let pizzas = PIZZAS
            .iter()
            .map(|p| store::insert_pizza(conn, p))
            .collect::<QueryResult<Vec<_>>>()?;

        let mut summary = SeedSummary {
            restaurants: restaurants.len(),
            pizzas: pizzas.len(),
            restaurant_pizzas: 0,
        };
        for (restaurant, pizza, price) in PAIRINGS {
            store::create_restaurant_pizza(
                conn,
                &NewRestaurantPizza {
                    price,
                    restaurant_id: restaurants[restaurant].id,
                    pizza_id: pizzas[pizza].id,
                },
            )?;
            summary.restaurant_pizzas += 1;
        }

        tracing::info!(?summary, "seeded database");
        Ok(summary)
    })
}
