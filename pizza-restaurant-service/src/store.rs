use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use thiserror::Error;

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
    RestaurantPizzaDetails,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("Invalid pizza_id or restaurant_id")]
    InvalidReference,
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

pub fn list_restaurants(conn: &mut SqliteConnection) -> QueryResult<Vec<Restaurant>> {
    restaurants::table
        .order(restaurants::id)
        .select(Restaurant::as_select())
        .load(conn)
}

pub fn find_restaurant(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Restaurant>> {
    restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()
}

pub fn list_pizzas(conn: &mut SqliteConnection) -> QueryResult<Vec<Pizza>> {
    pizzas::table
        .order(pizzas::id)
        .select(Pizza::as_select())
        .load(conn)
}

pub fn find_pizza(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Pizza>> {
    pizzas::table
        .find(id)
        .select(Pizza::as_select())
        .first(conn)
        .optional()
}

/// Loads a restaurant and every pizza it offers in one read transaction.
pub fn get_restaurant_with_pizzas(
    conn: &mut SqliteConnection,
    id: i32,
) -> Result<(Restaurant, Vec<RestaurantPizzaDetails>), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let restaurant = find_restaurant(conn, id)?.ok_or(StoreError::RestaurantNotFound)?;
        let restaurant_pizzas = restaurant_pizzas_of(conn, restaurant.id)?;
        Ok((restaurant, restaurant_pizzas))
    })
}

pub fn restaurant_pizzas_of(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> QueryResult<Vec<RestaurantPizzaDetails>> {
    let rows = restaurant_pizzas::table
        .inner_join(pizzas::table)
        .inner_join(restaurants::table)
        .filter(restaurant_pizzas::restaurant_id.eq(restaurant_id))
        .order(restaurant_pizzas::id)
        .select((
            RestaurantPizza::as_select(),
            Pizza::as_select(),
            Restaurant::as_select(),
        ))
        .load::<(RestaurantPizza, Pizza, Restaurant)>(conn)?;

    Ok(rows.into_iter().map(RestaurantPizzaDetails::from).collect())
}

/// Removes the restaurant together with its pairings. Both deletes commit or
/// neither does.
///
/// Write transactions take the write lock up front: SQLite refuses to upgrade
/// a read lock while another writer is active, without consulting the busy
/// timeout.
pub fn delete_restaurant(conn: &mut SqliteConnection, id: i32) -> Result<(), StoreError> {
    conn.immediate_transaction::<_, StoreError, _>(|conn| {
        let restaurant = find_restaurant(conn, id)?.ok_or(StoreError::RestaurantNotFound)?;

        let removed = diesel::delete(
            restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(restaurant.id)),
        )
        .execute(conn)?;
        diesel::delete(restaurants::table.find(restaurant.id)).execute(conn)?;

        tracing::debug!(restaurant_id = restaurant.id, removed, "deleted restaurant");
        Ok(())
    })
}

/// Persists a pairing after checking both parents exist. The price range is
/// the caller's to validate; the table's CHECK constraint rejects anything
/// that slips through, rolling the transaction back.
pub fn create_restaurant_pizza(
    conn: &mut SqliteConnection,
    new_restaurant_pizza: &NewRestaurantPizza,
) -> Result<RestaurantPizzaDetails, StoreError> {
    conn.immediate_transaction::<_, StoreError, _>(|conn| {
        let pizza = find_pizza(conn, new_restaurant_pizza.pizza_id)?;
        let restaurant = find_restaurant(conn, new_restaurant_pizza.restaurant_id)?;
        let (Some(pizza), Some(restaurant)) = (pizza, restaurant) else {
            return Err(StoreError::InvalidReference);
        };

        let restaurant_pizza = diesel::insert_into(restaurant_pizzas::table)
            .values(new_restaurant_pizza)
            .returning(RestaurantPizza::as_returning())
            .get_result(conn)?;

        Ok(RestaurantPizzaDetails {
            restaurant_pizza,
            pizza,
            restaurant,
        })
    })
}

pub fn insert_restaurant(
    conn: &mut SqliteConnection,
    new_restaurant: &NewRestaurant,
) -> QueryResult<Restaurant> {
    diesel::insert_into(restaurants::table)
        .values(new_restaurant)
        .returning(Restaurant::as_returning())
        .get_result(conn)
}

pub fn insert_pizza(conn: &mut SqliteConnection, new_pizza: &NewPizza) -> QueryResult<Pizza> {
    diesel::insert_into(pizzas::table)
        .values(new_pizza)
        .returning(Pizza::as_returning())
        .get_result(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_migrations;
    use diesel::connection::SimpleConnection;

    // Each test gets its own in-memory database with the schema applied.
    fn setup_database() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        conn.batch_execute("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    fn add_restaurant(conn: &mut SqliteConnection, name: &str) -> Restaurant {
        insert_restaurant(
            conn,
            &NewRestaurant {
                name,
                address: "Test Address",
            },
        )
        .unwrap()
    }

    fn add_pizza(conn: &mut SqliteConnection, name: &str) -> Pizza {
        insert_pizza(
            conn,
            &NewPizza {
                name,
                ingredients: "Dough, Tomato Sauce, Cheese",
            },
        )
        .unwrap()
    }

    fn pair(
        conn: &mut SqliteConnection,
        restaurant: &Restaurant,
        pizza: &Pizza,
        price: i32,
    ) -> RestaurantPizzaDetails {
        create_restaurant_pizza(
            conn,
            &NewRestaurantPizza {
                price,
                restaurant_id: restaurant.id,
                pizza_id: pizza.id,
            },
        )
        .unwrap()
    }

    fn count_restaurant_pizzas(conn: &mut SqliteConnection) -> i64 {
        restaurant_pizzas::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn test_list_restaurants() {
        let conn = &mut setup_database();
        add_restaurant(conn, "Test Restaurant 1");
        add_restaurant(conn, "Test Restaurant 2");

        let results = list_restaurants(conn).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Test Restaurant 1");
        assert_eq!(results[1].name, "Test Restaurant 2");
    }

    #[test]
    fn test_list_pizzas() {
        let conn = &mut setup_database();
        add_pizza(conn, "Emma");
        add_pizza(conn, "Geri");

        let results = list_pizzas(conn).unwrap();

        assert_eq!(
            results.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["Emma", "Geri"]
        );
    }

    #[test]
    fn test_find_restaurant_missing() {
        let conn = &mut setup_database();

        assert_eq!(find_restaurant(conn, 42).unwrap(), None);
    }

    #[test]
    fn test_get_restaurant_with_pizzas() {
        let conn = &mut setup_database();
        let restaurant = add_restaurant(conn, "Test Restaurant");
        let other = add_restaurant(conn, "Other Restaurant");
        let emma = add_pizza(conn, "Emma");
        let geri = add_pizza(conn, "Geri");
        pair(conn, &restaurant, &emma, 5);
        pair(conn, &restaurant, &geri, 12);
        pair(conn, &other, &emma, 7);

        let (found, pizzas) = get_restaurant_with_pizzas(conn, restaurant.id).unwrap();

        assert_eq!(found, restaurant);
        assert_eq!(pizzas.len(), 2);
        assert!(pizzas.iter().all(|d| d.restaurant == restaurant));
        assert_eq!(pizzas[0].pizza, emma);
        assert_eq!(pizzas[0].restaurant_pizza.price, 5);
        assert_eq!(pizzas[1].pizza, geri);
        assert_eq!(pizzas[1].restaurant_pizza.price, 12);
    }

    #[test]
    fn test_get_restaurant_with_pizzas_missing() {
        let conn = &mut setup_database();

        let result = get_restaurant_with_pizzas(conn, 7);

        assert!(matches!(result, Err(StoreError::RestaurantNotFound)));
    }

    #[test]
    fn test_create_restaurant_pizza() {
        let conn = &mut setup_database();
        let restaurant = add_restaurant(conn, "Test Restaurant");
        let pizza = add_pizza(conn, "Emma");

        let created = pair(conn, &restaurant, &pizza, 15);

        assert_eq!(created.restaurant_pizza.price, 15);
        assert_eq!(created.restaurant_pizza.restaurant_id, restaurant.id);
        assert_eq!(created.restaurant_pizza.pizza_id, pizza.id);
        assert_eq!(created.pizza, pizza);
        assert_eq!(created.restaurant, restaurant);
        assert_eq!(count_restaurant_pizzas(conn), 1);
    }

    #[test]
    fn test_create_restaurant_pizza_invalid_reference() {
        let conn = &mut setup_database();
        let restaurant = add_restaurant(conn, "Test Restaurant");
        let pizza = add_pizza(conn, "Emma");

        let missing_pizza = create_restaurant_pizza(
            conn,
            &NewRestaurantPizza {
                price: 10,
                restaurant_id: restaurant.id,
                pizza_id: pizza.id + 100,
            },
        );
        let missing_restaurant = create_restaurant_pizza(
            conn,
            &NewRestaurantPizza {
                price: 10,
                restaurant_id: restaurant.id + 100,
                pizza_id: pizza.id,
            },
        );

        assert!(matches!(missing_pizza, Err(StoreError::InvalidReference)));
        assert!(matches!(missing_restaurant, Err(StoreError::InvalidReference)));
        assert_eq!(count_restaurant_pizzas(conn), 0);
    }

    #[test]
    fn test_create_restaurant_pizza_rolls_back_on_constraint_violation() {
        let conn = &mut setup_database();
        let restaurant = add_restaurant(conn, "Test Restaurant");
        let pizza = add_pizza(conn, "Emma");

        let result = create_restaurant_pizza(
            conn,
            &NewRestaurantPizza {
                price: 31,
                restaurant_id: restaurant.id,
                pizza_id: pizza.id,
            },
        );

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert_eq!(count_restaurant_pizzas(conn), 0);
    }

    #[test]
    fn test_delete_restaurant_removes_only_its_pairings() {
        let conn = &mut setup_database();
        let restaurant = add_restaurant(conn, "Test Restaurant");
        let other = add_restaurant(conn, "Other Restaurant");
        let pizza = add_pizza(conn, "Emma");
        pair(conn, &restaurant, &pizza, 5);
        pair(conn, &restaurant, &pizza, 6);
        let kept = pair(conn, &other, &pizza, 7);

        delete_restaurant(conn, restaurant.id).unwrap();

        assert_eq!(find_restaurant(conn, restaurant.id).unwrap(), None);
        assert_eq!(find_restaurant(conn, other.id).unwrap(), Some(other.clone()));
        assert_eq!(find_pizza(conn, pizza.id).unwrap(), Some(pizza));
        assert_eq!(count_restaurant_pizzas(conn), 1);
        assert_eq!(restaurant_pizzas_of(conn, other.id).unwrap(), vec![kept]);
    }

    #[test]
    fn test_writes_wait_for_concurrent_writer() {
        let dir = tempfile::tempdir().unwrap();
        let database_url = dir.path().join("pizza.db");
        let pool = crate::create_pool(database_url.to_str().unwrap(), 2).unwrap();

        let mut conn = pool.get().unwrap();
        run_migrations(&mut conn).unwrap();
        let restaurant = add_restaurant(&mut conn, "Test Restaurant");
        let other = add_restaurant(&mut conn, "Other Restaurant");
        let pizza = add_pizza(&mut conn, "Emma");

        let mut writer = pool.get().unwrap();
        writer
            .batch_execute(
                "BEGIN IMMEDIATE; INSERT INTO pizzas (name, ingredients) VALUES ('Geri', 'Dough');",
            )
            .unwrap();
        let committer = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(200));
            writer.batch_execute("COMMIT;").unwrap();
        });

        let created = create_restaurant_pizza(
            &mut conn,
            &NewRestaurantPizza {
                price: 10,
                restaurant_id: restaurant.id,
                pizza_id: pizza.id,
            },
        );
        let deleted = delete_restaurant(&mut conn, other.id);
        committer.join().unwrap();

        assert_eq!(created.unwrap().restaurant_pizza.price, 10);
        assert!(deleted.is_ok());
        assert_eq!(list_pizzas(&mut conn).unwrap().len(), 2);
        assert_eq!(find_restaurant(&mut conn, other.id).unwrap(), None);
    }

    #[test]
    fn test_delete_restaurant_missing() {
        let conn = &mut setup_database();
        add_restaurant(conn, "Test Restaurant");

        let result = delete_restaurant(conn, 99);

        assert!(matches!(result, Err(StoreError::RestaurantNotFound)));
        assert_eq!(list_restaurants(conn).unwrap().len(), 1);
    }
}
