use crate::data::Dish;

/// The calls a dish page makes to whatever holds the menu.
///
/// Implemented by [`sqlx::SqlitePool`] (see [`crate::db`]) for local use and by
/// [`crate::client::HttpDishService`] for talking to the api server.
#[allow(async_fn_in_trait)]
pub trait DishService {
    async fn get_dishes(&self) -> anyhow::Result<Vec<Dish>>;

    async fn get_dish_ids(&self) -> anyhow::Result<Vec<String>>;

    async fn get_dish(&self, id: &str) -> anyhow::Result<Dish>;

    /// Store the whole dish and answer with the stored copy.
    async fn put_dish(&self, dish: &Dish) -> anyhow::Result<Dish>;
}
