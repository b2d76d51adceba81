use std::{path::Path, str::FromStr};

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use crate::{
    data::{Comment, Dish, Leader},
    service::DishService,
};

pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database url {url}"))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options)
        .await
        .with_context(|| format!("fail to open database {url}"))?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(db_conn: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS dish (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL,
    image       TEXT NOT NULL DEFAULT '',
    category    TEXT NOT NULL DEFAULT '',
    label       TEXT NOT NULL DEFAULT '',
    price       TEXT NOT NULL DEFAULT '',
    featured    BOOLEAN NOT NULL DEFAULT FALSE,
    description TEXT NOT NULL DEFAULT ''
)"#,
    )
    .execute(db_conn)
    .await
    .context("fail to create dish table")?;

    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS comment (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    dish    TEXT NOT NULL REFERENCES dish (id),
    author  TEXT NOT NULL,
    comment TEXT NOT NULL,
    rating  INTEGER NOT NULL,
    date    TEXT NOT NULL
)"#,
    )
    .execute(db_conn)
    .await
    .context("fail to create comment table")?;

    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS leader (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL,
    image       TEXT NOT NULL DEFAULT '',
    designation TEXT NOT NULL DEFAULT '',
    abbr        TEXT NOT NULL DEFAULT '',
    featured    BOOLEAN NOT NULL DEFAULT FALSE,
    description TEXT NOT NULL DEFAULT ''
)"#,
    )
    .execute(db_conn)
    .await
    .context("fail to create leader table")?;

    Ok(())
}

#[derive(sqlx::FromRow)]
struct DishRow {
    id: String,
    name: String,
    image: String,
    category: String,
    label: String,
    price: String,
    featured: bool,
    description: String,
}

impl DishRow {
    fn with_comments(self, comments: Vec<Comment>) -> Dish {
        let DishRow {
            id,
            name,
            image,
            category,
            label,
            price,
            featured,
            description,
        } = self;
        Dish {
            id,
            name,
            image,
            category,
            label,
            price,
            featured,
            description,
            comments,
        }
    }
}

const DISH_COLUMNS: &str = "id, name, image, category, label, price, featured, description";

async fn get_comments(db_conn: &SqlitePool, dish: &str) -> anyhow::Result<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(
        "SELECT author, comment, rating, date FROM comment WHERE dish = ? ORDER BY id",
    )
    .bind(dish)
    .fetch_all(db_conn)
    .await
    .with_context(|| format!("fail to get comments of dish {dish}"))?;
    Ok(comments)
}

pub async fn add_dish(db_conn: &SqlitePool, dish: &Dish) -> anyhow::Result<()> {
    let mut tx = db_conn.begin().await?;

    sqlx::query(
        r#"
INSERT INTO dish
    (id, name, image, category, label, price, featured, description)
VALUES
    (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&dish.id)
    .bind(&dish.name)
    .bind(&dish.image)
    .bind(&dish.category)
    .bind(&dish.label)
    .bind(&dish.price)
    .bind(dish.featured)
    .bind(&dish.description)
    .execute(&mut tx)
    .await
    .with_context(|| format!("fail to add new dish {}", dish.id))?;

    for comment in &dish.comments {
        insert_comment(&mut tx, &dish.id, comment).await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn insert_comment(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    dish: &str,
    comment: &Comment,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO comment (dish, author, comment, rating, date) VALUES (?, ?, ?, ?, ?)")
        .bind(dish)
        .bind(&comment.author)
        .bind(&comment.comment)
        .bind(comment.rating)
        .bind(&comment.date)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("fail to add comment to dish {dish}"))?;
    Ok(())
}

pub async fn add_leader(db_conn: &SqlitePool, leader: &Leader) -> anyhow::Result<()> {
    sqlx::query(
        r#"
INSERT INTO leader
    (id, name, image, designation, abbr, featured, description)
VALUES
    (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&leader.id)
    .bind(&leader.name)
    .bind(&leader.image)
    .bind(&leader.designation)
    .bind(&leader.abbr)
    .bind(leader.featured)
    .bind(&leader.description)
    .execute(db_conn)
    .await
    .with_context(|| format!("fail to add new leader {}", leader.id))?;
    Ok(())
}

pub async fn get_leaders(db_conn: &SqlitePool) -> anyhow::Result<Vec<Leader>> {
    let leaders = sqlx::query_as::<_, Leader>(
        "SELECT id, name, image, designation, abbr, featured, description FROM leader ORDER BY rowid",
    )
    .fetch_all(db_conn)
    .await
    .context("fail to list leaders")?;
    Ok(leaders)
}

/// Content of a seed file: `{ "dishes": [...], "leaders": [...] }`.
#[derive(serde::Deserialize)]
struct Seed {
    #[serde(default)]
    dishes: Vec<Dish>,
    #[serde(default)]
    leaders: Vec<Leader>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub dishes: usize,
    pub leaders: usize,
}

/// Insert every dish and leader of a JSON seed file whose id is not stored yet.
pub async fn seed_from_file(db_conn: &SqlitePool, path: &Path) -> anyhow::Result<SeedReport> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("fail to read seed file {}", path.display()))?;
    let seed: Seed = serde_json::from_str(&raw)
        .with_context(|| format!("fail to parse seed file {}", path.display()))?;

    let mut report = SeedReport::default();
    for dish in &seed.dishes {
        if get_dish(db_conn, &dish.id).await?.is_some() {
            tracing::debug!("dish {} already stored, skip seeding it", dish.id);
            continue;
        }
        add_dish(db_conn, dish).await?;
        report.dishes += 1;
    }

    let known: Vec<String> = get_leaders(db_conn)
        .await?
        .into_iter()
        .map(|leader| leader.id)
        .collect();
    for leader in &seed.leaders {
        if known.contains(&leader.id) {
            tracing::debug!("leader {} already stored, skip seeding it", leader.id);
            continue;
        }
        add_leader(db_conn, leader).await?;
        report.leaders += 1;
    }
    Ok(report)
}

pub async fn get_dish_ids(db_conn: &SqlitePool) -> anyhow::Result<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>("SELECT id FROM dish ORDER BY rowid")
        .fetch_all(db_conn)
        .await
        .context("fail to list dish ids")?;
    Ok(ids)
}

pub async fn get_dishes(db_conn: &SqlitePool) -> anyhow::Result<Vec<Dish>> {
    let rows = sqlx::query_as::<_, DishRow>(&format!(
        "SELECT {DISH_COLUMNS} FROM dish ORDER BY rowid"
    ))
    .fetch_all(db_conn)
    .await
    .context("fail to list dishes")?;

    let mut dishes = Vec::with_capacity(rows.len());
    for row in rows {
        let comments = get_comments(db_conn, &row.id).await?;
        dishes.push(row.with_comments(comments));
    }
    Ok(dishes)
}

pub async fn get_dish(db_conn: &SqlitePool, id: &str) -> anyhow::Result<Option<Dish>> {
    let row = sqlx::query_as::<_, DishRow>(&format!("SELECT {DISH_COLUMNS} FROM dish WHERE id = ?"))
        .bind(id)
        .fetch_optional(db_conn)
        .await
        .with_context(|| format!("fail to get dish {id}"))?;

    let Some(row) = row else { return Ok(None) };
    let comments = get_comments(db_conn, id).await?;
    Ok(Some(row.with_comments(comments)))
}

/// Overwrite the stored dish, comments included, and read it back.
pub async fn put_dish(db_conn: &SqlitePool, dish: &Dish) -> anyhow::Result<Option<Dish>> {
    let mut tx = db_conn.begin().await?;

    let updated = sqlx::query(
        r#"
UPDATE dish SET
    name = ?, image = ?, category = ?, label = ?, price = ?, featured = ?, description = ?
WHERE id = ?"#,
    )
    .bind(&dish.name)
    .bind(&dish.image)
    .bind(&dish.category)
    .bind(&dish.label)
    .bind(&dish.price)
    .bind(dish.featured)
    .bind(&dish.description)
    .bind(&dish.id)
    .execute(&mut tx)
    .await
    .with_context(|| format!("fail to update dish {}", dish.id))?
    .rows_affected();

    if updated == 0 {
        // nothing to commit
        return Ok(None);
    }

    sqlx::query("DELETE FROM comment WHERE dish = ?")
        .bind(&dish.id)
        .execute(&mut tx)
        .await
        .with_context(|| format!("fail to clear comments of dish {}", dish.id))?;
    for comment in &dish.comments {
        insert_comment(&mut tx, &dish.id, comment).await?;
    }

    tx.commit().await?;
    get_dish(db_conn, &dish.id).await
}

impl DishService for SqlitePool {
    async fn get_dishes(&self) -> anyhow::Result<Vec<Dish>> {
        get_dishes(self).await
    }

    async fn get_dish_ids(&self) -> anyhow::Result<Vec<String>> {
        get_dish_ids(self).await
    }

    async fn get_dish(&self, id: &str) -> anyhow::Result<Dish> {
        get_dish(self, id)
            .await?
            .with_context(|| format!("no dish with id {id}"))
    }

    async fn put_dish(&self, dish: &Dish) -> anyhow::Result<Dish> {
        put_dish(self, dish)
            .await?
            .with_context(|| format!("no dish with id {}", dish.id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::DishBuilder;

    pub(crate) async fn memory_pool() -> SqlitePool {
        // every connection to :memory: is a fresh database, so keep just one
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    pub(crate) fn comment(author: &str, text: &str) -> Comment {
        Comment {
            author: author.to_string(),
            comment: text.to_string(),
            rating: 4,
            date: "2026-10-16T08:30:00.000Z".to_string(),
        }
    }

    pub(crate) async fn seeded_pool() -> SqlitePool {
        let db = memory_pool().await;
        for (id, name) in [("0", "Uthappizza"), ("1", "Zucchipakoda"), ("2", "Vadonut")] {
            let dish = DishBuilder::default()
                .id(id)
                .name(name)
                .comments(vec![comment("John Lemon", "Imagine all the eatables")])
                .build()
                .unwrap();
            add_dish(&db, &dish).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_ids_keep_insert_order() {
        let db = memory_pool().await;
        for id in ["b", "a", "c"] {
            let dish = DishBuilder::default().id(id).name(id).build().unwrap();
            add_dish(&db, &dish).await.unwrap();
        }
        assert_eq!(get_dish_ids(&db).await.unwrap(), ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let db = seeded_pool().await;
        let dish = DishBuilder::default().id("0").name("again").build().unwrap();
        assert!(add_dish(&db, &dish).await.is_err());
    }

    #[tokio::test]
    async fn test_put_replaces_comments_in_order() {
        let db = seeded_pool().await;
        let mut dish = get_dish(&db, "1").await.unwrap().unwrap();
        assert_eq!(dish.comments.len(), 1);

        dish.comments.push(comment("Paul McVites", "Sends anyone to heaven"));
        dish.comments.push(comment("Michael Jaikishan", "Eat it, just eat it!"));
        dish.description = "Deep fried Zucchini".to_string();

        let stored = put_dish(&db, &dish).await.unwrap().unwrap();
        assert_eq!(stored, dish);

        dish.comments.remove(0);
        let stored = put_dish(&db, &dish).await.unwrap().unwrap();
        let authors: Vec<_> = stored.comments.iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, ["Paul McVites", "Michael Jaikishan"]);

        // other dishes keep their comments
        assert_eq!(get_dish(&db, "0").await.unwrap().unwrap().comments.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_dish() {
        let db = seeded_pool().await;
        assert!(get_dish(&db, "42").await.unwrap().is_none());

        let ghost = DishBuilder::default().id("42").name("ghost").build().unwrap();
        assert!(put_dish(&db, &ghost).await.unwrap().is_none());
        assert!(DishService::put_dish(&db, &ghost).await.is_err());
        assert_eq!(get_dish_ids(&db).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_seed_skips_known_dishes() {
        let db = seeded_pool().await;
        let path = std::env::temp_dir().join(format!("dish-menu-seed-{}.json", std::process::id()));
        let seed = r#"{
            "dishes": [
                {"id": "0", "name": "Uthappizza"},
                {"id": "3", "name": "ElaiCheese Cake", "featured": true,
                 "comments": [{"author": "25 Cent", "comment": "Divine", "rating": 5, "date": "2012-10-16T17:57:28.556Z"}]}
            ],
            "leaders": [
                {"id": "0", "name": "Peter Pan", "abbr": "CEO", "designation": "Chief Epicurious Officer"}
            ]
        }"#;
        tokio::fs::write(&path, seed).await.unwrap();

        let first = seed_from_file(&db, &path).await.unwrap();
        let again = seed_from_file(&db, &path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(first, SeedReport { dishes: 1, leaders: 1 });
        assert_eq!(again, SeedReport::default());
        assert_eq!(get_leaders(&db).await.unwrap()[0].abbr, "CEO");
        let cake = get_dish(&db, "3").await.unwrap().unwrap();
        assert!(cake.featured);
        assert_eq!(cake.comments[0].author, "25 Cent");
        assert_eq!(get_dishes(&db).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_leaders_keep_insert_order() {
        let db = memory_pool().await;
        assert!(get_leaders(&db).await.unwrap().is_empty());

        for (id, name, abbr) in [("1", "Dhanasekaran Witherspoon", "CFO"), ("0", "Peter Pan", "CEO")] {
            let leader = Leader {
                id: id.to_string(),
                name: name.to_string(),
                image: String::new(),
                designation: String::new(),
                abbr: abbr.to_string(),
                featured: abbr == "CEO",
                description: String::new(),
            };
            add_leader(&db, &leader).await.unwrap();
        }

        let leaders = get_leaders(&db).await.unwrap();
        let abbrs: Vec<_> = leaders.iter().map(|leader| leader.abbr.as_str()).collect();
        assert_eq!(abbrs, ["CFO", "CEO"]);
        assert!(leaders[1].featured);
    }
}
