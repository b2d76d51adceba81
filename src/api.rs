//! JSON api over the dish store, mounted under `/api/v1`.

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use sqlx::SqlitePool;

use crate::{data::Dish, db as db_api, form, menu};

pub struct ApiState {
    db_pool: SqlitePool,
}

impl ApiState {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[derive(serde::Serialize)]
struct ErrJsonResp {
    message: String,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("no dish with id {0}")]
    NotFound(String),

    #[error("no featured dish")]
    NoFeatured,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::NoFeatured => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Internal(err) = self {
            tracing::error!("fail to serve request: {err:#}");
        }
        HttpResponse::build(self.status_code()).json(ErrJsonResp {
            message: self.to_string(),
        })
    }
}

type ApiResult = Result<HttpResponse, ApiError>;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // fixed paths first, `{id}` would swallow them otherwise
    cfg.service(
        web::scope("/api/v1")
            .service(list_dishes)
            .service(list_dish_ids)
            .service(featured_dish)
            .service(show_dish)
            .service(update_dish)
            .service(list_leaders),
    );
}

#[derive(serde::Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[actix_web::get("/dishes")]
async fn list_dishes(data: web::Data<ApiState>, query: web::Query<SearchQuery>) -> ApiResult {
    let dishes = db_api::get_dishes(&data.db_pool).await?;
    let dishes = match &query.q {
        Some(pattern) => menu::filter_dishes(dishes, pattern),
        None => dishes,
    };
    Ok(HttpResponse::Ok().json(dishes))
}

#[actix_web::get("/dishes/ids")]
async fn list_dish_ids(data: web::Data<ApiState>) -> ApiResult {
    let ids = db_api::get_dish_ids(&data.db_pool).await?;
    Ok(HttpResponse::Ok().json(ids))
}

#[actix_web::get("/dishes/featured")]
async fn featured_dish(data: web::Data<ApiState>) -> ApiResult {
    let dishes = db_api::get_dishes(&data.db_pool).await?;
    match menu::featured(&dishes) {
        Some(dish) => Ok(HttpResponse::Ok().json(dish)),
        None => Err(ApiError::NoFeatured),
    }
}

#[actix_web::get("/leaders")]
async fn list_leaders(data: web::Data<ApiState>) -> ApiResult {
    let leaders = db_api::get_leaders(&data.db_pool).await?;
    Ok(HttpResponse::Ok().json(leaders))
}

#[derive(serde::Deserialize)]
struct DishPath {
    id: String,
}

#[actix_web::get("/dishes/{id}")]
async fn show_dish(data: web::Data<ApiState>, path: web::Path<DishPath>) -> ApiResult {
    match db_api::get_dish(&data.db_pool, &path.id).await? {
        Some(dish) => Ok(HttpResponse::Ok().json(dish)),
        None => Err(ApiError::NotFound(path.into_inner().id)),
    }
}

#[actix_web::put("/dishes/{id}")]
async fn update_dish(
    data: web::Data<ApiState>,
    path: web::Path<DishPath>,
    body: web::Json<Dish>,
) -> ApiResult {
    let dish = body.into_inner();
    if dish.id != path.id {
        return Err(ApiError::BadRequest(format!(
            "dish id {} does not match path id {}",
            dish.id, path.id
        )));
    }
    check_comments(&dish)?;

    match db_api::put_dish(&data.db_pool, &dish).await? {
        Some(stored) => {
            tracing::info!("dish {} stored with {} comments", stored.id, stored.comments.len());
            Ok(HttpResponse::Ok().json(stored))
        }
        None => Err(ApiError::NotFound(dish.id)),
    }
}

fn check_comments(dish: &Dish) -> Result<(), ApiError> {
    for (i, comment) in dish.comments.iter().enumerate() {
        if !(1..=5).contains(&comment.rating) {
            return Err(ApiError::BadRequest(format!(
                "comment {i}: rating {} is not within 1 to 5",
                comment.rating
            )));
        }
        if let Err(errors) = form::validate_comment(comment) {
            let messages: Vec<_> = errors.iter().map(|(_, text)| text).collect();
            return Err(ApiError::BadRequest(format!("comment {i}: {}", messages.join(" "))));
        }
    }
    Ok(())
}
