use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use chrono::Utc;
use log::error;
use serde_json::json;
use sqlx::SqlitePool;

use crate::databases::messages::{Message, NewMessage, UpdateMessage};

#[get("/messages")]
pub async fn get_messages(db: web::Data<SqlitePool>) -> impl Responder {
    let result = sqlx::query_as::<_, Message>(
        "SELECT * FROM messages ORDER BY created_at ASC",
    )
    .fetch_all(db.get_ref())
    .await;

    match result {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(e) => {
            error!("Error fetching messages: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/messages/{id}")]
pub async fn get_message_by_id(
    db: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    let result = sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
        .bind(id)
        .fetch_optional(db.get_ref())
        .await;

    match result {
        Ok(Some(message)) => HttpResponse::Ok().json(message),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Message not found" })),
        Err(e) => {
            error!("Error fetching message {}: {:?}", id, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/messages")]
pub async fn create_message(
    db: web::Data<SqlitePool>,
    payload: web::Json<NewMessage>,
) -> impl Responder {
    let NewMessage { body, username } = payload.into_inner();

    let (body, username) = match (body, username) {
        (Some(body), Some(username)) => (body, username),
        _ => return HttpResponse::BadRequest().json(json!({ "error": "Invalid input" })),
    };

    // One clock read, so created_at and updated_at start out equal
    let now = Utc::now();

    let result = sqlx::query_as::<_, Message>(
        "INSERT INTO messages (body, username, created_at, updated_at)
         VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(&body)
    .bind(&username)
    .bind(now)
    .bind(now)
    .fetch_one(db.get_ref())
    .await;

    match result {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => {
            error!("Insert message error: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[patch("/messages/{id}")]
pub async fn update_message(
    db: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateMessage>,
) -> impl Responder {
    let id = path.into_inner();

    // Zero rows back means the id does not exist. A payload without "body"
    // still runs a write, so the commit round-trip happens either way.
    let result = match payload.into_inner().body {
        Some(body) => {
            sqlx::query_as::<_, Message>(
                "UPDATE messages SET body = ?, updated_at = ? WHERE id = ? RETURNING *",
            )
            .bind(body)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(db.get_ref())
            .await
        }
        None => {
            sqlx::query_as::<_, Message>(
                "UPDATE messages SET updated_at = updated_at WHERE id = ? RETURNING *",
            )
            .bind(id)
            .fetch_optional(db.get_ref())
            .await
        }
    };

    match result {
        Ok(Some(updated)) => HttpResponse::Ok().json(updated),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Message not found" })),
        Err(e) => {
            error!("Update message {} error: {:?}", id, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/messages/{id}")]
pub async fn delete_message(
    db: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(id)
        .execute(db.get_ref())
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            HttpResponse::NotFound().json(json!({ "error": "Message not found" }))
        }
        Ok(_) => HttpResponse::Ok().json(json!({ "message": "Message deleted" })),
        Err(e) => {
            error!("Delete message {} error: {:?}", id, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_messages);
    cfg.service(get_message_by_id);
    cfg.service(create_message);
    cfg.service(update_message);
    cfg.service(delete_message);
}
