use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

mod databases;
mod routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let pool = databases::setup_backend().await?;
    let data = web::Data::new(pool.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(routes::messages::init)
    })
    .bind(("127.0.0.1", 5555))?;

    println!("🚀 Server running at http://127.0.0.1:5555");
    server.run().await?;

    pool.close().await;
    Ok(())
}
