mod db;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    println!("🚀 Starting server on http://127.0.0.1:8080");

    let db_data = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            // Les clients historiques appellent /api/utilisateurs/ avec un
            // slash final: on le retire avant le routage
            .wrap(NormalizePath::trim())
            .configure(routes::configure_routes)
    })
        .bind(("127.0.0.1", 8080))?
        .run()
        .await
}
