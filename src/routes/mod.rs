pub mod admin;
pub mod auth;
pub mod evenements;
pub mod health;
pub mod thematiques;
pub mod utilisateurs;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(utilisateurs::utilisateur_routes)
            .configure(thematiques::thematique_routes)
            .configure(evenements::evenement_routes),
    )
    .configure(admin::admin_routes);
}
