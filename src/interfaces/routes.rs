use actix_web::web;

use crate::handlers::{contact::create_contact, home::home, json_error, system::health_check};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_error::json_config());

    cfg.service(home);
    cfg.service(health_check);

    cfg.service(web::scope("/api/v1").service(create_contact));
}
