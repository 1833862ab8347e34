use actix_web::{post, web, HttpResponse, Responder};

use crate::{entities::contact::ContactForm, errors::AppError, AppState};

#[post("/contact")]
pub async fn create_contact(
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    let mut form = form.into_inner();

    let response = state.contact_handler.submit(&mut form).await?;

    Ok(HttpResponse::Ok().json(response))
}
