//! Operation dispatch endpoint used by the conversational layer.

use actix_web::{post, web, Responder};

use crate::{
    aggregator::{OperationDispatcher, OperationRequest},
    configuration::{AppState, State},
    error::Error,
};

#[post("/operations")]
pub async fn execute(
    state: web::Data<AppState<State>>,
    request: web::Json<OperationRequest>,
) -> Result<impl Responder, Error> {
    let dispatcher = OperationDispatcher::new(&state);
    let result = dispatcher.execute(&request).await?;

    Ok(web::Json(result))
}
