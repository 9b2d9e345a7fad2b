//! Document endpoint errors

use salvo::http::StatusError;
use tracing::error;

use aldaba_app::domain::documents::DocumentsServiceError;

pub(crate) fn into_status_error(error: DocumentsServiceError) -> StatusError {
    match error {
        DocumentsServiceError::NotFound => StatusError::not_found(),
        DocumentsServiceError::MissingRequiredData | DocumentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Datos inválidos")
        }
        DocumentsServiceError::Sql(source) => {
            error!("storage failure handling documents: {source}");

            StatusError::internal_server_error()
        }
    }
}
