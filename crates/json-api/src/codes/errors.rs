//! QR code endpoint errors

use salvo::http::StatusError;
use tracing::error;

use aldaba_app::domain::access_codes::AccessCodesServiceError;

pub(crate) fn into_status_error(error: AccessCodesServiceError) -> StatusError {
    match error {
        AccessCodesServiceError::AlreadyExists => {
            StatusError::conflict().brief("El código ya existe")
        }
        AccessCodesServiceError::MissingRequiredData | AccessCodesServiceError::InvalidData => {
            StatusError::bad_request().brief("Datos inválidos")
        }
        AccessCodesServiceError::Sql(source) => {
            error!("storage failure handling access codes: {source}");

            StatusError::internal_server_error()
        }
        AccessCodesServiceError::Time(source) => {
            error!("timestamp failure handling access codes: {source}");

            StatusError::internal_server_error()
        }
    }
}
