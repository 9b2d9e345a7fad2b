//! Push token endpoint errors

use salvo::http::StatusError;
use tracing::error;

use aldaba_app::domain::push_tokens::PushTokensServiceError;

pub(crate) fn into_status_error(error: PushTokensServiceError) -> StatusError {
    match error {
        PushTokensServiceError::MissingRequiredData | PushTokensServiceError::InvalidData => {
            StatusError::bad_request().brief("Datos inválidos")
        }
        PushTokensServiceError::Sql(source) => {
            error!("storage failure handling push tokens: {source}");

            StatusError::internal_server_error()
        }
    }
}
