use thiserror::Error;

use crate::error::Error;

#[derive(Error, Debug)]
pub enum BizflyApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Parse(String),
}

pub(crate) fn map_error(e: BizflyApiError) -> Error {
    use BizflyApiError::*;
    match e {
        Http(err) => Error::Provider(err.to_string()),
        Auth(msg) => Error::Credential(msg),
        Api {
            status: 401 | 403,
            message,
        } => Error::Credential(message),
        Api {
            status: 404,
            message,
        } => Error::NotFound(message),
        Api {
            status: 400,
            message,
        } => Error::InvalidInput(message),
        Api { status, message } => Error::Provider(format!("API error ({status}): {message}")),
        Parse(msg) => Error::Provider(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // --- Error Mapping Tests ---

    #[test]
    fn test_map_error_variants() {
        use BizflyApiError::*;

        assert_matches!(map_error(Auth("rejected".to_string())), Error::Credential(_));
        assert_matches!(
            map_error(Api {
                status: 401,
                message: "token expired".to_string()
            }),
            Error::Credential(_)
        );
        assert_matches!(
            map_error(Api {
                status: 404,
                message: "no such zone".to_string()
            }),
            Error::NotFound(_)
        );
        assert_matches!(
            map_error(Api {
                status: 400,
                message: "bad payload".to_string()
            }),
            Error::InvalidInput(_)
        );
        assert_matches!(
            map_error(Api {
                status: 500,
                message: "server error".to_string()
            }),
            Error::Provider(_)
        );
        assert_matches!(map_error(Parse("garbage".to_string())), Error::Provider(_));
    }

    #[test]
    fn test_map_error_keeps_status_in_message() {
        let err = map_error(BizflyApiError::Api {
            status: 503,
            message: "unavailable".to_string(),
        });
        assert_eq!(err.to_string(), "Provider error: API error (503): unavailable");
    }
}
