// Response envelope: `{ success, data?, message? }`

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::Error;

/// The wrapper every backend response is expected to carry.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, treating an absent `data` as a failure.
    pub fn into_data(self) -> Result<T, Error> {
        self.data.ok_or(Error::MissingData {
            message: self.message,
        })
    }
}

/// Classify a raw HTTP response into an envelope or a wire error.
///
/// - 401 / 403 map to `Unauthorized` / `Forbidden` regardless of body.
/// - Other non-2xx: a parseable `success: false` envelope becomes
///   `Rejected` (keeps the server's message); anything else is `Http`.
/// - 2xx: the body must parse as an envelope; `success: false` is `Rejected`.
pub(crate) fn classify<T: serde::de::DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Envelope<T>, Error> {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized {
            message: loose_message(body),
        });
    }
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Forbidden {
            message: loose_message(body),
        });
    }

    if !status.is_success() {
        return Err(match serde_json::from_str::<Envelope<IgnoredAny>>(body) {
            Ok(env) if !env.success => Error::Rejected {
                message: env.message,
                status: status.as_u16(),
            },
            _ => Error::Http {
                status: status.as_u16(),
                body: body.to_owned(),
            },
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.to_owned(),
        })?;

    if envelope.success {
        Ok(envelope)
    } else {
        Err(Error::Rejected {
            message: envelope.message,
            status: status.as_u16(),
        })
    }
}

fn loose_message(body: &str) -> Option<String> {
    serde_json::from_str::<Envelope<IgnoredAny>>(body)
        .ok()
        .and_then(|env| env.message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn success_envelope_yields_data() {
        let env: Envelope<Vec<u32>> =
            classify(StatusCode::OK, r#"{"success":true,"data":[1,2]}"#).unwrap();
        assert_eq!(env.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn success_without_data_is_missing_data() {
        let env: Envelope<Vec<u32>> = classify(StatusCode::OK, r#"{"success":true}"#).unwrap();
        assert!(matches!(env.into_data(), Err(Error::MissingData { .. })));
    }

    #[test]
    fn logical_failure_keeps_message() {
        let err = classify::<u32>(StatusCode::OK, r#"{"success":false,"message":"in use"}"#)
            .unwrap_err();
        assert_eq!(err.server_message(), Some("in use"));
    }

    #[test]
    fn non_2xx_with_envelope_is_rejected() {
        let err = classify::<u32>(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"sn already exists"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 400, .. }));
    }

    #[test]
    fn non_2xx_without_envelope_is_http() {
        let err = classify::<u32>(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(matches!(err, Error::Http { status: 502, .. }));
    }

    #[test]
    fn forbidden_wins_over_body() {
        let err = classify::<u32>(
            StatusCode::FORBIDDEN,
            r#"{"success":false,"message":"role lacks power"}"#,
        )
        .unwrap_err();
        assert!(err.is_forbidden());
        assert_eq!(err.server_message(), Some("role lacks power"));
    }

    #[test]
    fn garbage_2xx_body_is_deserialization_error() {
        let err = classify::<u32>(StatusCode::OK, "<html/>").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
