use crate::error::SearchError;
use crate::models::{ErrorBody, FeatureCollection};

/// What came back from `POST /search`, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Turn a raw reply into results or the error to show.
pub fn interpret_reply(reply: &HttpReply) -> Result<FeatureCollection, SearchError> {
    let value: serde_json::Value = match serde_json::from_str(&reply.body) {
        Ok(v) => v,
        Err(_) if !reply.is_ok() => {
            let detail = if reply.body.is_empty() {
                reply.status_text.clone()
            } else {
                reply.body.clone()
            };
            return Err(SearchError::ServerUnparsable {
                status: reply.status,
                detail,
            });
        }
        Err(_) => return Err(SearchError::InvalidFormat),
    };

    if !reply.is_ok() {
        let message = serde_json::from_value::<ErrorBody>(value)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| format!("Request failed: {}", reply.status));
        return Err(SearchError::Server(message));
    }

    if !value.is_object() {
        return Err(SearchError::InvalidFormat);
    }
    serde_json::from_value(value).map_err(|_| SearchError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> HttpReply {
        HttpReply {
            status,
            status_text: match status {
                200 => "OK",
                401 => "Unauthorized",
                502 => "Bad Gateway",
                _ => "",
            }
            .to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success_with_features() {
        let fc = interpret_reply(&reply(
            200,
            r#"{"type":"FeatureCollection","features":[{"id":"a","properties":{}}]}"#,
        ))
        .unwrap();
        assert_eq!(fc.features.len(), 1);
    }

    #[test]
    fn test_success_with_loosely_typed_features() {
        let fc = interpret_reply(&reply(
            200,
            r#"{"features":[
                {"id":"a","properties":{"resolution":"3"},"geometry":{"type":"Point","coordinates":[1,2]}},
                {"id":"b","geometry":{"type":"GeometryCollection","geometries":[]}},
                {"id":"c","geometry":{"type":"Hexagon"}}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(fc.features.len(), 3);
    }

    #[test]
    fn test_success_without_features_key() {
        let fc = interpret_reply(&reply(200, "{}")).unwrap();
        assert!(fc.features.is_empty());
    }

    #[test]
    fn test_server_error_message_surfaced() {
        let err = interpret_reply(&reply(401, r#"{"error":"X"}"#)).unwrap_err();
        assert_eq!(err, SearchError::Server("X".into()));
        assert_eq!(err.inline_message(), "Search failed: X");
    }

    #[test]
    fn test_server_error_without_message() {
        let err = interpret_reply(&reply(500, r#"{"detail":"boom"}"#)).unwrap_err();
        assert_eq!(err.inline_message(), "Search failed: Request failed: 500");
    }

    #[test]
    fn test_server_error_with_empty_message() {
        let err = interpret_reply(&reply(503, r#"{"error":""}"#)).unwrap_err();
        assert_eq!(err, SearchError::Server("Request failed: 503".into()));
    }

    #[test]
    fn test_non_json_error_includes_body() {
        let err = interpret_reply(&reply(502, "<html>proxy</html>")).unwrap_err();
        assert_eq!(
            err.inline_message(),
            "Search failed: Server error: 502 - <html>proxy</html>"
        );
    }

    #[test]
    fn test_non_json_error_empty_body_uses_status_text() {
        let err = interpret_reply(&reply(502, "")).unwrap_err();
        assert_eq!(err.to_string(), "Server error: 502 - Bad Gateway");
    }

    #[test]
    fn test_non_json_success_is_format_error() {
        let err = interpret_reply(&reply(200, "not json")).unwrap_err();
        assert_eq!(
            err.inline_message(),
            "Search failed: Received an invalid response format from the server."
        );
    }

    #[test]
    fn test_json_that_is_not_an_object_is_format_error() {
        assert_eq!(
            interpret_reply(&reply(200, "null")).unwrap_err(),
            SearchError::InvalidFormat
        );
    }
}
