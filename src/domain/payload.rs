use serde::de::DeserializeOwned;

pub const INVALID_BODY: &str = "Request body must be valid JSON.";

/// A request body held undecoded until the caller is ready for it.
///
/// `json` is `None` when the request did not declare a JSON content type; such
/// a body decodes like an empty one, so every field rule still reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBody {
    json: Option<Vec<u8>>,
}

impl RawBody {
    pub fn json(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            json: Some(bytes.into()),
        }
    }

    /// Empty bodies decode to `T::default()`. Anything serde rejects yields a
    /// single fixed message; parser detail stays out of client responses.
    pub fn decode<T>(&self) -> Result<T, Vec<String>>
    where
        T: DeserializeOwned + Default,
    {
        match &self.json {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
                serde_json::from_slice(bytes).map_err(|_| vec![INVALID_BODY.to_string()])
            }
            _ => Ok(T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::CoursePayload;
    use crate::domain::user::RegisterUser;

    #[test]
    fn test_missing_or_blank_body_decodes_to_default() {
        let payload: RegisterUser = RawBody::default().decode().unwrap();
        assert!(payload.first_name.is_none());

        let payload: CoursePayload = RawBody::json("  \n").decode().unwrap();
        assert!(payload.title.is_none());
    }

    #[test]
    fn test_decodes_json_body() {
        let payload: CoursePayload = RawBody::json(r#"{"title": "New", "materialsNeeded": null}"#)
            .decode()
            .unwrap();
        assert_eq!(payload.title, Some(Some("New".to_string())));
        assert_eq!(payload.materials_needed, Some(None));
        assert_eq!(payload.description, None);
    }

    #[test]
    fn test_rejections_carry_fixed_message() {
        for body in ["{ not json", r#"{"title": 5}"#, "[1, 2]"] {
            let err = RawBody::json(body).decode::<CoursePayload>().unwrap_err();
            assert_eq!(err, vec![INVALID_BODY.to_string()], "body: {}", body);
        }
    }
}
