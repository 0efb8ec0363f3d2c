//! Shared validation helpers for inbound HTTP adapters.

use serde::Deserialize;

use crate::domain::{Error, ReadingRejection, UserId};

/// Path segment naming the user a request is about.
#[derive(Debug, Deserialize)]
pub(crate) struct UserPath {
    #[serde(rename = "userId")]
    pub(crate) user_id: String,
}

impl UserPath {
    /// Validate the raw segment into a [`UserId`].
    pub(crate) fn into_user_id(self) -> Result<UserId, Error> {
        UserId::new(self.user_id).map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Map a rejected reading to a 400 carrying the fixed client message.
pub(crate) fn rejection_error(rejection: ReadingRejection) -> Error {
    Error::invalid_request(rejection.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("user1", true)]
    #[case(" ", false)]
    fn user_path_requires_non_blank_id(#[case] raw: &str, #[case] accepted: bool) {
        let result = UserPath {
            user_id: raw.to_owned(),
        }
        .into_user_id();
        assert_eq!(result.is_ok(), accepted);
        if let Err(err) = result {
            assert_eq!(err.code(), ErrorCode::InvalidRequest);
        }
    }

    #[rstest]
    fn rejection_error_keeps_fixed_message() {
        let err = rejection_error(ReadingRejection::OutOfRange);
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "הערכים לא הגיוניים");
    }
}
