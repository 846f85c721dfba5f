/*
[INPUT]:  Dataverse API token from the user's session
[OUTPUT]: Credential handle applied to request builders
[POS]:    Auth layer - explicit credential passing
[UPDATE]: When the backend changes how sessions are authenticated
*/

use std::fmt;

use reqwest::RequestBuilder;

/// Opaque session credential for the ATI backend.
///
/// Passed explicitly into every authenticated call instead of being read from
/// ambient state, so callers decide which session an operation runs under.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_token: String,
}

impl Credentials {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Attach the credential to an outgoing request.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.api_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .finish()
    }
}
