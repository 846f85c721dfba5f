/*
[INPUT]:  Session-scoped API token issued by the login flow
[OUTPUT]: Opaque credentials attached to outbound requests
[POS]:    Auth layer - handles ATI backend authentication
[UPDATE]: When the credential shape or header scheme changes
*/

pub mod credentials;

pub use credentials::Credentials;
