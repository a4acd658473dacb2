pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{assert_error, assert_session_cleared, set_cookie_value};
#[allow(unused_imports)]
pub use mocks::{
    CannedFeeds, ProviderBehaviour, RecordingInvitationRepository, RefreshingAuthApi,
    ScriptedAuthProvider,
};
#[allow(unused_imports)]
pub use setup::{TestApp, TestResponse, TestSetupBuilder};
