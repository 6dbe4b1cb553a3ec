//! Token minting for tests.

use super::TestApp;
use uuid::Uuid;

/// Test user with a signed access token.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Mint a token for a fresh user id.
pub fn register_test_user(app: &TestApp) -> TestUser {
    let user_id = Uuid::new_v4();
    let token = app
        .jwt
        .issue_access_token(user_id)
        .expect("Failed to issue test token");
    TestUser { user_id, token }
}
