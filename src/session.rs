/// Supplies the bearer token and signed-in user id to screens.
///
/// Token issuance lives elsewhere; screens only read.
pub trait Session: Send + Sync {
    fn auth_token(&self) -> String;
    fn owner_id(&self) -> String;
}

/// Session fixed at start-up from configuration
#[derive(Debug, Clone)]
pub struct StaticSession {
    token: String,
    owner_id: String,
}

impl StaticSession {
    pub fn new(token: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            owner_id: owner_id.into(),
        }
    }
}

impl Session for StaticSession {
    fn auth_token(&self) -> String {
        self.token.clone()
    }

    fn owner_id(&self) -> String {
        self.owner_id.clone()
    }
}
