//! Sign-in placeholder. No credentials are exchanged; login always yields the
//! same demo identity.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: String,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StubAuth;

impl StubAuth {
    pub fn login(&self) -> User {
        tracing::info!("Stub login");
        User {
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
        }
    }
}
