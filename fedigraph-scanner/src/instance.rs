use serde::{Deserialize, Serialize};

/// A server in the federated network, identified by hostname.
///
/// The `users` count comes from the instance directory and is carried through
/// to the graph unchanged; instances loaded from a plain hosts file get 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub users: u64,
}

impl Instance {
    pub fn new(name: impl Into<String>, users: u64) -> Self {
        Self {
            name: name.into(),
            users,
        }
    }
}
