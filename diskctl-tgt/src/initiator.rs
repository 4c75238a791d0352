//! An iSCSI initiator, identified by IP address or IQN.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initiator {
    address: String,
    name: String,
}

impl Initiator {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// `tgtadm`'s wildcard value for "any initiator" in bind/unbind.
pub const ALL: &str = "ALL";
