use async_trait::async_trait;

use vouch_identity::{IdentityDirectory, IdentityRecord, Result};

/// One roster entry in the mock directory.
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    /// User-facing client code, doubles as the wire `client_id`.
    pub code: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub active: bool,
}

impl DirectoryRecord {
    fn to_identity(&self) -> IdentityRecord {
        IdentityRecord {
            client_id: self.code.clone(),
            display_name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// In-memory client roster. Lookups only ever return active records.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    records: Vec<DirectoryRecord>,
}

impl MockDirectory {
    pub fn new(records: Vec<DirectoryRecord>) -> Self {
        Self { records }
    }

    /// Sample roster used by the mock API and the simulator.
    pub fn seeded() -> Self {
        let sample = [
            ("ACME-1001", "Alice Johnson", "+15551234567", "alice@example.com"),
            ("ACME-1002", "Bob Smith", "+15559876543", "bob@example.com"),
            ("GLX-2001", "Carol Davis", "+442071234567", "carol@example.com"),
            ("GLX-2002", "Dan Wilson", "+919876543210", "dan@example.com"),
        ];
        Self::new(
            sample
                .into_iter()
                .map(|(code, name, phone, email)| DirectoryRecord {
                    code: code.into(),
                    name: name.into(),
                    phone: phone.into(),
                    email: email.into(),
                    active: true,
                })
                .collect(),
        )
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<&DirectoryRecord> {
        self.records
            .iter()
            .find(|r| r.active && r.phone == phone)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&DirectoryRecord> {
        self.records.iter().find(|r| r.active && r.code == code)
    }
}

#[async_trait]
impl IdentityDirectory for MockDirectory {
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<IdentityRecord>> {
        Ok(self.find_by_phone(phone).map(DirectoryRecord::to_identity))
    }

    async fn lookup_by_client_code(&self, code: &str) -> Result<Option<IdentityRecord>> {
        Ok(self.find_by_code(code).map(DirectoryRecord::to_identity))
    }
}
