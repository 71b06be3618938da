//! Hand-written fakes for the capability traits, with call recording.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use {
    async_trait::async_trait,
    vouch_identity::{
        Error, IdentityDirectory, IdentityRecord, NotificationChannel, OtpChannel, Result,
    },
    vouch_sessions::VerifiedIdentity,
};

pub fn alice() -> IdentityRecord {
    IdentityRecord {
        client_id: "ACME-1001".into(),
        display_name: "Alice Johnson".into(),
        email: "alice@example.com".into(),
    }
}

pub fn carol() -> IdentityRecord {
    IdentityRecord {
        client_id: "GLX-2001".into(),
        display_name: "Carol Davis".into(),
        email: "carol@example.com".into(),
    }
}

pub fn verified(record: IdentityRecord) -> VerifiedIdentity {
    VerifiedIdentity {
        client_id: record.client_id,
        display_name: record.display_name,
        email: record.email,
    }
}

fn fault(context: &str) -> Error {
    Error::status(context, 500)
}

// ── Directory ───────────────────────────────────────────────────────────────

pub struct FakeDirectory {
    phone_record: Option<IdentityRecord>,
    code_record: Option<IdentityRecord>,
    fail: bool,
    phone_calls: Mutex<Vec<String>>,
    code_calls: Mutex<Vec<String>>,
}

impl FakeDirectory {
    fn with_records(
        phone_record: Option<IdentityRecord>,
        code_record: Option<IdentityRecord>,
        fail: bool,
    ) -> Self {
        Self {
            phone_record,
            code_record,
            fail,
            phone_calls: Mutex::new(Vec::new()),
            code_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_records(None, None, false)
    }

    pub fn with_phone(record: IdentityRecord) -> Self {
        Self::with_records(Some(record), None, false)
    }

    pub fn with_code(record: IdentityRecord) -> Self {
        Self::with_records(None, Some(record), false)
    }

    /// Every lookup errors, simulating an unreachable directory.
    pub fn failing() -> Self {
        Self::with_records(None, None, true)
    }

    pub fn phone_lookups(&self) -> Vec<String> {
        self.phone_calls.lock().unwrap().clone()
    }

    pub fn code_lookups(&self) -> Vec<String> {
        self.code_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityDirectory for FakeDirectory {
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<IdentityRecord>> {
        self.phone_calls.lock().unwrap().push(phone.to_string());
        if self.fail {
            return Err(fault("phone lookup"));
        }
        Ok(self.phone_record.clone())
    }

    async fn lookup_by_client_code(&self, code: &str) -> Result<Option<IdentityRecord>> {
        self.code_calls.lock().unwrap().push(code.to_string());
        if self.fail {
            return Err(fault("client code lookup"));
        }
        Ok(self.code_record.clone())
    }
}

// ── OTP channel ─────────────────────────────────────────────────────────────

pub struct FakeOtp {
    send_ok: bool,
    valid: AtomicBool,
    verify_fails: AtomicBool,
    send_calls: Mutex<Vec<String>>,
    verify_calls: Mutex<Vec<(String, String)>>,
}

impl FakeOtp {
    fn with_behavior(send_ok: bool, valid: bool) -> Self {
        Self {
            send_ok,
            valid: AtomicBool::new(valid),
            verify_fails: AtomicBool::new(false),
            send_calls: Mutex::new(Vec::new()),
            verify_calls: Mutex::new(Vec::new()),
        }
    }

    /// Dispatches succeed and any code validates.
    pub fn accepting() -> Self {
        Self::with_behavior(true, true)
    }

    /// Dispatches succeed but every code is rejected.
    pub fn rejecting() -> Self {
        Self::with_behavior(true, false)
    }

    /// The channel refuses to dispatch codes.
    pub fn refusing_send() -> Self {
        Self::with_behavior(false, true)
    }

    pub fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }

    /// Make subsequent verification calls error out.
    pub fn fail_verify(&self) {
        self.verify_fails.store(true, Ordering::SeqCst);
    }

    pub fn sends(&self) -> Vec<String> {
        self.send_calls.lock().unwrap().clone()
    }

    pub fn verifications(&self) -> Vec<(String, String)> {
        self.verify_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OtpChannel for FakeOtp {
    async fn send_otp(&self, client_id: &str) -> Result<bool> {
        self.send_calls.lock().unwrap().push(client_id.to_string());
        Ok(self.send_ok)
    }

    async fn verify_otp(&self, client_id: &str, code: &str) -> Result<bool> {
        self.verify_calls
            .lock()
            .unwrap()
            .push((client_id.to_string(), code.to_string()));
        if self.verify_fails.load(Ordering::SeqCst) {
            return Err(fault("otp verify"));
        }
        Ok(self.valid.load(Ordering::SeqCst))
    }
}

// ── Notification channel ────────────────────────────────────────────────────

pub struct FakeNotifier {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeNotifier {
    pub fn working() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn confirmations(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for FakeNotifier {
    async fn send_confirmation(&self, to_email: &str, user_name: &str) -> Result<()> {
        if self.fail {
            return Err(fault("send confirmation"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_string(), user_name.to_string()));
        Ok(())
    }
}
