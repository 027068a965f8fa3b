use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::AuthGuard;
use auth::PasswordHasher;
use auth::Role;
use auth::TokenCodec;
use auth::TokenKeys;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use session_service::domain::session::models::EmailAddress;
use session_service::domain::session::models::RefreshTokenRecord;
use session_service::domain::session::models::Subject;
use session_service::domain::session::models::SubjectId;
use session_service::domain::session::ports::Clock;
use session_service::domain::session::ports::RefreshTokenRepository;
use session_service::domain::session::ports::SessionServicePort;
use session_service::domain::session::ports::SubjectDirectory;
use session_service::domain::session::service::SessionService;
use session_service::inbound::http::router::create_router;
use session_service::outbound::metrics::TracingAuthMetrics;
use session_service::session::errors::RepositoryError;
use uuid::Uuid;

pub const ACCESS_SECRET: &str = "test_access_secret_32_bytes_long!";
pub const REFRESH_SECRET: &str = "test_refresh_secret_32_bytes_lon!";

/// In-memory refresh token store with the same row-level atomicity the
/// Postgres adapter gets from single-row statements.
#[derive(Default)]
pub struct InMemoryRefreshTokens {
    records: Mutex<HashMap<Uuid, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokens {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokens {
    async fn save(&self, record: &RefreshTokenRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.0, record.clone());
        Ok(())
    }

    async fn find_by_signed_value(
        &self,
        signed_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.signed_value == signed_value)
            .cloned())
    }

    async fn delete_by_signed_value(&self, signed_value: &str) -> Result<bool, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let id = records
            .values()
            .find(|r| r.signed_value == signed_value)
            .map(|r| r.id.0);

        Ok(match id {
            Some(id) => records.remove(&id).is_some(),
            None => false,
        })
    }

    async fn delete_all_for_subject(&self, subject_id: &SubjectId) -> Result<u64, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, r| r.subject_id != *subject_id);
        Ok((before - records.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, r| r.expires_at > now);
        Ok((before - records.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemorySubjects {
    subjects: Mutex<HashMap<Uuid, Subject>>,
}

impl InMemorySubjects {
    pub fn insert(&self, subject: Subject) {
        self.subjects.lock().unwrap().insert(subject.id.0, subject);
    }

    pub fn remove(&self, id: &SubjectId) {
        self.subjects.lock().unwrap().remove(&id.0);
    }
}

#[async_trait]
impl SubjectDirectory for InMemorySubjects {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subject>, RepositoryError> {
        Ok(self
            .subjects
            .lock()
            .unwrap()
            .values()
            .find(|s| s.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError> {
        Ok(self.subjects.lock().unwrap().get(&id.0).cloned())
    }
}

/// Manually advanced clock shared between the test and the service.
#[derive(Clone)]
pub struct TestClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Utc::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Test application running the real router over in-memory adapters.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub service: Arc<dyn SessionServicePort>,
    pub refresh_tokens: Arc<InMemoryRefreshTokens>,
    pub subjects: Arc<InMemorySubjects>,
    pub clock: TestClock,
    pub codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let refresh_tokens = Arc::new(InMemoryRefreshTokens::default());
        let subjects = Arc::new(InMemorySubjects::default());
        let metrics = Arc::new(TracingAuthMetrics::new());
        let clock = TestClock::new();

        let codec = Arc::new(TokenCodec::new(&TokenKeys {
            access_secret: ACCESS_SECRET.to_string(),
            refresh_secret: REFRESH_SECRET.to_string(),
        }));
        let guard = Arc::new(AuthGuard::new(Arc::clone(&codec)));

        let service: Arc<dyn SessionServicePort> = Arc::new(SessionService::new(
            Arc::clone(&refresh_tokens),
            Arc::clone(&subjects),
            metrics,
            clock.clone(),
            Arc::clone(&codec),
        ));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(Arc::clone(&service), guard);
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server task failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            service,
            refresh_tokens,
            subjects,
            clock,
            codec,
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Register a subject directly in the directory.
    pub fn seed_subject(&self, email: &str, password: &str, role: Role) -> SubjectId {
        let subject = Subject {
            id: SubjectId::new(),
            email: EmailAddress::new(email.to_string()).expect("Invalid test email"),
            role,
            password_verifier: PasswordHasher::new()
                .hash(password)
                .expect("Failed to hash test password"),
        };
        let id = subject.id;
        self.subjects.insert(subject);
        id
    }
}
