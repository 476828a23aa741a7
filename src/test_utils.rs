use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::{AuthGateway, AuthSession},
    config::Config,
    errors::{AppError, AppResult},
    gateway::GatewayClient,
    models::domain::{NewQuizResult, Question, QuizResult, User},
    repositories::{QuestionRepository, QuizResultRepository},
};

pub mod fixtures {
    use super::*;

    pub fn question(n: usize) -> Question {
        Question {
            id: Uuid::new_v4(),
            question_text: format!("Question {}", n),
            options: vec![
                "option a".to_string(),
                "option b".to_string(),
                "option c".to_string(),
                "option d".to_string(),
            ],
            correct_answer: n % 4,
        }
    }

    pub fn question_bank(count: usize) -> Vec<Question> {
        (0..count).map(question).collect()
    }
}

pub mod fakes {
    use super::*;

    /// Gateway auth facet backed by two hash maps. Tokens are opaque strings
    /// minted at sign-in, exactly one user per token.
    pub struct InMemoryAuthGateway {
        accounts: RwLock<HashMap<String, (String, User)>>,
        tokens: RwLock<HashMap<String, User>>,
    }

    impl InMemoryAuthGateway {
        pub fn new() -> Self {
            Self {
                accounts: RwLock::new(HashMap::new()),
                tokens: RwLock::new(HashMap::new()),
            }
        }

        pub async fn seed_user(&self, email: &str, password: &str) -> User {
            let user = User::test_user(email);
            self.accounts
                .write()
                .await
                .insert(email.to_string(), (password.to_string(), user.clone()));
            user
        }
    }

    #[async_trait]
    impl AuthGateway for InMemoryAuthGateway {
        async fn sign_up(&self, email: &str, password: &str) -> AppResult<()> {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(email) {
                return Err(AppError::Auth("email already registered".to_string()));
            }
            accounts.insert(
                email.to_string(),
                (password.to_string(), User::test_user(email)),
            );
            Ok(())
        }

        async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
            let accounts = self.accounts.read().await;
            let user = match accounts.get(email) {
                Some((stored, user)) if stored == password => user.clone(),
                _ => return Err(AppError::Auth("invalid login credentials".to_string())),
            };

            let token = format!("token-{}", Uuid::new_v4());
            self.tokens.write().await.insert(token.clone(), user.clone());
            Ok(AuthSession {
                access_token: token,
                user,
            })
        }

        async fn sign_out(&self, access_token: &str) -> AppResult<()> {
            self.tokens.write().await.remove(access_token);
            Ok(())
        }

        async fn get_user(&self, access_token: &str) -> AppResult<Option<User>> {
            Ok(self.tokens.read().await.get(access_token).cloned())
        }
    }

    pub struct InMemoryQuestionRepository {
        bank: Vec<Question>,
        fail: bool,
    }

    impl InMemoryQuestionRepository {
        pub fn with_bank(bank: Vec<Question>) -> Self {
            Self { bank, fail: false }
        }

        pub fn failing() -> Self {
            Self {
                bank: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl QuestionRepository for InMemoryQuestionRepository {
        async fn fetch_candidates(&self, limit: usize) -> AppResult<Vec<Question>> {
            if self.fail {
                return Err(AppError::DataFetch("gateway unreachable".to_string()));
            }
            Ok(self.bank.iter().take(limit).cloned().collect())
        }
    }

    pub struct InMemoryQuizResultRepository {
        rows: RwLock<Vec<QuizResult>>,
        fail_reads: bool,
    }

    impl InMemoryQuizResultRepository {
        pub fn new() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
                fail_reads: false,
            }
        }

        pub fn with_failing_reads() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
                fail_reads: true,
            }
        }

        pub async fn seed(&self, row: QuizResult) {
            self.rows.write().await.push(row);
        }

        pub async fn inserted(&self) -> Vec<QuizResult> {
            self.rows.read().await.clone()
        }
    }

    #[async_trait]
    impl QuizResultRepository for InMemoryQuizResultRepository {
        async fn insert(&self, _access_token: &str, result: &NewQuizResult) -> AppResult<()> {
            self.rows.write().await.push(QuizResult {
                user_id: result.user_id,
                score: result.score,
                completion_time: result.completion_time,
                created_at: Utc::now(),
            });
            Ok(())
        }

        async fn recent_for_user(
            &self,
            _access_token: &str,
            user_id: Uuid,
            limit: usize,
        ) -> AppResult<Vec<QuizResult>> {
            if self.fail_reads {
                return Err(AppError::DataFetch("gateway unreachable".to_string()));
            }

            let mut rows: Vec<QuizResult> = self
                .rows
                .read()
                .await
                .iter()
                .filter(|row| row.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows.truncate(limit);
            Ok(rows)
        }
    }
}

pub mod helpers {
    use super::fakes::{
        InMemoryAuthGateway, InMemoryQuestionRepository, InMemoryQuizResultRepository,
    };
    use super::*;

    pub struct TestContext {
        pub state: AppState,
        pub auth: Arc<InMemoryAuthGateway>,
        pub questions: Arc<InMemoryQuestionRepository>,
        pub results: Arc<InMemoryQuizResultRepository>,
    }

    impl TestContext {
        pub fn with_bank(self, bank: Vec<Question>) -> TestContext {
            test_context_with_bank(bank)
        }

        /// Seed an account and sign it in, yielding a live bearer token.
        pub async fn signed_in_user(&self, email: &str) -> (String, User) {
            let user = self.auth.seed_user(email, "longpassword").await;
            let session = self
                .auth
                .sign_in_with_password(email, "longpassword")
                .await
                .expect("seeded credentials sign in");
            (session.access_token, user)
        }
    }

    pub fn test_context() -> TestContext {
        test_context_with_bank(fixtures::question_bank(15))
    }

    pub fn test_context_with_bank(bank: Vec<Question>) -> TestContext {
        let config = Config::test_config();
        let gateway = GatewayClient::new(&config).expect("test gateway client builds");

        let auth = Arc::new(InMemoryAuthGateway::new());
        let questions = Arc::new(InMemoryQuestionRepository::with_bank(bank));
        let results = Arc::new(InMemoryQuizResultRepository::new());

        let state = AppState::from_parts(
            config,
            gateway,
            auth.clone(),
            questions.clone(),
            results.clone(),
        );

        TestContext {
            state,
            auth,
            questions,
            results,
        }
    }
}
