use std::sync::Arc;

use crate::{
    auth::{AuthGateway, RestAuthGateway},
    config::Config,
    errors::AppResult,
    gateway::GatewayClient,
    repositories::{
        QuestionRepository, QuizResultRepository, RestQuestionRepository,
        RestQuizResultRepository,
    },
    services::{QuizService, ResultsService, SessionService},
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub quiz_service: Arc<QuizService>,
    pub results_service: Arc<ResultsService>,
    pub gateway: GatewayClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let gateway = GatewayClient::new(&config)?;
        let auth: Arc<dyn AuthGateway> = Arc::new(RestAuthGateway::new(&gateway));
        let questions: Arc<dyn QuestionRepository> =
            Arc::new(RestQuestionRepository::new(&gateway, &config.questions_table));
        let results: Arc<dyn QuizResultRepository> =
            Arc::new(RestQuizResultRepository::new(&gateway, &config.results_table));

        Ok(Self::from_parts(config, gateway, auth, questions, results))
    }

    /// Assemble the state from explicit collaborators. Production goes
    /// through `new`; tests inject in-memory gateways here.
    pub fn from_parts(
        config: Config,
        gateway: GatewayClient,
        auth: Arc<dyn AuthGateway>,
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn QuizResultRepository>,
    ) -> Self {
        let session_service = Arc::new(SessionService::new(auth.clone()));
        let quiz_service = Arc::new(QuizService::new(questions, results.clone(), auth));
        let results_service = Arc::new(ResultsService::new(results));

        Self {
            session_service,
            quiz_service,
            results_service,
            gateway,
            config: Arc::new(config),
        }
    }
}
