//! HTTP client for the Gabarita backend.
//!
//! Implements both collaborator contracts over the product's REST API:
//! question generation (`POST /api/questoes/gerar`) and result submission
//! (`POST /api/simulados/resultado`). Every endpoint wraps its payload in the
//! `{ success, data, message, error }` envelope.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use simulado_core::model::{Difficulty, ExamResult, Question, QuestionDraft, QuestionId};

use crate::error::{ProviderError, SubmitError};
use crate::provider::{QuestionProvider, ResultSink};

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl BackendConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("GABARITA_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let token = env::var("GABARITA_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Some(Self { base_url, token })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Backend-backed question provider and result sink.
///
/// Construct with `None` to get a disabled client whose operations fail with
/// `Disabled`; callers can then fall back to fixtures.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    config: Option<BackendConfig>,
}

impl BackendClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<BackendConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl QuestionProvider for BackendClient {
    async fn fetch_questions(
        &self,
        subject: &str,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Vec<Question>, ProviderError> {
        let config = self.config.as_ref().ok_or(ProviderError::Disabled)?;

        let payload = GenerateRequest {
            materia: subject,
            dificuldade: dificuldade_str(difficulty),
            quantidade: count,
        };

        let mut request = self
            .client
            .post(config.endpoint("/api/questoes/gerar"))
            .json(&payload);
        if let Some(token) = &config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }

        let body: ApiResponse<GeneratedQuestions> = response.json().await?;
        if !body.success {
            return Err(ProviderError::Backend(body.failure_message()));
        }

        let questions = body
            .data
            .map(|d| d.questoes)
            .filter(|qs| !qs.is_empty())
            .ok_or(ProviderError::Empty)?;

        questions
            .into_iter()
            .map(|dto| dto.into_question(subject, difficulty))
            .collect()
    }
}

#[async_trait]
impl ResultSink for BackendClient {
    async fn submit_result(&self, result: &ExamResult) -> Result<(), SubmitError> {
        let config = self.config.as_ref().ok_or(SubmitError::Disabled)?;

        let payload = ResultPayload::from_result(result);
        let mut request = self
            .client
            .post(config.endpoint("/api/simulados/resultado"))
            .json(&payload);
        if let Some(token) = &config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SubmitError::HttpStatus(response.status()));
        }

        let body: ApiResponse<serde_json::Value> = response.json().await?;
        if !body.success {
            return Err(SubmitError::Rejected(body.failure_message()));
        }

        Ok(())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "unknown backend error".into())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    materia: &'a str,
    dificuldade: &'static str,
    quantidade: u32,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestions {
    questoes: Vec<QuestionDto>,
}

/// Question ids arrive as integers from older endpoints and as strings from
/// newer ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: RawId,
    pergunta: String,
    alternativas: Vec<String>,
    resposta_correta: usize,
    #[serde(default)]
    explicacao: Option<String>,
    #[serde(default)]
    materia: Option<String>,
    #[serde(default)]
    dificuldade: Option<String>,
}

impl QuestionDto {
    fn into_question(
        self,
        requested_subject: &str,
        requested_difficulty: Difficulty,
    ) -> Result<Question, ProviderError> {
        let subject = self
            .materia
            .unwrap_or_else(|| requested_subject.to_string());
        let difficulty = self
            .dificuldade
            .as_deref()
            .and_then(parse_dificuldade)
            .unwrap_or(requested_difficulty);

        QuestionDraft {
            id: QuestionId::new(self.id.into_string()),
            prompt: self.pergunta,
            options: self.alternativas,
            correct_option: self.resposta_correta,
            explanation: self.explicacao,
            subject,
            difficulty,
        }
        .validate()
        .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ResultPayload {
    acertos: usize,
    total_questoes: usize,
    aproveitamento: u32,
    tempo_gasto: u32,
    respostas: Vec<RespostaDto>,
}

#[derive(Debug, Serialize)]
struct RespostaDto {
    questao_id: String,
    alternativa_selecionada: Option<usize>,
    correta: bool,
}

impl ResultPayload {
    fn from_result(result: &ExamResult) -> Self {
        Self {
            acertos: result.correct,
            total_questoes: result.total_questions,
            aproveitamento: result.accuracy,
            tempo_gasto: result.elapsed_secs,
            respostas: result
                .outcomes
                .iter()
                .map(|o| RespostaDto {
                    questao_id: o.question_id.to_string(),
                    alternativa_selecionada: o.selected,
                    correta: o.is_correct,
                })
                .collect(),
        }
    }
}

fn dificuldade_str(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "facil",
        Difficulty::Medium => "medio",
        Difficulty::Hard => "dificil",
    }
}

fn parse_dificuldade(s: &str) -> Option<Difficulty> {
    match s.trim().to_lowercase().as_str() {
        "facil" | "fácil" | "easy" => Some(Difficulty::Easy),
        "medio" | "médio" | "medium" => Some(Difficulty::Medium),
        "dificil" | "difícil" | "hard" => Some(Difficulty::Hard),
        _ => None,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_envelope_with_numeric_ids() {
        let json = r#"{
            "success": true,
            "data": {
                "questoes": [
                    {
                        "id": 1,
                        "pergunta": "O que significa a sigla SUS?",
                        "alternativas": [
                            "Sistema Único de Saúde",
                            "Serviço Universal de Saúde",
                            "Sistema Unificado de Saúde",
                            "Serviço Único de Saúde"
                        ],
                        "resposta_correta": 0,
                        "dificuldade": "medio"
                    }
                ]
            },
            "timestamp": "2025-01-01 00:00:00"
        }"#;

        let body: ApiResponse<GeneratedQuestions> = serde_json::from_str(json).unwrap();
        assert!(body.success);
        let questions = body.data.unwrap().questoes;
        let question = questions
            .into_iter()
            .next()
            .unwrap()
            .into_question("Geral", Difficulty::Easy)
            .unwrap();

        assert_eq!(question.id().as_str(), "1");
        assert_eq!(question.correct_option(), 0);
        // Wire difficulty wins over the requested one.
        assert_eq!(question.difficulty(), Difficulty::Medium);
        // Subject falls back to the requested one when absent.
        assert_eq!(question.subject(), "Geral");
    }

    #[test]
    fn malformed_question_is_rejected() {
        let dto = QuestionDto {
            id: RawId::Text("q1".into()),
            pergunta: "Pergunta válida?".into(),
            alternativas: vec!["A".into(), "B".into()],
            resposta_correta: 5,
            explicacao: None,
            materia: None,
            dificuldade: None,
        };

        let err = dto.into_question("Geral", Difficulty::Easy).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn failure_envelope_prefers_error_field() {
        let json = r#"{ "success": false, "error": "Error getting simulado", "message": "x" }"#;
        let body: ApiResponse<GeneratedQuestions> = serde_json::from_str(json).unwrap();
        assert!(!body.success);
        assert_eq!(body.failure_message(), "Error getting simulado");
    }

    #[test]
    fn difficulty_wire_mapping_roundtrips() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(parse_dificuldade(dificuldade_str(difficulty)), Some(difficulty));
        }
        assert_eq!(parse_dificuldade("hard"), Some(Difficulty::Hard));
        assert_eq!(parse_dificuldade("impossível"), None);
    }

    #[test]
    fn result_payload_uses_backend_field_names() {
        use simulado_core::model::{QuestionDraft, QuestionId};
        use std::collections::BTreeMap;

        let question = QuestionDraft {
            id: QuestionId::new("q1"),
            prompt: "Pergunta".into(),
            options: vec!["A".into(), "B".into()],
            correct_option: 1,
            explanation: None,
            subject: "Geral".into(),
            difficulty: Difficulty::Medium,
        }
        .validate()
        .unwrap();

        let result = ExamResult::compute(&[question], &BTreeMap::from([(0, 1)]), 120, 60);
        let payload = serde_json::to_value(ResultPayload::from_result(&result)).unwrap();

        assert_eq!(payload["acertos"], 1);
        assert_eq!(payload["total_questoes"], 1);
        assert_eq!(payload["aproveitamento"], 100);
        assert_eq!(payload["tempo_gasto"], 60);
        assert_eq!(payload["respostas"][0]["questao_id"], "q1");
        assert_eq!(payload["respostas"][0]["correta"], true);
    }

    #[test]
    fn disabled_client_reports_itself() {
        let client = BackendClient::new(None);
        assert!(!client.enabled());
    }
}
