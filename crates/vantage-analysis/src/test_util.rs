//! Shared fixtures for unit tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use vantage_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason, TokenUsage,
};
use vantage_persona::{Persona, PersonaRegistry, RiskTolerance};

/// Three-persona fixture catalog
pub(crate) fn fixture_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "buffett".to_string(),
            name: "Warren Buffett".to_string(),
            name_local: "沃伦·巴菲特".to_string(),
            title: "the Oracle of Omaha".to_string(),
            philosophy: "Buy wonderful companies at fair prices and hold them.".to_string(),
            principles: vec![
                "Stay within your circle of competence".to_string(),
                "Insist on a margin of safety".to_string(),
            ],
            analysis_focus: vec!["Durable competitive moats".to_string()],
            decision_criteria: HashMap::new(),
            risk_tolerance: RiskTolerance::Low,
            holding_period: "very long term (10+ years)".to_string(),
            prompt_template: None,
        },
        Persona {
            id: "lynch".to_string(),
            name: "Peter Lynch".to_string(),
            name_local: "彼得·林奇".to_string(),
            title: "legendary Magellan fund manager".to_string(),
            philosophy: "Invest in what you know, and know what you own.".to_string(),
            principles: vec!["Do your homework".to_string()],
            analysis_focus: vec!["Earnings growth".to_string()],
            decision_criteria: HashMap::new(),
            risk_tolerance: RiskTolerance::Medium,
            holding_period: "long term (3-5 years)".to_string(),
            prompt_template: None,
        },
        Persona {
            id: "graham".to_string(),
            name: "Benjamin Graham".to_string(),
            name_local: "本杰明·格雷厄姆".to_string(),
            title: "the father of value investing".to_string(),
            philosophy: "Price is what you pay; value is what you get.".to_string(),
            principles: vec!["Demand a margin of safety".to_string()],
            analysis_focus: vec!["Balance-sheet strength".to_string()],
            decision_criteria: HashMap::new(),
            risk_tolerance: RiskTolerance::VeryLow,
            holding_period: "medium to long term".to_string(),
            prompt_template: Some(
                "Apply strict margin-of-safety screening to the following material:\n{{ material }}"
                    .to_string(),
            ),
        },
    ]
}

pub(crate) fn fixture_registry() -> Arc<PersonaRegistry> {
    Arc::new(PersonaRegistry::from_personas(fixture_personas()))
}

type StubReply = dyn Fn(&CompletionRequest) -> Result<String, LLMError> + Send + Sync;

/// In-process [`LLMProvider`] stub
///
/// Records every request it receives and answers via the supplied closure.
pub(crate) struct StubProvider {
    reply: Box<StubReply>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    pub(crate) fn new(
        reply: impl Fn(&CompletionRequest) -> Result<String, LLMError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// A stub that always answers with the same text
    pub(crate) fn fixed(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// A stub whose every call fails
    pub(crate) fn failing(detail: &str) -> Arc<Self> {
        let detail = detail.to_string();
        Self::new(move |_| Err(LLMError::ProviderError(detail.clone())))
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("stub lock").len()
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.calls.lock().expect("stub lock").clone()
    }
}

#[async_trait]
impl LLMProvider for StubProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> vantage_llm::Result<CompletionResponse> {
        self.calls.lock().expect("stub lock").push(request.clone());
        let text = (self.reply)(&request)?;
        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 0,
                output_tokens: 0,
            },
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}
