//! Vastu Shastra oracle
//!
//! One structured prompt call per settled heading: a numeric direction goes
//! in, a short free-text reading comes out. Failures never propagate past
//! [`consult_or_fallback`]; they are logged and replaced by a static message.
//!
//! - `prompt`: the prompt template
//! - `gemini`: HTTP client for a Gemini `generateContent` endpoint
//! - [`StaticOracle`]: offline answers built from the direction themes

pub mod prompt;
#[cfg(not(target_arch = "wasm32"))]
pub mod gemini;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::heading::Heading;

pub use prompt::{render_prompt, VASTU_PROMPT_TEMPLATE};
#[cfg(not(target_arch = "wasm32"))]
pub use gemini::GeminiOracle;

/// Input of the prompt call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VastuRequest {
    /// Compass direction in degrees
    pub direction: f64,
}

impl VastuRequest {
    pub fn new(direction: Heading) -> Self {
        Self {
            direction: f64::from(direction.rounded()),
        }
    }

    pub fn heading(&self) -> Heading {
        Heading::new(self.direction).unwrap_or_default()
    }
}

/// Output of the prompt call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VastuInsight {
    /// Vastu Shastra information for the requested direction
    #[serde(rename = "vastuInfo")]
    pub vastu_info: String,
}

impl VastuInsight {
    pub fn new(vastu_info: impl Into<String>) -> Self {
        Self {
            vastu_info: vastu_info.into(),
        }
    }
}

/// Anything that can answer a Vastu request
pub trait VastuOracle {
    fn consult(&self, request: VastuRequest) -> impl Future<Output = Result<VastuInsight>> + Send;
}

/// Outcome of a consultation after fallback handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consultation {
    Answered(VastuInsight),
    /// The oracle failed; carries the fallback text
    Fallback(String),
}

impl Consultation {
    pub fn text(&self) -> &str {
        match self {
            Consultation::Answered(insight) => &insight.vastu_info,
            Consultation::Fallback(message) => message,
        }
    }
}

/// Turn an oracle result into displayable text, logging failures
pub fn settle(result: Result<VastuInsight>, fallback: &str) -> Consultation {
    match result {
        Ok(insight) if !insight.vastu_info.trim().is_empty() => Consultation::Answered(insight),
        Ok(_) => {
            log::warn!("oracle returned an empty reading");
            Consultation::Fallback(fallback.to_string())
        }
        Err(e) => {
            log::warn!("error fetching Vastu info: {}", e);
            Consultation::Fallback(fallback.to_string())
        }
    }
}

/// Consult `oracle`, replacing any failure with `fallback`
pub fn consult_or_fallback<'a, O: VastuOracle>(
    oracle: &'a O,
    request: VastuRequest,
    fallback: &'a str,
) -> impl Future<Output = Consultation> + Send + 'a {
    let reading = oracle.consult(request);
    async move { settle(reading.await, fallback) }
}

/// Offline oracle answering from the direction themes
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOracle;

impl StaticOracle {
    pub fn reading(heading: Heading) -> String {
        let direction = heading.direction();
        format!(
            "Facing {} ({}): in Vastu Shastra this direction represents {}. \
             Keep this zone uncluttered and well lit to support it.",
            direction.name(),
            heading,
            direction.theme()
        )
    }
}

impl VastuOracle for StaticOracle {
    fn consult(&self, request: VastuRequest) -> impl Future<Output = Result<VastuInsight>> + Send {
        let insight = VastuInsight::new(Self::reading(request.heading()));
        async move { Ok(insight) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CompassError;

    struct FailingOracle;

    impl VastuOracle for FailingOracle {
        fn consult(&self, _request: VastuRequest) -> impl Future<Output = Result<VastuInsight>> + Send {
            async { Err(CompassError::EmptyResponse) }
        }
    }

    #[test]
    fn test_request_uses_whole_degrees() {
        let request = VastuRequest::new(Heading::new(89.6).unwrap());
        assert_eq!(request.direction, 90.0);
        assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"direction":90.0}"#);
    }

    #[test]
    fn test_insight_wire_name() {
        let insight: VastuInsight = serde_json::from_str(r#"{"vastuInfo": "Calm"}"#).unwrap();
        assert_eq!(insight.vastu_info, "Calm");
        assert!(serde_json::to_string(&insight).unwrap().contains("vastuInfo"));
    }

    #[test]
    fn test_settle_empty_reading_falls_back() {
        let outcome = settle(Ok(VastuInsight::new("   ")), "fallback");
        assert_eq!(outcome, Consultation::Fallback("fallback".to_string()));
    }

    #[tokio::test]
    async fn test_failure_is_replaced_by_fallback() {
        let request = VastuRequest::new(Heading::NORTH);
        let outcome = consult_or_fallback(&FailingOracle, request, "unavailable").await;
        assert_eq!(outcome.text(), "unavailable");
        assert!(matches!(outcome, Consultation::Fallback(_)));
    }

    #[tokio::test]
    async fn test_static_oracle_names_direction() {
        let request = VastuRequest::new(Heading::new(45.0).unwrap());
        let outcome = consult_or_fallback(&StaticOracle, request, "unavailable").await;
        assert!(matches!(outcome, Consultation::Answered(_)));
        assert!(outcome.text().contains("Northeast"));
        assert!(outcome.text().contains("spiritual growth and knowledge"));
        assert!(outcome.text().contains("45°"));
    }
}
