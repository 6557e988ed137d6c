//! Prompt templates for the comparison synthesis call
//!
//! The per-persona prompts live in `vantage-persona`; this module owns the
//! second-order prompt that asks the model to synthesize a set of finished
//! perspective analyses into one consensus narrative.

use crate::error::{AnalysisError, Result};
use crate::result::PerspectiveResult;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::json;

/// System prompt for the synthesis call
pub const COMPARISON_SYSTEM_PROMPT: &str =
    "You are a seasoned investment analyst skilled at synthesizing different investment philosophies.";

const COMPARISON_TEMPLATE: &str = r"Please compare how the following {{ count }} investors analyzed the same material and summarize:

1. **Consensus**: where their views agree
2. **Disagreements**: where they clearly diverge
3. **Complementary insights**: what the different vantage points add to each other
4. **Combined recommendation**: an overall recommendation weighing all views

The individual analyses:

{% for item in analyses %}
============================================================
{{ loop.index }}. {{ item.persona_name }} ({{ item.persona_title }})
Risk tolerance: {{ item.risk_tolerance }}
Holding period: {{ item.holding_period }}

Analysis:
{{ item.analysis }}

{% endfor %}";

/// Render the synthesis prompt over the individual results, in input order
pub fn comparison_prompt(analyses: &[PerspectiveResult]) -> Result<String> {
    let vars = json!({
        "count": analyses.len(),
        "analyses": analyses
            .iter()
            .map(|a| {
                json!({
                    "persona_name": a.persona_name,
                    "persona_title": a.persona_title,
                    "risk_tolerance": a.risk_tolerance.as_str(),
                    "holding_period": a.holding_period,
                    "analysis": a.analysis,
                })
            })
            .collect::<Vec<_>>(),
    });

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.render_str(
        COMPARISON_TEMPLATE,
        minijinja::value::Value::from_serialize(&vars),
    )
    .map_err(|e| AnalysisError::Template(format!("comparison prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::PerspectiveResult;
    use crate::test_util::fixture_personas;

    #[test]
    fn test_comparison_prompt_sections_in_order() {
        let personas = fixture_personas();
        let analyses = vec![
            PerspectiveResult::success(&personas[0], "Hold forever."),
            PerspectiveResult::success(&personas[1], "Growth at a fair price."),
        ];

        let prompt = comparison_prompt(&analyses).unwrap();

        assert!(prompt.contains("following 2 investors"));
        assert!(prompt.contains("**Consensus**"));
        assert!(prompt.contains("**Combined recommendation**"));

        let first = prompt.find("1. Warren Buffett").unwrap();
        let second = prompt.find("2. Peter Lynch").unwrap();
        assert!(first < second, "sections must follow input order");

        assert!(prompt.contains("Risk tolerance: low"));
        assert!(prompt.contains("Hold forever."));
        assert!(prompt.contains("Growth at a fair price."));
    }

    #[test]
    fn test_failed_analysis_is_still_rendered() {
        let personas = fixture_personas();
        let analyses = vec![PerspectiveResult::failure(&personas[0], "timeout")];
        let prompt = comparison_prompt(&analyses).unwrap();
        assert!(prompt.contains("Analysis failed: timeout"));
    }
}
