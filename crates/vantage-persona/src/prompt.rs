//! Prompt composition
//!
//! Renders the persona system prompt and the per-material analysis prompt.
//! Both are pure functions of their inputs: same persona and material,
//! same prompt. Templates use MiniJinja with strict undefined behavior so
//! a broken custom template fails loudly instead of silently dropping the
//! material.

use crate::error::{PersonaError, Result};
use crate::persona::Persona;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::json;

/// System prompt shared by every persona without a custom template
const SYSTEM_PROMPT: &str = r"You are now {{ name }} ({{ name_local }}), {{ title }}.

Investment philosophy:
{{ philosophy }}

Core principles:
{% for principle in principles %}{{ loop.index }}. {{ principle }}
{% endfor %}
Analysis focus:
{% for item in analysis_focus %}{{ loop.index }}. {{ item }}
{% endfor %}
Risk tolerance: {{ risk_tolerance }}
Holding period: {{ holding_period }}

Analyze strictly according to {{ name }}'s investment philosophy and methodology, and give recommendations consistent with that style.
";

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

fn render(name: &str, template: &str, vars: &serde_json::Value) -> Result<String> {
    environment()
        .render_str(template, minijinja::value::Value::from_serialize(vars))
        .map_err(|e| PersonaError::TemplateRender {
            name: name.to_string(),
            detail: e.to_string(),
        })
}

/// Render the system prompt for a persona
pub fn system_prompt(persona: &Persona) -> Result<String> {
    let vars = json!({
        "name": persona.name,
        "name_local": persona.name_local,
        "title": persona.title,
        "philosophy": persona.philosophy,
        "principles": persona.principles,
        "analysis_focus": persona.analysis_focus,
        "risk_tolerance": persona.risk_tolerance.as_str(),
        "holding_period": persona.holding_period,
    });
    render("persona.system", SYSTEM_PROMPT, &vars)
}

/// Render the analysis prompt for a persona and material
///
/// Personas with a custom `prompt_template` substitute the material into
/// it; everyone else gets the system prompt followed by a labeled material
/// section.
pub fn analysis_prompt(persona: &Persona, material: &str) -> Result<String> {
    match &persona.prompt_template {
        Some(template) => render(
            "persona.analysis_custom",
            template,
            &json!({ "material": material }),
        ),
        None => Ok(format!(
            "{}\n\nMaterial to analyze:\n{}",
            system_prompt(persona)?,
            material
        )),
    }
}

/// Check that a custom template renders and actually uses the material
///
/// Used at catalog-load time so a broken template quarantines the record
/// rather than failing at analysis time.
pub fn validate_template(template: &str) -> Result<()> {
    let probe = "__MATERIAL_PROBE__";
    let rendered = render(
        "persona.analysis_custom",
        template,
        &json!({ "material": probe }),
    )?;
    if !rendered.contains(probe) {
        return Err(PersonaError::TemplateRender {
            name: "persona.analysis_custom".to_string(),
            detail: "template never substitutes {{ material }}".to_string(),
        });
    }
    Ok(())
}
