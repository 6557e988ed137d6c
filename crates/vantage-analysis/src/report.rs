//! Final report assembly
//!
//! Renders the Markdown report plus a structured mirror of the same
//! content. The section order is a content contract consumed downstream:
//! metrics, preliminary assessment, analyst perspective, deep analysis -
//! in that order, with any empty section omitted entirely.

use crate::metrics::{CalculatedMetrics, ExtractedMetrics, MetricsSummary};
use crate::pipeline::ParsedMaterial;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vantage_persona::PersonaSummary;

/// Structured mirror of the report content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub metrics: Option<ExtractedMetrics>,
    pub summary: Option<MetricsSummary>,
    pub persona: Option<PersonaSummary>,
    pub analysis: String,
}

/// Report generation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub document_length: usize,
    pub metrics_count: usize,
}

/// The finished analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    /// Rendered Markdown
    pub markdown: String,

    /// The same content as structured data
    pub data: ReportData,

    pub metadata: ReportMetadata,
}

/// One bullet line per present metric, in fixed order
pub(crate) fn metric_lines(metrics: &ExtractedMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(v) = metrics.pe_ratio {
        lines.push(format!("- **P/E Ratio (PE)**: {v}"));
    }
    if let Some(v) = metrics.pb_ratio {
        lines.push(format!("- **P/B Ratio (PB)**: {v}"));
    }
    if let Some(v) = metrics.roe {
        lines.push(format!("- **Return on Equity (ROE)**: {v}%"));
    }
    if let Some(v) = metrics.peg_ratio {
        lines.push(format!("- **PEG Ratio**: {v}"));
    }
    if let Some(v) = metrics.revenue_growth {
        lines.push(format!("- **Revenue Growth**: {v}%"));
    }
    if let Some(v) = metrics.gross_margin {
        lines.push(format!("- **Gross Margin**: {v}%"));
    }
    if let Some(v) = metrics.dividend_yield {
        lines.push(format!("- **Dividend Yield**: {v}%"));
    }
    if let Some(v) = metrics.market_cap {
        lines.push(format!("- **Market Cap**: {v}"));
    }
    lines
}

/// Assemble the final report from the pipeline's intermediate fields
pub fn build_final_report(
    parsed: Option<&ParsedMaterial>,
    metrics: Option<&CalculatedMetrics>,
    analysis: &str,
    persona: Option<&PersonaSummary>,
) -> FinalReport {
    let generated_at = Utc::now();
    let metrics_count = metrics.map_or(0, |m| m.summary.total_extracted);

    let mut markdown = format!(
        "# Investment Analysis Report\n\nGenerated at: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if let Some(calculated) = metrics {
        let lines = metric_lines(&calculated.metrics);
        if !lines.is_empty() {
            markdown.push_str("\n## 📊 Financial Metrics\n\n");
            for line in &lines {
                markdown.push_str(line);
                markdown.push('\n');
            }
        }

        if calculated.summary.total_extracted > 0 {
            markdown.push_str("\n## 📈 Preliminary Assessment\n\n");
            markdown.push_str(&format!(
                "- **Valuation**: {}\n",
                calculated.summary.valuation
            ));
            markdown.push_str(&format!("- **Quality**: {}\n", calculated.summary.quality));
        }
    }

    if let Some(persona) = persona {
        markdown.push_str("\n## 👤 Analyst Perspective\n\n");
        markdown.push_str(&format!("**Analyst**: {}\n", persona.name));
        markdown.push_str(&format!("**Title**: {}\n", persona.title));
        markdown.push_str(&format!("**Philosophy**: {}\n", persona.philosophy));
    }

    if !analysis.is_empty() {
        markdown.push_str(&format!("\n## 🎯 Deep Analysis\n\n{analysis}\n"));
    }

    FinalReport {
        markdown,
        data: ReportData {
            metrics: metrics.map(|m| m.metrics.clone()),
            summary: metrics.map(|m| m.summary.clone()),
            persona: persona.cloned(),
            analysis: analysis.to_string(),
        },
        metadata: ReportMetadata {
            generated_at,
            document_length: parsed.map_or(0, |p| p.length),
            metrics_count,
        },
    }
}
