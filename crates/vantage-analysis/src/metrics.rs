//! Financial metric extraction and scoring
//!
//! Extraction is a pure regex scan over free text: every supported ratio
//! has one case-insensitive pattern of the form
//! `<label><separator><number>[%]` and the first match wins. A label
//! that never matches leaves the ratio absent - never zero. On top of
//! the raw ratios sit two fixed scoring rules producing qualitative
//! valuation and quality labels; the thresholds are reproduced exactly
//! and are not meant as financial advice.
//!
//! Labels are accepted in both English and Chinese so material pasted
//! from either market's filings extracts the same way.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const SEP: &str = "[：:=\\s]*";
const NUM: &str = "(\\d+\\.?\\d*)";

macro_rules! metric_pattern {
    ($labels:literal, $suffix:literal) => {
        LazyLock::new(|| {
            Regex::new(&format!("(?i)(?:{}){}{}{}", $labels, SEP, NUM, $suffix))
                .expect("hardcoded metric pattern compiles")
        })
    };
}

static PE_RE: LazyLock<Regex> = metric_pattern!("PE|市盈率", "");
static PB_RE: LazyLock<Regex> = metric_pattern!("PB|市净率", "");
static ROE_RE: LazyLock<Regex> = metric_pattern!("ROE|净资产收益率", "%?");
static REVENUE_GROWTH_RE: LazyLock<Regex> = metric_pattern!("revenue\\s+growth|营收增长率?", "%?");
static GROSS_MARGIN_RE: LazyLock<Regex> = metric_pattern!("gross\\s+margin|毛利率", "%?");
static DIVIDEND_YIELD_RE: LazyLock<Regex> = metric_pattern!("dividend\\s+yield|股息率", "%?");
static MARKET_CAP_RE: LazyLock<Regex> = metric_pattern!("market\\s+cap(?:italization)?|市值", "");

/// Financial ratios extracted from one text blob
///
/// Absent pattern match means the value is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetrics {
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub gross_margin: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    /// Derived: PE / revenue growth, rounded to 2 decimals
    pub peg_ratio: Option<f64>,
}

impl ExtractedMetrics {
    /// Number of metrics that were actually extracted
    pub fn extracted_count(&self) -> usize {
        [
            self.pe_ratio,
            self.pb_ratio,
            self.roe,
            self.revenue_growth,
            self.gross_margin,
            self.dividend_yield,
            self.market_cap,
            self.peg_ratio,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.extracted_count() == 0
    }
}

/// Qualitative valuation label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valuation {
    Undervalued,
    Fair,
    Overvalued,
    InsufficientData,
}

impl Valuation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undervalued => "undervalued",
            Self::Fair => "fair",
            Self::Overvalued => "overvalued",
            Self::InsufficientData => "insufficient data",
        }
    }
}

impl std::fmt::Display for Valuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative business-quality label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Excellent,
    Good,
    Average,
    Poor,
    InsufficientData,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Average => "average",
            Self::Poor => "poor",
            Self::InsufficientData => "insufficient data",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one extraction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_extracted: usize,
    pub valuation: Valuation,
    pub quality: Quality,
}

/// Extracted metrics together with their qualitative summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedMetrics {
    pub metrics: ExtractedMetrics,
    pub summary: MetricsSummary,
}

fn extract_value(text: &str, pattern: &Regex) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Extract all supported ratios from a text blob
///
/// Pure function: never fails, absent data stays absent.
pub fn extract(text: &str) -> ExtractedMetrics {
    let mut metrics = ExtractedMetrics {
        pe_ratio: extract_value(text, &PE_RE),
        pb_ratio: extract_value(text, &PB_RE),
        roe: extract_value(text, &ROE_RE),
        revenue_growth: extract_value(text, &REVENUE_GROWTH_RE),
        gross_margin: extract_value(text, &GROSS_MARGIN_RE),
        dividend_yield: extract_value(text, &DIVIDEND_YIELD_RE),
        market_cap: extract_value(text, &MARKET_CAP_RE),
        peg_ratio: None,
    };

    // PEG = PE / growth rate, only when both are present and growth is nonzero
    if let (Some(pe), Some(growth)) = (metrics.pe_ratio, metrics.revenue_growth) {
        if growth != 0.0 {
            metrics.peg_ratio = Some(round2(pe / growth));
        }
    }

    metrics
}

/// Assess the valuation level from the extracted ratios
pub fn assess_valuation(metrics: &ExtractedMetrics) -> Valuation {
    let (pe, pb, peg) = (metrics.pe_ratio, metrics.pb_ratio, metrics.peg_ratio);

    if pe.is_none() && pb.is_none() && peg.is_none() {
        return Valuation::InsufficientData;
    }

    let mut score = 0i32;

    if let Some(pe) = pe {
        if pe < 15.0 {
            score += 1;
        } else if pe > 30.0 {
            score -= 1;
        }
    }

    if let Some(pb) = pb {
        if pb < 2.0 {
            score += 1;
        } else if pb > 5.0 {
            score -= 1;
        }
    }

    if let Some(peg) = peg {
        if peg < 1.0 {
            score += 1;
        } else if peg > 2.0 {
            score -= 1;
        }
    }

    if score >= 2 {
        Valuation::Undervalued
    } else if score <= -2 {
        Valuation::Overvalued
    } else {
        Valuation::Fair
    }
}

/// Assess the business quality from the extracted ratios
pub fn assess_quality(metrics: &ExtractedMetrics) -> Quality {
    let (roe, gross_margin) = (metrics.roe, metrics.gross_margin);

    if roe.is_none() && gross_margin.is_none() {
        return Quality::InsufficientData;
    }

    let mut score = 0i32;

    if let Some(roe) = roe {
        if roe >= 15.0 {
            score += 2;
        } else if roe >= 10.0 {
            score += 1;
        }
    }

    if let Some(margin) = gross_margin {
        if margin >= 40.0 {
            score += 1;
        }
    }

    match score {
        s if s >= 3 => Quality::Excellent,
        2 => Quality::Good,
        1 => Quality::Average,
        _ => Quality::Poor,
    }
}

/// Extract ratios and derive their qualitative summary in one pass
pub fn calculate(text: &str) -> CalculatedMetrics {
    let metrics = extract(text);
    let summary = MetricsSummary {
        total_extracted: metrics.extracted_count(),
        valuation: assess_valuation(&metrics),
        quality: assess_quality(&metrics),
    };
    CalculatedMetrics { metrics, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_colon_separator() {
        let metrics = extract("PE: 12.5\nPB: 1.8\nROE: 22%");
        assert_eq!(metrics.pe_ratio, Some(12.5));
        assert_eq!(metrics.pb_ratio, Some(1.8));
        assert_eq!(metrics.roe, Some(22.0));
    }

    #[test]
    fn test_extract_with_equals_and_whitespace_separators() {
        let metrics = extract("pe=12.5 gross margin 45");
        assert_eq!(metrics.pe_ratio, Some(12.5));
        assert_eq!(metrics.gross_margin, Some(45.0));
    }

    #[test]
    fn test_extract_all_english_labels() {
        let text = "PE: 12.5\nPB: 12.5\nROE: 12.5%\nrevenue growth: 12.5%\n\
                    gross margin: 12.5%\ndividend yield: 12.5%\nmarket cap: 12.5";
        let metrics = extract(text);
        assert_eq!(metrics.pe_ratio, Some(12.5));
        assert_eq!(metrics.pb_ratio, Some(12.5));
        assert_eq!(metrics.roe, Some(12.5));
        assert_eq!(metrics.revenue_growth, Some(12.5));
        assert_eq!(metrics.gross_margin, Some(12.5));
        assert_eq!(metrics.dividend_yield, Some(12.5));
        assert_eq!(metrics.market_cap, Some(12.5));
    }

    #[test]
    fn test_extract_chinese_labels() {
        let text = "市盈率：35\n市净率：5\n净资产收益率：18%\n营收增长率：30%\n毛利率：92%\n股息率：1.5%\n市值：500";
        let metrics = extract(text);
        assert_eq!(metrics.pe_ratio, Some(35.0));
        assert_eq!(metrics.pb_ratio, Some(5.0));
        assert_eq!(metrics.roe, Some(18.0));
        assert_eq!(metrics.revenue_growth, Some(30.0));
        assert_eq!(metrics.gross_margin, Some(92.0));
        assert_eq!(metrics.dividend_yield, Some(1.5));
        assert_eq!(metrics.market_cap, Some(500.0));
    }

    #[test]
    fn test_absent_label_yields_absent_value() {
        let metrics = extract("The company had a strong quarter.");
        assert!(metrics.is_empty());
        assert_eq!(metrics.pe_ratio, None);
    }

    #[test]
    fn test_first_match_wins() {
        let metrics = extract("PE: 10\nPE: 99");
        assert_eq!(metrics.pe_ratio, Some(10.0));
    }

    #[test]
    fn test_peg_derivation() {
        let metrics = extract("PE: 30\nrevenue growth: 15%");
        assert_eq!(metrics.peg_ratio, Some(2.0));

        let metrics = extract("PE: 10\nrevenue growth: 3%");
        assert_eq!(metrics.peg_ratio, Some(3.33));
    }

    #[test]
    fn test_peg_absent_without_both_inputs() {
        assert_eq!(extract("PE: 30").peg_ratio, None);
        assert_eq!(extract("revenue growth: 15%").peg_ratio, None);
        // Zero growth must not divide
        assert_eq!(extract("PE: 30\nrevenue growth: 0%").peg_ratio, None);
    }

    #[test]
    fn test_valuation_undervalued() {
        // PE < 15 (+1) and PB < 2 (+1) => score 2
        let metrics = extract("PE: 10\nPB: 1.5");
        assert_eq!(assess_valuation(&metrics), Valuation::Undervalued);
    }

    #[test]
    fn test_valuation_overvalued() {
        // PE > 30 (-1) and PB > 5 (-1) => score -2
        let metrics = extract("PE: 40\nPB: 8");
        assert_eq!(assess_valuation(&metrics), Valuation::Overvalued);
    }

    #[test]
    fn test_valuation_fair() {
        // PE < 15 (+1), PB > 5 (-1) => score 0
        let metrics = extract("PE: 10\nPB: 8");
        assert_eq!(assess_valuation(&metrics), Valuation::Fair);
    }

    #[test]
    fn test_valuation_insufficient_data() {
        assert_eq!(
            assess_valuation(&ExtractedMetrics::default()),
            Valuation::InsufficientData
        );
        // ROE alone does not feed the valuation score
        let metrics = extract("ROE: 20%");
        assert_eq!(assess_valuation(&metrics), Valuation::InsufficientData);
    }

    #[test]
    fn test_quality_scoring() {
        // ROE >= 15 (+2) and margin >= 40 (+1) => excellent
        let metrics = extract("ROE: 20%\ngross margin: 45%");
        assert_eq!(assess_quality(&metrics), Quality::Excellent);

        // ROE >= 15 (+2) alone => good
        let metrics = extract("ROE: 18%");
        assert_eq!(assess_quality(&metrics), Quality::Good);

        // 10 <= ROE < 15 (+1) => average
        let metrics = extract("ROE: 12%");
        assert_eq!(assess_quality(&metrics), Quality::Average);

        // ROE < 10 => poor
        let metrics = extract("ROE: 5%");
        assert_eq!(assess_quality(&metrics), Quality::Poor);

        assert_eq!(
            assess_quality(&ExtractedMetrics::default()),
            Quality::InsufficientData
        );
    }

    #[test]
    fn test_calculate_summary() {
        let calculated = calculate("PE: 20\nROE: 18%");
        assert_eq!(calculated.summary.total_extracted, 2);
        assert_eq!(calculated.summary.valuation, Valuation::Fair);
        assert_eq!(calculated.summary.quality, Quality::Good);

        let empty = calculate("nothing here");
        assert_eq!(empty.summary.total_extracted, 0);
        assert_eq!(empty.summary.valuation, Valuation::InsufficientData);
        assert_eq!(empty.summary.quality, Quality::InsufficientData);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Valuation::Undervalued.to_string(), "undervalued");
        assert_eq!(Quality::InsufficientData.to_string(), "insufficient data");
    }
}
