//! Chunked streaming presentation
//!
//! The streaming variants do not stream tokens from the provider. Each one
//! computes the full result first and then yields it as a finite sequence
//! of fixed-size character chunks - a presentation convenience for
//! incremental display, restartable only from scratch.

use crate::engine::PerspectiveEngine;
use crate::error::Result;
use crate::result::ComparisonResult;

/// A finite, already-computed sequence of text chunks
pub type TextChunkStream = futures::stream::Iter<std::vec::IntoIter<String>>;

/// Split text into fixed-size chunks on character boundaries
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if chunk_size == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Render a comparison result as one multi-section Markdown document
///
/// Per-persona sections in input order, then the synthesis section.
pub fn format_comparison_markdown(comparison: &ComparisonResult) -> String {
    let mut output = String::from("# Multi-Perspective Comparison\n\n");

    for analysis in &comparison.analyses {
        output.push_str(&format!(
            "## {} ({})\n\n",
            analysis.persona_name, analysis.persona_title
        ));
        output.push_str(&analysis.analysis);
        output.push_str("\n\n---\n\n");
    }

    output.push_str("## 🔍 Comparison Summary\n\n");
    output.push_str(&comparison.comparison_summary);
    output
}

impl PerspectiveEngine {
    /// Streaming variant of [`analyze_one`]
    ///
    /// The analysis text (or its error description) arrives as fixed-size
    /// chunks once the underlying call completes.
    ///
    /// [`analyze_one`]: Self::analyze_one
    pub async fn analyze_one_stream(
        &self,
        material: &str,
        persona_id: &str,
        context: Option<&str>,
    ) -> Result<TextChunkStream> {
        let result = self.analyze_one(material, persona_id, context).await?;
        let chunks = chunk_text(&result.analysis, self.config().analysis_chunk_size);
        Ok(futures::stream::iter(chunks))
    }

    /// Streaming variant of [`compare`]
    ///
    /// Yields the full comparison Markdown (individual sections plus the
    /// synthesis) as fixed-size chunks.
    ///
    /// [`compare`]: Self::compare
    pub async fn compare_stream(
        &self,
        material: &str,
        persona_ids: &[String],
        context: Option<&str>,
    ) -> Result<TextChunkStream> {
        let comparison = self.compare(material, persona_ids, context).await?;
        let markdown = format_comparison_markdown(&comparison);
        let chunks = chunk_text(&markdown, self.config().comparison_chunk_size);
        Ok(futures::stream::iter(chunks))
    }
}
