//! LLM prompt constants for length reconciliation.

/// Continuation prompt used when the rewritten document falls short of its target.
/// Replace: {shortfall}, {style_sample}, {document_tail}, {register_instruction},
///          {output_instruction}
pub const EXPANSION_PROMPT_TEMPLATE: &str = "\
Continue this humanized article by adding approximately {shortfall} more words.\n\
\n\
CRITICAL: Match this exact writing style (simple, direct, short sentences):\n\
{style_sample}\n\
\n\
The article currently ends with:\n\
...{document_tail}\n\
\n\
Continue from where it left off and add about {shortfall} more words. \
Do not repeat what has already been said. {register_instruction}\n\
\n\
{output_instruction}\n\
\n\
Continue the article:";

/// Temperature for continuation requests.
pub const EXPANSION_TEMPERATURE: f32 = 0.7;
