// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Content generation prompt.
/// Replace: {structure}, {content_type}, {audience}, {brief}, {title},
///          {word_count}, {keyword}, {chat_context}, {output_instruction}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert content writer specializing in SEO-optimized, engaging content.

ROLE: Create a {content_type} that is informative, engaging, and optimized for search engines.

TARGET AUDIENCE: {audience}

CONTENT BRIEF:
{brief}

TITLE: {title}

TARGET WORD COUNT: {word_count} words

CONTENT TYPE STRUCTURE: {content_type}
{structure}

PRIMARY KEYWORD: {keyword}
{chat_context}
WRITING GUIDELINES:
1. Write in a conversational yet professional tone appropriate for {audience}
2. Use the primary keyword naturally 3-5 times throughout the content
3. Include related keywords and semantic variations naturally
4. Create compelling headers and subheaders
5. Use short paragraphs (2-3 sentences) for better readability
6. Include actionable insights and practical examples
7. Add statistics or data points where relevant (you can use placeholder like [stat needed])
8. End with a strong call-to-action appropriate for the content type
9. Maintain approximately {word_count} words

IMPORTANT:
- Do NOT use generic filler content
- Do NOT keyword stuff
- Focus on providing genuine value to the reader
- Make the content scannable with proper formatting
- Use markdown formatting for headers, lists, and emphasis

{output_instruction}

Now, generate the complete {content_type} content:"#;

/// Refinement prompt.
/// Replace: {content}, {instruction}, {keyword_line}, {output_instruction}
pub const REFINE_PROMPT_TEMPLATE: &str = r#"You are refining existing content based on user feedback.

CURRENT CONTENT:
{content}

REFINEMENT INSTRUCTION:
{instruction}

{keyword_line}

Please revise the content according to the instruction while:
1. Maintaining the overall structure and key points
2. Keeping SEO optimization intact
3. Preserving the target audience focus
4. Ensuring the refined version is coherent and complete

{output_instruction}

Provide the refined content:"#;

/// Improvement suggestions prompt.
/// Replace: {snippet}
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = r#"Analyze this content and provide 5 specific, actionable improvement suggestions:

{snippet}

Provide ONE concise suggestion for each area (keep each under 100 words):
1. SEO optimization - keyword usage and search visibility
2. Readability and engagement - tone, formatting, user experience
3. Content structure - organization, headings, flow
4. Call-to-action effectiveness - conversion elements
5. Target audience appeal - relevance and resonance

Format each suggestion as:
[Area]: [Specific actionable suggestion]

Be specific and practical. Avoid generic advice."#;

pub const GENERATION_TEMPERATURE: f32 = 0.7;
pub const REFINE_TEMPERATURE: f32 = 0.5;
pub const SUGGESTIONS_TEMPERATURE: f32 = 0.3;
