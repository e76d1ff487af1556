//! Markdown structure templates per content type.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "Blog Post")]
    BlogPost,
    #[serde(rename = "Landing Page")]
    LandingPage,
    #[serde(rename = "Product Page")]
    ProductPage,
    #[serde(rename = "Guide/Tutorial")]
    GuideTutorial,
    #[serde(rename = "Comparison Article")]
    ComparisonArticle,
}

impl ContentType {
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "Blog Post",
            ContentType::LandingPage => "Landing Page",
            ContentType::ProductPage => "Product Page",
            ContentType::GuideTutorial => "Guide/Tutorial",
            ContentType::ComparisonArticle => "Comparison Article",
        }
    }

    /// Skeleton the model is asked to follow. Placeholders are descriptive only.
    pub fn structure(&self) -> &'static str {
        match self {
            ContentType::BlogPost => BLOG_POST,
            ContentType::LandingPage => LANDING_PAGE,
            ContentType::ProductPage => PRODUCT_PAGE,
            ContentType::GuideTutorial => GUIDE_TUTORIAL,
            ContentType::ComparisonArticle => COMPARISON_ARTICLE,
        }
    }
}

const BLOG_POST: &str = "\
# {title}

## Introduction
{introduction}

## {section_1_title}
{section_1_content}

## {section_2_title}
{section_2_content}

## {section_3_title}
{section_3_content}

## Key Takeaways
{key_takeaways}

## Conclusion
{conclusion}";

const LANDING_PAGE: &str = "\
# {headline}

## {value_proposition}

### Benefits
{benefits}

### Features
{features}

### How It Works
{how_it_works}

### Testimonials
{testimonials}

### Call to Action
{cta}";

const PRODUCT_PAGE: &str = "\
# {product_name}

## Product Overview
{overview}

## Key Features
{features}

## Specifications
{specifications}

## Benefits
{benefits}

## Customer Reviews
{reviews}

## Pricing
{pricing}

## Call to Action
{cta}";

const GUIDE_TUTORIAL: &str = "\
# {title}

## What You'll Learn
{objectives}

## Prerequisites
{prerequisites}

## Step 1: {step_1_title}
{step_1_content}

## Step 2: {step_2_title}
{step_2_content}

## Step 3: {step_3_title}
{step_3_content}

## Common Issues & Solutions
{troubleshooting}

## Summary
{summary}

## Next Steps
{next_steps}";

const COMPARISON_ARTICLE: &str = "\
# {title}

## Quick Comparison Table
{comparison_table}

## Overview
{overview}

## {option_1_name} Review
### Pros
{option_1_pros}
### Cons
{option_1_cons}
### Best For
{option_1_best_for}

## {option_2_name} Review
### Pros
{option_2_pros}
### Cons
{option_2_cons}
### Best For
{option_2_best_for}

## Final Verdict
{verdict}

## Recommendation
{recommendation}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_uses_display_names_on_the_wire() {
        let parsed: ContentType = serde_json::from_str("\"Guide/Tutorial\"").unwrap();
        assert_eq!(parsed, ContentType::GuideTutorial);
        assert_eq!(
            serde_json::to_string(&ContentType::BlogPost).unwrap(),
            "\"Blog Post\""
        );
    }

    #[test]
    fn test_every_structure_starts_with_h1() {
        for ct in [
            ContentType::BlogPost,
            ContentType::LandingPage,
            ContentType::ProductPage,
            ContentType::GuideTutorial,
            ContentType::ComparisonArticle,
        ] {
            assert!(ct.structure().starts_with("# "), "{}", ct.label());
        }
    }
}
