//! Spoken-style summaries assembled from the other passport sections.

use passport_core::{
    FitSummary, FitVerdict, Narration, ReturnRisk, ReviewTheme, Severity, SustainabilityInfo,
};

/// Everything the narration templates read.
#[derive(Debug, Clone, Copy)]
pub struct NarrationContext<'a> {
    pub name: &'a str,
    pub price: Option<&'a str>,
    pub rating: Option<&'a str>,
    pub fit: Option<&'a FitSummary>,
    pub themes: &'a [ReviewTheme],
    pub return_risk: &'a ReturnRisk,
    pub sustainability: &'a SustainabilityInfo,
}

fn sentence_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

#[must_use]
pub fn narrate(ctx: &NarrationContext<'_>) -> Narration {
    let price = ctx.price.map(|p| format!(" at {p}")).unwrap_or_default();
    let short = format!(
        "{}{price}: {} sustainability ({}/100), {} return risk.",
        ctx.name,
        ctx.sustainability.rating.as_str(),
        ctx.sustainability.overall_score,
        ctx.return_risk.label.as_str().to_lowercase(),
    );

    let mut sentences = vec![format!("{}{price}.", ctx.name)];
    if let Some(rating) = ctx.rating {
        sentences.push(format!("Shoppers rate it {rating}."));
    }
    if let Some(fit) = ctx.fit {
        let phrase = match fit.verdict {
            FitVerdict::RunsSmall => "runs small",
            FitVerdict::TrueToSize => "fits true to size",
            FitVerdict::RunsLarge => "runs large",
        };
        sentences.push(format!(
            "Reviewers say it {phrase} ({:.0}% confidence).",
            fit.confidence * 100.0
        ));
    }

    let praised: Vec<String> = ctx
        .themes
        .iter()
        .filter(|t| t.severity == Severity::Low)
        .map(|t| t.label.to_lowercase())
        .collect();
    let concerns: Vec<String> = ctx
        .themes
        .iter()
        .filter(|t| t.severity == Severity::High)
        .map(|t| t.label.to_lowercase())
        .collect();
    if !praised.is_empty() {
        sentences.push(format!("Reviews praise its {}.", sentence_list(&praised)));
    }
    if !concerns.is_empty() {
        sentences.push(format!(
            "Common complaints concern {}.",
            sentence_list(&concerns)
        ));
    }

    sentences.push(format!(
        "Sustainability is rated {} at {} out of 100.",
        ctx.sustainability.rating.as_str(),
        ctx.sustainability.overall_score
    ));
    sentences.push(format!(
        "Return risk is {} ({:.0}%).",
        ctx.return_risk.label.as_str().to_lowercase(),
        ctx.return_risk.score * 100.0
    ));

    Narration {
        short,
        medium: sentences.join(" "),
    }
}
