use std::borrow::Cow;

use anyhow::Context;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use time::{format_description::well_known::Rfc3339, Date};

use crate::feedback::FeedbackSubmission;

/// Column order consumed by downstream spreadsheets; append, never reorder.
pub const HEADERS: [&str; 45] = [
    "ID",
    "First Name",
    "Last Name",
    "Email",
    "Age",
    "Phone",
    "City",
    "State",
    "Instagram",
    "Cycle Length",
    "Last Period Date",
    "Period Regularity",
    "Cycle Phase",
    "Resting Heart Rate",
    "Current Medications",
    "Health Conditions",
    "Supplement Start Date",
    "Days Used",
    "Usage Frequency",
    "Time of Day",
    "Overall Satisfaction",
    "Taste",
    "Value",
    "Packaging",
    "Convenience",
    "Benefits Experienced",
    "Energy Level",
    "Mood Changes",
    "Sleep Quality",
    "Cramp Relief",
    "Bloating Relief",
    "Side Effects",
    "Side Effect Details",
    "Lifestyle Impact",
    "Favorite Aspect",
    "Least Favorite Aspect",
    "Improvement Suggestions",
    "Would Recommend",
    "Recommendation Reason",
    "Purchase Intent",
    "Price Willingness",
    "Testimonial Consent",
    "Final Thoughts",
    "Submitted At",
    "Source",
];

pub const SEQ_SEPARATOR: &str = "; ";

pub fn filename_for(date: Date) -> String {
    format!("feedback-export-{date}.csv")
}

/// Renders every record as one quoted CSV row under [`HEADERS`].
pub fn to_csv(records: &[FeedbackSubmission]) -> anyhow::Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(HEADERS).context("write csv header")?;
    for record in records {
        let fields = row(record)?;
        wtr.write_record(fields.iter().map(|f| f.as_bytes()))
            .with_context(|| format!("write csv row {}", record.id))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flush csv: {}", e.error()))?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

fn row(r: &FeedbackSubmission) -> anyhow::Result<[Cow<'_, str>; 45]> {
    let a = &r.answers;
    Ok([
        Cow::Owned(r.id.to_string()),
        text(&a.first_name),
        text(&a.last_name),
        text(&a.email),
        text(&a.age),
        text(&a.phone),
        text(&a.city),
        text(&a.state),
        text(&a.instagram),
        text(&a.cycle_length),
        text(&a.last_period_date),
        text(&a.period_regularity),
        text(&a.cycle_phase),
        text(&a.resting_heart_rate),
        text(&a.current_medications),
        text(&a.health_conditions),
        text(&a.supplement_start_date),
        text(&a.days_used),
        text(&a.usage_frequency),
        text(&a.time_of_day),
        rating(a.overall_satisfaction),
        rating(a.taste),
        rating(a.value),
        rating(a.packaging),
        rating(a.convenience),
        seq(&a.benefits_experienced),
        text(&a.energy_level),
        seq(&a.mood_changes),
        text(&a.sleep_quality),
        text(&a.cramp_relief),
        text(&a.bloating_relief),
        text(&a.side_effects),
        text(&a.side_effect_details),
        seq(&a.lifestyle_impact),
        text(&a.favorite_aspect),
        text(&a.least_favorite_aspect),
        text(&a.improvement_suggestions),
        text(&a.would_recommend),
        text(&a.recommendation_reason),
        text(&a.purchase_intent),
        text(&a.price_willingness),
        text(&a.testimonial_consent),
        text(&a.final_thoughts),
        Cow::Owned(r.submitted_at.format(&Rfc3339).context("format submitted_at")?),
        Cow::Borrowed(r.source.as_str()),
    ])
}

fn text(s: &str) -> Cow<'_, str> {
    Cow::Borrowed(s)
}

fn rating(v: Option<i32>) -> Cow<'static, str> {
    v.map(|n| Cow::Owned(n.to_string())).unwrap_or_default()
}

fn seq(items: &[String]) -> Cow<'static, str> {
    Cow::Owned(items.join(SEQ_SEPARATOR))
}
