//! Recommendation text for each classification

use crate::types::Label;

/// Follow-up advice shown alongside a prediction
pub fn recommendation(label: Label) -> &'static str {
    match label {
        Label::Insomnia => concat!(
            "Recommendation: consult a doctor, keep a regular sleep schedule, ",
            "and avoid caffeine before bed."
        ),
        Label::SleepApnea => concat!(
            "Recommendation: consult a sleep specialist, consider a sleep study, ",
            "and maintain a healthy weight."
        ),
        Label::None => "Sleep looks normal. Keep up healthy habits and regular exercise.",
    }
}
