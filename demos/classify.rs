//! Classify a sample request and print the assessment

fn main() {
    let json = r#"{
        "sleep_duration": 8.0,
        "heart_rate": 85,
        "daily_steps": 6000,
        "bmi": 30
    }"#;

    match sleep_triage::classify_json(json.to_string()) {
        Ok(assessment) => print!("{assessment}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
