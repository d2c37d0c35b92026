//! Server-rendered HTML pages.
//!
//! The pages are small enough that they are rendered inline with `format!`
//! rather than through a template engine.

use axum::response::Html;

use crate::model::{PatientRecord, RiskLevel};

/// Shared page shell.
fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Cardiograph</title>
<style>
  body {{ font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }}
  header {{ background: #0f172a; color: #f8fafc; padding: 1rem 2rem; }}
  header a {{ color: #f8fafc; text-decoration: none; margin-right: 1.5rem; }}
  main {{ max-width: 720px; margin: 2rem auto; padding: 0 1rem; }}
  form {{ display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }}
  label {{ display: block; font-weight: 600; margin-bottom: 0.25rem; }}
  input, select {{ width: 100%; padding: 0.4rem; box-sizing: border-box; }}
  button {{ grid-column: span 2; padding: 0.6rem; background: #0f172a; color: #fff; border: 0; cursor: pointer; }}
  .result {{ text-align: center; padding: 2rem; background: #fff; border-radius: 8px; }}
  .result .probability {{ font-size: 3rem; font-weight: 700; }}
  .error {{ background: #fef2f2; border: 1px solid #f43f5e; padding: 1rem; border-radius: 8px; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 1.5rem; }}
  td, th {{ text-align: left; padding: 0.3rem 0.5rem; border-bottom: 1px solid #e2e8f0; }}
</style>
</head>
<body>
<header>
  <a href="/">Predict</a>
  <a href="/about">About</a>
</header>
<main>
{body}
</main>
</body>
</html>"#
    )
}

fn select_field(name: &str, label: &str, options: &[(&str, &str)]) -> String {
    let mut html = format!("<div><label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">");
    for (value, text) in options {
        html.push_str(&format!("<option value=\"{value}\">{text}</option>"));
    }
    html.push_str("</select></div>");
    html
}

fn number_field(name: &str, label: &str, min: &str, max: &str, step: &str, value: &str) -> String {
    format!(
        "<div><label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" required></div>"
    )
}

/// Minimal HTML escaping for text that echoes request input.
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn index_page() -> Html<String> {
    let mut form = String::from("<h1>Cardiac Risk Assessment</h1>\
        <p>Enter the patient attributes below to estimate the probability of heart disease.</p>\
        <form method=\"post\" action=\"/predict\">");
    form.push_str(&number_field("age", "Age (years)", "1", "120", "1", "45"));
    form.push_str(&select_field(
        "sex",
        "Sex",
        &[("0", "Female"), ("1", "Male")],
    ));
    form.push_str(&select_field(
        "chest_pain_type",
        "Chest pain type",
        &[
            ("0", "Typical angina"),
            ("1", "Atypical angina"),
            ("2", "Non-anginal pain"),
            ("3", "Asymptomatic"),
        ],
    ));
    form.push_str(&number_field(
        "resting_bp",
        "Resting blood pressure (mmHg)",
        "50",
        "250",
        "1",
        "130",
    ));
    form.push_str(&number_field(
        "cholesterol",
        "Serum cholesterol (mg/dl)",
        "100",
        "600",
        "1",
        "250",
    ));
    form.push_str(&select_field(
        "fasting_blood_sugar",
        "Fasting blood sugar > 120 mg/dl",
        &[("0", "No"), ("1", "Yes")],
    ));
    form.push_str(&select_field(
        "resting_ecg",
        "Resting ECG",
        &[
            ("0", "Normal"),
            ("1", "ST-T wave abnormality"),
            ("2", "Left ventricular hypertrophy"),
        ],
    ));
    form.push_str(&number_field(
        "max_heart_rate",
        "Maximum heart rate (bpm)",
        "60",
        "220",
        "1",
        "150",
    ));
    form.push_str(&select_field(
        "exercise_angina",
        "Exercise-induced angina",
        &[("0", "No"), ("1", "Yes")],
    ));
    form.push_str(&number_field(
        "oldpeak",
        "ST depression (oldpeak)",
        "0",
        "10",
        "0.1",
        "1.2",
    ));
    form.push_str(&select_field(
        "slope",
        "ST slope",
        &[("0", "Upsloping"), ("1", "Flat"), ("2", "Downsloping")],
    ));
    form.push_str(&select_field(
        "major_vessels",
        "Major vessels (fluoroscopy)",
        &[("0", "0"), ("1", "1"), ("2", "2"), ("3", "3")],
    ));
    form.push_str(&select_field(
        "thalassemia",
        "Thalassemia",
        &[
            ("0", "Unknown"),
            ("1", "Normal"),
            ("2", "Fixed defect"),
            ("3", "Reversible defect"),
        ],
    ));
    form.push_str("<button type=\"submit\">Assess Risk</button></form>");

    Html(page("Predict", &form))
}

pub fn result_page(probability: f64, level: RiskLevel, record: &PatientRecord) -> Html<String> {
    let percent = probability * 100.0;
    let body = format!(
        "<h1>Assessment Result</h1>\
         <div class=\"result\">\
           <div class=\"probability\" style=\"color: {color}\">{percent:.2}%</div>\
           <h2 style=\"color: {color}\">{level}</h2>\
           <p>{description}</p>\
         </div>\
         <table>\
           <tr><th>Attribute</th><th>Value</th></tr>\
           <tr><td>Age</td><td>{age}</td></tr>\
           <tr><td>Sex</td><td>{sex}</td></tr>\
           <tr><td>Chest pain type</td><td>{cp}</td></tr>\
           <tr><td>Resting blood pressure</td><td>{bp}</td></tr>\
           <tr><td>Cholesterol</td><td>{chol}</td></tr>\
           <tr><td>Fasting blood sugar flag</td><td>{fbs}</td></tr>\
           <tr><td>Resting ECG</td><td>{ecg}</td></tr>\
           <tr><td>Max heart rate</td><td>{hr}</td></tr>\
           <tr><td>Exercise angina</td><td>{angina}</td></tr>\
           <tr><td>Oldpeak</td><td>{oldpeak}</td></tr>\
           <tr><td>ST slope</td><td>{slope}</td></tr>\
           <tr><td>Major vessels</td><td>{vessels}</td></tr>\
           <tr><td>Thalassemia</td><td>{thal}</td></tr>\
         </table>\
         <p><a href=\"/\">New assessment</a></p>",
        color = level.color(),
        description = level.description(),
        age = record.age,
        sex = record.sex,
        cp = record.chest_pain_type,
        bp = record.resting_bp,
        chol = record.cholesterol,
        fbs = record.fasting_blood_sugar,
        ecg = record.resting_ecg,
        hr = record.max_heart_rate,
        angina = record.exercise_angina,
        oldpeak = record.oldpeak,
        slope = record.slope,
        vessels = record.major_vessels,
        thal = record.thalassemia,
    );
    Html(page("Result", &body))
}

pub fn error_page(message: &str) -> Html<String> {
    let body = format!(
        "<h1>Something went wrong</h1>\
         <div class=\"error\">{}</div>\
         <p><a href=\"/\">Back to the form</a></p>",
        escape(message)
    );
    Html(page("Error", &body))
}

pub fn about_page() -> Html<String> {
    let body = "<h1>About</h1>\
        <p>Cardiograph estimates the probability of heart disease from 13 clinical\
        attributes using a random forest classifier trained on a synthetic cohort.\
        The probability is bucketed into four risk levels: Low (&lt; 30%), Moderate\
        (30&ndash;60%), High (60&ndash;80%) and Very High (&ge; 80%).</p>\
        <p>A JSON API is available at <code>POST /api/v1/predict</code>; the trained\
        model's feature importances are exposed at <code>GET /api/v1/model/importance</code>.</p>\
        <p><strong>This tool is a demonstration and must not be used for real\
        medical decisions.</strong></p>";
    Html(page("About", body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>&\"x\""), "&lt;b&gt;&amp;&quot;x&quot;");
    }

    #[test]
    fn test_index_page_has_all_fields() {
        let Html(body) = index_page();
        for name in crate::model::FEATURE_LAYOUT {
            assert!(body.contains(&format!("name=\"{name}\"")), "missing {name}");
        }
    }

    #[test]
    fn test_error_page_escapes_message() {
        let Html(body) = error_page("<script>alert(1)</script>");
        assert!(!body.contains("<script>alert"));
        assert!(body.contains("&lt;script&gt;"));
    }
}
