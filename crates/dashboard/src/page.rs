//! Operator page rendering
//!
//! A single HTML document: the input form (bounded number controls with
//! defaults), the results region and the example evaluation panel.

use churn_lib::{
    evaluation::EvaluationReport,
    input::{FieldBounds, InputBounds},
    presenter::{ProportionChart, ViewModel},
    InputRecord, PredictionOutcome,
};
use std::fmt::Write;

pub struct PageView {
    pub bounds: InputBounds,
    /// Values shown in the form controls
    pub form: InputRecord,
    pub outcome: Option<PredictionOutcome>,
    pub error: Option<String>,
}

impl PageView {
    pub fn initial(bounds: InputBounds) -> Self {
        Self {
            form: bounds.defaults(),
            bounds,
            outcome: None,
            error: None,
        }
    }

    pub fn with_outcome(bounds: InputBounds, outcome: PredictionOutcome) -> Self {
        Self {
            bounds,
            form: outcome.record,
            outcome: Some(outcome),
            error: None,
        }
    }

    pub fn with_error(bounds: InputBounds, form: InputRecord, message: String) -> Self {
        Self {
            bounds,
            form,
            outcome: None,
            error: Some(message),
        }
    }
}

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; background: #f5f5f5; color: #222; }
.layout { display: flex; gap: 24px; max-width: 1100px; margin: 32px auto; padding: 0 16px; }
.sidebar { flex: 0 0 280px; background: white; padding: 20px; border-radius: 8px; }
.main { flex: 1; background: white; padding: 20px 28px; border-radius: 8px; }
label { display: block; margin-top: 12px; font-weight: bold; }
input[type=number] { width: 100%; padding: 6px; margin-top: 4px; box-sizing: border-box; }
button { margin-top: 18px; width: 100%; padding: 10px; font-size: 15px; cursor: pointer; }
.hint { font-size: 12px; color: #666; }
.banner { padding: 10px; border-radius: 10px; text-align: center; color: white; }
.banner.red { background: #c62828; }
.banner.green { background: #2e7d32; }
.error { padding: 10px; border-radius: 8px; background: #fdecea; color: #8a1c1c; }
.advisory { padding: 10px; border-left: 4px solid #888; background: #fafafa; }
.bar { display: flex; height: 28px; border-radius: 6px; overflow: hidden; margin: 8px 0; }
.bar .retained { background: #2e7d32; }
.bar .churn { background: #c62828; }
.metrics { display: flex; gap: 32px; }
.metric .value { font-size: 28px; }
table.matrix { border-collapse: collapse; margin-top: 8px; }
table.matrix td, table.matrix th { border: 1px solid #ccc; padding: 10px 16px; text-align: center; }
"#;

pub fn render(view: &PageView) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Customer Churn Prediction Dashboard</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"layout\">\n");

    render_form(&mut html, view);

    html.push_str("<div class=\"main\">\n<h1>Customer Churn Prediction Dashboard</h1>\n");
    html.push_str(
        "<p>Predicts whether a customer is <b>likely to churn</b> or <b>likely to stay</b> \
         from their profile.</p>\n<hr>\n<h2>Prediction Result</h2>\n",
    );
    render_results(&mut html, view);
    html.push_str("<hr>\n");
    render_evaluation(&mut html, &EvaluationReport::example());
    html.push_str("</div>\n</div>\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, view: &PageView) {
    html.push_str("<div class=\"sidebar\">\n<h3>Customer Data</h3>\n<form method=\"post\" action=\"/\">\n");
    number_input(html, "age", "Customer age", view.bounds.age, view.form.age);
    number_input(
        html,
        "subscription_months",
        "Subscription length (months)",
        view.bounds.subscription_months,
        view.form.subscription_months,
    );
    number_input(
        html,
        "complaint_count",
        "Number of complaints",
        view.bounds.complaint_count,
        view.form.complaint_count,
    );
    html.push_str("<button type=\"submit\">Predict now</button>\n</form>\n</div>\n");
}

fn number_input(html: &mut String, name: &str, label: &str, bounds: FieldBounds, value: u32) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" \
         step=\"1\" value=\"{value}\" required>\n\
         <div class=\"hint\">{min} to {max}, default {default}</div>\n",
        name = name,
        label = label,
        min = bounds.min,
        max = bounds.max,
        value = value,
        default = bounds.default,
    );
}

fn render_results(html: &mut String, view: &PageView) {
    if let Some(message) = &view.error {
        let _ = writeln!(html, "<div class=\"error\">{}</div>", escape(message));
        return;
    }

    let outcome = match &view.outcome {
        Some(outcome) => outcome,
        None => {
            html.push_str("<p class=\"hint\">Enter the customer data and press <b>Predict now</b>.</p>\n");
            return;
        }
    };

    let vm: &ViewModel = &outcome.view;
    let _ = writeln!(html, "<h3>{}: {}</h3>", vm.verdict, vm.headline);
    if let Some(text) = &vm.probability_text {
        let _ = writeln!(html, "<p><b>Churn probability:</b> {}</p>", text);
    }
    let _ = writeln!(
        html,
        "<div class=\"banner {}\"><h4>{}</h4></div>",
        vm.color.as_str(),
        vm.headline
    );
    if let (Some(tier), Some(advisory)) = (vm.risk_tier, vm.advisory) {
        let _ = writeln!(
            html,
            "<p><b>Risk tier:</b> {}</p>\n<div class=\"advisory\">{}</div>",
            tier, advisory
        );
    }
    if let Some(chart) = &vm.chart {
        render_chart(html, chart);
    }

    let record = &outcome.record;
    let _ = writeln!(
        html,
        "<p><a href=\"/export.csv?age={}&subscription_months={}&complaint_count={}\">\
         Download this prediction as CSV</a></p>",
        record.age, record.subscription_months, record.complaint_count
    );
}

fn render_chart(html: &mut String, chart: &ProportionChart) {
    html.push_str("<h4>Churn proportion</h4>\n<div class=\"bar\">");
    for slice in &chart.slices {
        let _ = write!(
            html,
            "<div class=\"{}\" style=\"width:{:.2}%\" title=\"{} {:.2}%\"></div>",
            slice.label.as_str().to_lowercase(),
            slice.share * 100.0,
            slice.label,
            slice.share * 100.0
        );
    }
    html.push_str("</div>\n<div class=\"hint\">");
    let legend: Vec<String> = chart
        .slices
        .iter()
        .map(|s| format!("{} {:.2}%", s.label, s.share * 100.0))
        .collect();
    html.push_str(&legend.join(" &middot; "));
    html.push_str("</div>\n");
}

fn render_evaluation(html: &mut String, report: &EvaluationReport) {
    html.push_str("<h2>Model Evaluation (simulated example)</h2>\n<div class=\"metrics\">\n");
    let _ = writeln!(
        html,
        "<div class=\"metric\"><div>Model accuracy</div><div class=\"value\">{}</div></div>\n\
         <div class=\"metric\"><div>F1-score</div><div class=\"value\">{}</div></div>",
        report.accuracy_text, report.f1_text
    );
    html.push_str("</div>\n<h3>Confusion Matrix (simulated example)</h3>\n");

    let matrix = report.metrics.confusion_matrix;
    let max = matrix.iter().flatten().copied().max().unwrap_or(1).max(1) as f64;
    html.push_str("<table class=\"matrix\">\n<tr><th>Actual \\ Predicted</th>");
    for class in &report.classes {
        let _ = write!(html, "<th>{}</th>", class);
    }
    html.push_str("</tr>\n");
    for (row, class) in matrix.iter().zip(report.classes.iter()) {
        let _ = write!(html, "<tr><th>{}</th>", class);
        for count in row {
            let alpha = *count as f64 / max;
            let text = if alpha > 0.5 { "white" } else { "black" };
            let _ = write!(
                html,
                "<td style=\"background: rgba(31,119,180,{:.2}); color: {}\">{}</td>",
                alpha, text, count
            );
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n<p><b>Interpretation:</b></p>\n<ul>\n");
    for cell in &report.cells {
        let _ = writeln!(
            html,
            "<li><b>{}</b> (actual {}, predicted {}): {}</li>",
            cell.name, cell.actual, cell.predicted, cell.meaning
        );
    }
    html.push_str("</ul>\n");
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_lib::presenter::present;
    use churn_lib::{ChurnLabel, PredictionResult};

    fn outcome(probability: Option<f64>) -> PredictionOutcome {
        let result = PredictionResult {
            label: ChurnLabel::Churn,
            probability,
        };
        PredictionOutcome {
            record: InputRecord {
                age: 41,
                subscription_months: 5,
                complaint_count: 9,
            },
            view: present(&result),
            result,
        }
    }

    #[test]
    fn test_initial_page_shows_bounds_and_defaults() {
        let html = render(&PageView::initial(InputBounds::canonical()));
        assert!(html.contains("name=\"age\" min=\"18\" max=\"100\" step=\"1\" value=\"30\""));
        assert!(html.contains("name=\"subscription_months\" min=\"0\" max=\"120\" step=\"1\" value=\"12\""));
        assert!(html.contains("name=\"complaint_count\" min=\"0\" max=\"20\" step=\"1\" value=\"2\""));
        assert!(!html.contains("class=\"banner"));
        assert!(html.contains("89.00%"));
    }

    #[test]
    fn test_outcome_with_probability() {
        let html = render(&PageView::with_outcome(
            InputBounds::canonical(),
            outcome(Some(0.85)),
        ));
        assert!(html.contains("banner red"));
        assert!(html.contains("85.00%"));
        assert!(html.contains("Risk tier:</b> high"));
        assert!(html.contains("class=\"bar\""));
        assert!(html.contains("/export.csv?age=41&subscription_months=5&complaint_count=9"));
    }

    #[test]
    fn test_outcome_without_probability() {
        let html = render(&PageView::with_outcome(InputBounds::canonical(), outcome(None)));
        assert!(html.contains("banner red"));
        assert!(!html.contains("Churn probability"));
        assert!(!html.contains("Risk tier"));
        assert!(!html.contains("class=\"bar\""));
    }

    #[test]
    fn test_error_is_escaped() {
        let html = render(&PageView::with_error(
            InputBounds::canonical(),
            InputRecord::default(),
            "<b>bad</b>".to_string(),
        ));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }
}
