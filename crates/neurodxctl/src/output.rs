//! Terminal rendering for command results.

use neurodx_common::{Answer, AnswerSource, KnowledgeEntry, Prediction};
use owo_colors::OwoColorize;

const WRAP_WIDTH: usize = 78;

fn paint(text: &str, color: bool, style: fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

fn source_tag(source: AnswerSource, color: bool) -> String {
    let tag = format!("[{}]", source);
    if !color {
        return tag;
    }
    match source {
        AnswerSource::DiagnosisOverride => tag.yellow().to_string(),
        AnswerSource::KnowledgeMatch => tag.green().to_string(),
        AnswerSource::NoMatch => tag.dimmed().to_string(),
    }
}

pub fn format_answer(answer: &Answer, color: bool) -> String {
    let wrapped = textwrap::fill(&answer.text, WRAP_WIDTH.saturating_sub(3));
    let body = textwrap::indent(&wrapped, "   ");
    format!(
        "{} {}\n{}",
        paint("Answer", color, |s| s.bold().to_string()),
        source_tag(answer.source, color),
        body.trim_end()
    )
}

pub fn format_prediction(prediction: &Prediction, color: bool) -> String {
    let ctx = &prediction.context;
    let progression = prediction
        .progression
        .iter()
        .map(|v| format!("{:.1}", v))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        paint("Diagnosis:", color, |s| s.bold().to_string()),
        paint(ctx.label().label(), color, |s| s.cyan().to_string())
    ));
    out.push_str(&format!(
        "{} {}\n",
        paint("Confidence:", color, |s| s.bold().to_string()),
        ctx.confidence_percent()
    ));
    out.push_str(&format!(
        "Grad-CAM heatmap: {}x{}, mean intensity {:.1}\n",
        prediction.heatmap.width,
        prediction.heatmap.height,
        prediction.heatmap.mean_intensity()
    ));
    out.push_str(&format!(
        "SHAP map: mean {:.1}   LIME map: mean {:.1}\n",
        prediction.shap.mean_intensity(),
        prediction.lime.mean_intensity()
    ));
    out.push_str("Predicted progression (36 months):\n");
    out.push_str(&textwrap::indent(&textwrap::fill(&progression, WRAP_WIDTH - 3), "   "));
    out.trim_end().to_string()
}

pub fn format_knowledge(entries: &[KnowledgeEntry], color: bool) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let head = format!("{}. {}", i + 1, entry.trigger);
            let body = textwrap::indent(&textwrap::fill(&entry.answer, WRAP_WIDTH - 3), "   ");
            format!("{}\n{}", paint(&head, color, |s| s.bold().to_string()), body.trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
