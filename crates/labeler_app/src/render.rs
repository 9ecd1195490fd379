use labeler_core::{AppViewModel, RowView, SaveStatusView};

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render_row(row: &RowView) -> String {
    let marker = if row.edited { "*" } else { " " };
    let mut line = format!(
        "{marker}{:>4}. {} Standard {} Not Standard  {}",
        row.number,
        checkbox(row.standard),
        checkbox(row.not_standard),
        row.link_text()
    );
    if !row.reason.is_empty() {
        line.push_str(&format!("\n        reason: {}", row.reason));
    }
    line
}

pub fn render_status(view: &AppViewModel) -> String {
    let save = match &view.save {
        SaveStatusView::Idle => "not saved yet".to_string(),
        SaveStatusView::Saving => "saving...".to_string(),
        SaveStatusView::Saved { version: Some(version) } => format!("saved ({version})"),
        SaveStatusView::Saved { version: None } => "saved".to_string(),
        SaveStatusView::Failed { conflict: true, message } => {
            format!("CONFLICT, reload and save again: {message}")
        }
        SaveStatusView::Failed { message, .. } => format!("failed: {message}"),
    };
    format!(
        "Rows shown: {} of {} | Labeled: {} | Pending edits: {} | Save: {}",
        view.rows.len(),
        view.total_rows,
        view.labeled,
        view.pending_edits,
        save
    )
}

pub fn render(view: &AppViewModel) -> String {
    let mut out: Vec<String> = view.rows.iter().map(render_row).collect();
    out.push(render_status(view));
    out.join("\n")
}
