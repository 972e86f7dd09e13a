//! Plain-text rendering of session views.

use std::fmt::Write as _;

use pollen_engine::{AttachmentKind, Role, SessionView, TranscriptEntry};

pub fn header(view: &SessionView<'_>) -> String {
    format!(
        "{} | model: {} | temperature: {} | private: {} | theme: {} | language: {}",
        view.title,
        view.selected_model.unwrap_or("-"),
        view.temperature,
        if view.private { "on" } else { "off" },
        view.theme.as_str(),
        view.language,
    )
}

pub fn status(view: &SessionView<'_>) -> String {
    if view.status_is_error {
        format!("! {}", view.status)
    } else {
        format!("· {}", view.status)
    }
}

pub fn models(view: &SessionView<'_>) -> String {
    let mut out = String::new();
    for group in &view.model_groups {
        let _ = writeln!(out, "{}:", group.label);
        for model in &group.models {
            let marker = if Some(model.name.as_str()) == view.selected_model {
                '*'
            } else {
                ' '
            };
            let _ = writeln!(out, " {marker} {:<24} {}", model.name, model.label());
        }
    }
    if let Some(info) = view.model_info.as_deref().filter(|i| !i.is_empty()) {
        let _ = writeln!(out, "{info}");
    }
    out
}

pub fn staged(view: &SessionView<'_>) -> String {
    if view.staged.is_empty() {
        return "no files staged\n".to_string();
    }
    let mut out = String::new();
    for file in &view.staged {
        let _ = writeln!(
            out,
            "{:>2}. {} {} ({} bytes)",
            file.index + 1,
            kind_icon(file.kind),
            file.display_name,
            file.size_bytes
        );
    }
    out
}

pub fn transcript(entries: &[TranscriptEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry_line(entry));
        out.push('\n');
    }
    out
}

fn entry_line(entry: &TranscriptEntry) -> String {
    let who = match entry.role {
        Role::User => "you",
        Role::Assistant => "ai",
        Role::Error => "error",
    };
    let files: String = entry
        .attachments
        .iter()
        .map(|a| format!("[{} {}] ", kind_icon(a.kind), a.name))
        .collect();
    format!("{who}> {files}{}", entry.text)
}

const fn kind_icon(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Text => "txt",
        AttachmentKind::Image => "img",
        AttachmentKind::Other => "file",
    }
}

#[cfg(test)]
mod tests {
    use pollen_engine::{AttachmentKind, AttachmentSummary, Role, TranscriptEntry};

    use super::transcript;

    #[test]
    fn transcript_lines_carry_role_and_files() {
        let entries = vec![
            TranscriptEntry::new(
                Role::User,
                "look",
                vec![AttachmentSummary {
                    name: "cat.png".into(),
                    mime_type: "image/png".into(),
                    kind: AttachmentKind::Image,
                }],
            ),
            TranscriptEntry::new(Role::Error, "Error sending message: down", Vec::new()),
        ];
        assert_eq!(
            transcript(&entries),
            "you> [img cat.png] look\nerror> Error sending message: down\n"
        );
    }
}
