//! Client-side preview of a picked or dropped file.

/// Spreadsheet formats the upload widget previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xls,
    Xlsx,
}

impl FileKind {
    /// Recognize a file by its browser-reported MIME type. Anything else is
    /// not previewed.
    pub fn from_mime(mime: &str) -> Option<FileKind> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "text/csv" => Some(FileKind::Csv),
            "application/vnd.ms-excel" => Some(FileKind::Xls),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(FileKind::Xlsx)
            }
            _ => None,
        }
    }
}

/// Tags each picked file so a slow read for an earlier pick can tell it has
/// been superseded.
#[derive(Debug, Default)]
pub struct PickCounter {
    latest: u64,
}

impl PickCounter {
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, tag: u64) -> bool {
        tag == self.latest
    }
}

/// Human file size as shown in the preview header.
pub fn size_label(bytes: f64) -> String {
    format!("{:.2} KB", bytes / 1024.0)
}

/// Body of a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    /// Raw CSV text, cut to the first lines.
    Text { text: String, truncated: bool },
    /// First rows of the first Excel sheet.
    Grid { rows: Vec<Vec<String>>, truncated: bool },
}

/// A rendered preview: header plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub file_name: String,
    pub size: String,
    pub body: PreviewBody,
}

/// First `max_lines` lines of CSV text.
pub fn text_preview(text: &str, max_lines: usize) -> PreviewBody {
    let mut lines = text.lines();
    let head: Vec<&str> = lines.by_ref().take(max_lines).collect();
    PreviewBody::Text {
        text: head.join("\n"),
        truncated: lines.next().is_some(),
    }
}

/// First `max_rows` rows of a parsed sheet.
pub fn grid_preview(mut rows: Vec<Vec<String>>, max_rows: usize) -> PreviewBody {
    let truncated = rows.len() > max_rows;
    rows.truncate(max_rows);
    PreviewBody::Grid { rows, truncated }
}

/// Label on the drop zone once a file is chosen.
pub fn selected_label(file_name: &str) -> String {
    format!("Selected file: {file_name}")
}
