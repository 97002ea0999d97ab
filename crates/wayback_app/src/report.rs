use std::path::{Path, PathBuf};

use chrono::Local;
use wayback_engine::{AtomicFileWriter, PersistError, RunReport};

/// Write the dated plain-text run report into the account root and return
/// its path.
pub fn write_report(root: &Path, run: &RunReport) -> Result<PathBuf, PersistError> {
    let date = Local::now().format("%Y-%m-%d").to_string();
    let filename = format!("{date}-report.txt");
    let writer = AtomicFileWriter::new(root.to_path_buf());
    writer.write(&filename, &render_report(run, &date))
}

fn render_report(run: &RunReport, date: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Wayback Report - {} - {}\n",
        run.account, date
    ));
    out.push_str(&format!(
        "Pages Parsed: {} | Images Processed: {} | Downloaded Images: {}\n",
        run.pages_parsed, run.images_processed, run.images_saved
    ));
    for page in &run.processed_pages {
        out.push_str(page);
        out.push('\n');
    }
    for image in &run.processed_images {
        out.push_str(image);
        out.push('\n');
    }
    out
}
