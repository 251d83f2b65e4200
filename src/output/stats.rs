//! Statistics reporting.

use console::style;

use crate::export::ExportSummary;

/// Print the counters of a finished export.
pub fn print_export_stats(summary: &ExportSummary) {
    println!();
    println!(
        "{}",
        style(format!("Statistics for character {}:", summary.character_id)).bold()
    );
    println!("  Notes:       {}", summary.notes);
    if summary.markdown_notes > 0 {
        println!("  Markdown:    {}", summary.markdown_notes);
        println!("  Attachments: {}", attachments_line(summary));
        if summary.attachments_failed > 0 {
            println!(
                "  Failed:      {}",
                style(summary.attachments_failed).yellow()
            );
        }
    }
    println!(
        "  Archive:     {} ({} bytes)",
        summary.archive_path.display(),
        summary.archive_bytes
    );
}

/// `<saved>/<total> saved`, the total counting every media link seen.
fn attachments_line(summary: &ExportSummary) -> String {
    format!(
        "{}/{} saved",
        summary.attachments_saved,
        summary.attachments_total()
    )
}

/// Print the character IDs found in the snapshot.
pub fn print_character_ids(ids: &[i64]) {
    println!();
    println!(
        "{}",
        style(format!("{} characters in snapshot:", ids.len())).bold()
    );
    for id in ids {
        println!("  {}", id);
    }
}
