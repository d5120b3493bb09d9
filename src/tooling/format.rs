//! Format build reports, subtree plans and locale listings as text.

use crate::assemble::AssemblyReport;
use crate::fetch::SubtreePlan;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Bold, underlined section heading.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Format a finished build as human-readable text.
pub fn format_build_report_text(report: &AssemblyReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}: assembled DevTools {} into {}\n\n",
        "SUCCESS".green().bold(),
        report.manifest.version,
        report.staging_dir.display()
    ));
    out.push_str(&format!("  Upstream: {}\n", report.upstream));
    out.push_str(&format!(
        "  Elapsed: {} ms\n\n",
        (report.finished_at - report.started_at).num_milliseconds()
    ));

    out.push_str(&format!("{}\n\n", format_section_heading("Phases")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Phase", "Result"]);
    table.add_row(vec![
        "Override files".to_string(),
        report.prepare.copied_files.to_string(),
    ]);
    table.add_row(vec![
        "Known files".to_string(),
        format!("{} ({} bytes)", report.known_files.files, report.known_files.bytes),
    ]);
    table.add_row(vec![
        format!("Addon {}", report.subtree.addon),
        format!(
            "{} dirs, {} files, {} skipped",
            report.subtree.directories, report.subtree.files, report.subtree.skipped
        ),
    ]);
    table.add_row(vec![
        "Locales".to_string(),
        format!(
            "{} of {} translated",
            report.locales.translated.len(),
            report.locales.discovered
        ),
    ]);
    table.add_row(vec![
        "Manifest version".to_string(),
        match &report.manifest.previous {
            Some(previous) => format!("{} -> {}", previous, report.manifest.version),
            None => report.manifest.version.clone(),
        },
    ]);
    table.add_row(vec![
        "README replaced".to_string(),
        if report.readme_replaced { "yes" } else { "no" }.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n", format_section_heading("Locales")));
    out.push_str(&format!(
        "  Skipped: {}\n",
        join_or_dash(&report.locales.skipped)
    ));
    out.push_str(&format!(
        "  Backfilled name: {}\n",
        join_or_dash(&report.locales.backfilled)
    ));
    let aliases: Vec<String> = report
        .aliases
        .iter()
        .map(|a| format!("{} -> {}", a.from, a.to))
        .collect();
    out.push_str(&format!("  Aliases: {}\n", join_or_dash(&aliases)));
    out.push_str(&format!(
        "  Published: {}\n",
        join_or_dash(&report.published_locales)
    ));
    out
}

/// Format a subtree plan in creation order.
pub fn format_plan_text(addon: &str, plan: &SubtreePlan) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Addon {}", addon))
    ));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Step", "Kind", "Path"]);
    let rows = plan
        .directories
        .iter()
        .map(|d| ("mkdir", d))
        .chain(plan.files.iter().map(|f| ("fetch", f)))
        .chain(plan.skipped.iter().map(|s| ("skip", s)));
    for (step, (kind, path)) in rows.enumerate() {
        table.add_row(vec![(step + 1).to_string(), kind.to_string(), path.clone()]);
    }
    out.push_str(&format!("{}\n", table));
    out.push_str(&format!(
        "{} directories, {} files, {} skipped\n",
        plan.directories.len(),
        plan.files.len(),
        plan.skipped.len()
    ));
    out
}

/// Format the upstream locale listing.
pub fn format_locales_text(locales: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Upstream locales")));
    if locales.is_empty() {
        out.push_str("No locales found.\n");
        return out;
    }
    for locale in locales {
        out.push_str(&format!("  {}\n", locale));
    }
    out.push_str(&format!("\n{} locales\n", locales.len()));
    out
}
