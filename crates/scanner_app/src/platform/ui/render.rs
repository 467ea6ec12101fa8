use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scanner_core::{
    AppViewModel, Listing, ListingView, Phase, SearchView, Severity, UploadView, ViewMode,
};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders the view model as terminal lines, one screen per call.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![tab_bar(view.view)];

    if let Some(notification) = &view.notification {
        let tag = match notification.severity {
            Severity::Success => "OK",
            Severity::Error => "ERROR",
        };
        lines.push(format!("[{tag}] {}", notification.message));
    }

    match view.view {
        ViewMode::Search => render_search(&view.search, &mut lines),
        ViewMode::Listings => render_listings(view, &mut lines),
        ViewMode::Upload => render_upload(&view.upload, &mut lines),
    }
    lines
}

fn tab_bar(active: ViewMode) -> String {
    ViewMode::ALL
        .iter()
        .enumerate()
        .map(|(index, mode)| {
            let label = view_label(*mode);
            if *mode == active {
                format!("[{}:{label}]", index + 1)
            } else {
                format!(" {}:{label} ", index + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn view_label(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Search => "Search",
        ViewMode::Listings => "Listings",
        ViewMode::Upload => "Upload",
    }
}

fn render_search(search: &SearchView, lines: &mut Vec<String>) {
    if let Some(query) = &search.query {
        lines.push(format!("Query: {query}"));
    }
    if search.is_loading {
        lines.push("Searching...".to_string());
        return;
    }
    if let Some(summary) = search.summary {
        lines.push(format!(
            "Found {} results ({} new)",
            summary.total, summary.new_count
        ));
    }
    if search.phase == Phase::Failed {
        if let Some(error) = &search.error {
            lines.push(format!("Search failed: {error}"));
        }
    }
    for row in &search.rows {
        lines.push(format!("  {} [{}] {}", row.title, row.status_label, row.domain));
        lines.push(format!("    {}", row.link));
        if !row.description.is_empty() {
            lines.push(format!("    {}", row.description));
        }
    }
}

fn render_listings(view: &AppViewModel, lines: &mut Vec<String>) {
    let listings = &view.listings;
    let tab = |listing: Listing, heading: &str| {
        if listings.active == listing {
            format!("[{heading}]")
        } else {
            format!(" {heading} ")
        }
    };
    lines.push(format!(
        "{} {}",
        tab(Listing::Known, &listings.known.heading),
        tab(Listing::New, &listings.new.heading)
    ));
    render_listing(listings.active_listing(), lines);
}

fn render_listing(listing: &ListingView, lines: &mut Vec<String>) {
    if listing.phase == Phase::Pending {
        lines.push("Loading...".to_string());
    }
    if listing.rows.is_empty() && listing.phase.is_settled() {
        lines.push("No sources".to_string());
        return;
    }
    for row in &listing.rows {
        lines.push(format!(
            "  {:<28} {:<24} {:<16} {}",
            row.domain,
            row.name,
            format_date(&row.date),
            row.url
        ));
    }
}

fn render_upload(upload: &UploadView, lines: &mut Vec<String>) {
    lines.push("Import sources from a CSV file: upload <path>".to_string());
    for path in &upload.in_flight {
        lines.push(format!("Uploading {path}..."));
    }
    match (upload.phase, &upload.last_uploaded, &upload.error) {
        (Phase::Succeeded, Some(path), _) => lines.push(format!("Last upload: {path}")),
        (Phase::Failed, _, Some(error)) => lines.push(format!("Upload failed: {error}")),
        _ => {}
    }
}

/// Formats backend timestamps for display; anything unparseable is shown as-is.
fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DATE_FORMAT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(DATE_FORMAT).to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
