//! HTML rendering for the dashboard pages.
//!
//! Pages are built from plain strings; every piece of provider data goes
//! through [`escape_html`] before it is written out.

use crate::models::MarketSide;
use crate::services::ColoredMover;
use crate::utils::escape_html;
use chrono::NaiveDate;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 2rem; color: #222; }
h1 { margin-bottom: 0.25rem; }
nav a { margin-right: 1rem; }
.updated { color: #666; font-size: 0.9rem; }
.boards { display: flex; flex-wrap: wrap; gap: 2rem; }
table { border-collapse: collapse; min-width: 28rem; }
th, td { padding: 0.35rem 0.75rem; text-align: left; border-bottom: 1px solid #ddd; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.error { color: #b00020; }
"#;

/// Wrap `body` in the shared page layout
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Snapshots</a><a href=\"/live\">Live</a><a href=\"/cached\">Cached</a></nav>\n\
         {body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// List of stored snapshot dates, newest first
pub fn index_page(dates: &[NaiveDate]) -> String {
    let mut body = String::from("<h1>Daily Market Movers</h1>\n");

    if dates.is_empty() {
        body.push_str("<p>No snapshots stored yet.</p>\n");
    } else {
        body.push_str("<ul class=\"snapshots\">\n");
        for date in dates {
            let day = date.format("%Y-%m-%d");
            body.push_str(&format!(
                "<li><a href=\"/snapshots/{day}\">{day}</a></li>\n"
            ));
        }
        body.push_str("</ul>\n");
    }

    layout("Daily Market Movers", &body)
}

/// Gainers and losers side by side, each row shaded by its color
pub fn movers_page(
    title: &str,
    gainers: &[ColoredMover],
    losers: &[ColoredMover],
    last_updated: &str,
) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"updated\">Last updated: {}</p>\n<div class=\"boards\">\n{}{}</div>\n",
        escape_html(title),
        escape_html(last_updated),
        movers_table(MarketSide::Gainers, gainers),
        movers_table(MarketSide::Losers, losers),
    );
    layout(title, &body)
}

/// One side of the board. The sector column only appears when some row has one.
pub fn movers_table(side: MarketSide, rows: &[ColoredMover]) -> String {
    let with_sector = rows.iter().any(|row| row.mover.sector.is_some());

    let mut html = format!("<section class=\"{}\">\n<h2>{}</h2>\n", side.as_str(), side.title());
    if rows.is_empty() {
        html.push_str("<p>No data.</p>\n</section>\n");
        return html;
    }

    html.push_str("<table>\n<thead><tr><th>Symbol</th><th>Name</th><th>Price</th><th>Change</th><th>Change %</th>");
    if with_sector {
        html.push_str("<th>Sector</th>");
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in rows {
        let mover = &row.mover;
        html.push_str(&format!(
            "<tr style=\"background-color: {}\"><td><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></td>\
             <td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>",
            escape_html(&row.color),
            escape_html(&mover.launch_link()),
            escape_html(&mover.symbol),
            escape_html(&mover.name),
            escape_html(&mover.price),
            escape_html(&mover.change),
            escape_html(&mover.changes_percentage),
        ));
        if with_sector {
            html.push_str(&format!(
                "<td>{}</td>",
                escape_html(mover.sector.as_deref().unwrap_or(""))
            ));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

pub fn error_page(message: &str) -> String {
    let body = format!("<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n", escape_html(message));
    layout("Error", &body)
}
