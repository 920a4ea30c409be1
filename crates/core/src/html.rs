//! HTML rendering of a [`ListView`]
//!
//! The page is plain server-rendered markup: a search form submitting
//! `?search=`, and column headers linking to the sort state a click on that
//! column produces, so the toggle works without scripting.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::jobs::{SortDirection, SortKey, SortState};
use crate::view::{JobRow, ListView, ViewOutcome};

pub const PAGE_TITLE: &str = "Co-op Job Repository";

/// Query string for a page with the given search term and sort state
pub fn page_query(search: &str, sort: Option<SortState>) -> String {
    let mut params = Vec::new();
    if !search.is_empty() {
        params.push(format!("search={}", urlencoding::encode(search)));
    }
    if let Some(sort) = sort {
        params.push(format!("sort={}", sort.key.as_str()));
        params.push(format!("dir={}", sort.direction.as_str()));
    }

    if params.is_empty() {
        "?".to_string()
    } else {
        format!("?{}", params.join("&"))
    }
}

fn sort_indicator(view: &ListView, key: SortKey) -> &'static str {
    match view.sort() {
        Some(state) if state.key == key => match state.direction {
            SortDirection::Ascending => " \u{25B2}",
            SortDirection::Descending => " \u{25BC}",
        },
        _ => "",
    }
}

fn render_header(view: &ListView) -> String {
    let cells: Vec<String> = SortKey::ALL
        .iter()
        .map(|key| {
            let next = SortState::next(view.sort(), *key);
            format!(
                "<th><a href=\"{}\">{}{}</a></th>",
                encode_double_quoted_attribute(&page_query(view.search(), Some(next))),
                key.label(),
                sort_indicator(view, *key)
            )
        })
        .collect();

    format!("<thead><tr>{}</tr></thead>", cells.join(""))
}

fn render_row(row: &JobRow) -> String {
    let cells: Vec<String> = row
        .cells()
        .iter()
        .map(|cell| format!("<td>{}</td>", encode_text(cell)))
        .collect();

    match &row.id {
        Some(id) => format!(
            "<tr data-id=\"{}\">{}</tr>",
            encode_double_quoted_attribute(id),
            cells.join("")
        ),
        None => format!("<tr>{}</tr>", cells.join("")),
    }
}

fn render_body(view: &ListView) -> String {
    match view.render() {
        ViewOutcome::Error { message } => {
            format!("<p class=\"error\">{}</p>", encode_text(&message))
        }
        ViewOutcome::Empty { message } => {
            format!("<p class=\"empty\">{}</p>", encode_text(&message))
        }
        ViewOutcome::Rows { rows } => {
            let body: Vec<String> = rows.iter().map(render_row).collect();
            format!(
                "<table>{}<tbody>{}</tbody></table>",
                render_header(view),
                body.join("")
            )
        }
    }
}

fn render_search_form(view: &ListView) -> String {
    let mut form = String::from("<form method=\"get\" action=\"/\">");
    form.push_str(&format!(
        "<input type=\"text\" name=\"search\" placeholder=\"Search...\" value=\"{}\">",
        encode_double_quoted_attribute(view.search())
    ));
    if let Some(sort) = view.sort() {
        form.push_str(&format!(
            "<input type=\"hidden\" name=\"sort\" value=\"{}\">",
            sort.key.as_str()
        ));
        form.push_str(&format!(
            "<input type=\"hidden\" name=\"dir\" value=\"{}\">",
            sort.direction.as_str()
        ));
    }
    form.push_str("<button type=\"submit\">Search</button></form>");
    form
}

/// Full HTML document for the current state of `view`
pub fn render_page(view: &ListView) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n</head>\n<body>\n<h1>{PAGE_TITLE}</h1>\n{}\n{}\n</body>\n</html>\n",
        render_search_form(view),
        render_body(view)
    )
}
