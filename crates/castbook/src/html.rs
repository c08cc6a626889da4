//! HTML rendering of a [`TableView`].
//!
//! The page has two dynamic regions: the masthead (portrait, title, cameo)
//! and the table region (banner, table, pagination). The search box lives
//! between them and is never re-rendered, so it keeps focus while typing.
//! Controls carry `data-action` / `data-value` attributes that
//! [`Intent::from_action`](crate::Intent::from_action) understands.

use crate::avatar::Portrait;
use crate::intent::Intent;
use crate::view::{
    ActorRow, Body, MovieHeader, PaginationBar, TableView, NO_RESULTS_HINT, NO_RESULTS_TITLE,
    TITLE,
};
use std::fmt::Write;

/// Portrait shown above the title on phones and tablets.
pub const HEADER_PORTRAIT_SRC: &str = "/images/wes-head.png";

/// Side cameo shown on wide desktops.
pub const CAMEO_SRC: &str = "/images/wes.png";

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn action_attrs(intent: &Intent) -> String {
    match intent.value() {
        Some(value) => format!(
            r#"data-action="{}" data-value="{}""#,
            intent.action(),
            escape(&value)
        ),
        None => format!(r#"data-action="{}""#, intent.action()),
    }
}

/// Render the masthead region.
#[must_use]
pub fn render_masthead(view: &TableView) -> String {
    let mut out = String::new();
    if view.layout.show_header_portrait {
        let _ = write!(
            out,
            r#"<img class="header-portrait" src="{HEADER_PORTRAIT_SRC}" alt="" width="80" height="80">"#
        );
    }
    let _ = write!(out, r#"<h1 class="title">{}</h1>"#, escape(TITLE));
    if view.layout.show_cameo {
        let _ = write!(
            out,
            r#"<img class="cameo" src="{CAMEO_SRC}" alt="" width="150" height="400">"#
        );
    }
    out
}

/// Render the table region.
#[must_use]
pub fn render_table(view: &TableView) -> String {
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<div class="banner"><span>{}</span>"#,
        escape(&view.banner.text())
    );
    if view.banner.shows_clear() {
        let _ = write!(
            out,
            r#"<button class="clear" {}>Clear Filter</button>"#,
            action_attrs(&Intent::ClearMovie)
        );
    }
    out.push_str("</div>");

    out.push_str(r#"<div class="scroll"><table class="actors"><thead>"#);
    match &view.body {
        Body::Skeleton { columns, .. } => render_skeleton_header(&mut out, *columns),
        Body::Rows { .. } | Body::Empty => render_header(&mut out, view),
    }
    out.push_str("</thead><tbody>");
    match &view.body {
        Body::Skeleton { columns, rows } => {
            for _ in 0..*rows {
                render_skeleton_row(&mut out, *columns);
            }
        }
        Body::Rows { rows } => {
            for row in rows {
                render_row(&mut out, row);
            }
        }
        Body::Empty => {}
    }
    out.push_str("</tbody></table></div>");

    if matches!(view.body, Body::Empty) {
        let _ = write!(
            out,
            r#"<div class="no-results"><h3>{}</h3><p>{}</p></div>"#,
            escape(NO_RESULTS_TITLE),
            escape(NO_RESULTS_HINT)
        );
    }

    if let Some(bar) = &view.pagination {
        render_pagination(&mut out, bar);
    }
    out
}

fn render_header(out: &mut String, view: &TableView) {
    out.push_str("<tr>");
    for header in &view.sort_headers {
        let _ = write!(
            out,
            r#"<th class="sortable" {}>{}</th>"#,
            action_attrs(&Intent::ToggleSort(header.key)),
            escape(&header.text())
        );
    }
    for movie in &view.movies {
        render_movie_header(out, movie);
    }
    out.push_str("</tr>");
}

fn render_movie_header(out: &mut String, movie: &MovieHeader) {
    let class = if movie.selected { "movie selected" } else { "movie" };
    let _ = write!(
        out,
        r#"<th class="{class}" {}>"#,
        action_attrs(&Intent::SelectMovie(movie.title.clone()))
    );
    if let Some(poster) = &movie.poster {
        let _ = write!(
            out,
            r#"<img class="poster" src="{}" alt="{}" title="{}">"#,
            escape(poster),
            escape(&movie.title),
            escape(&movie.tooltip)
        );
    } else {
        let _ = write!(
            out,
            r#"<span class="poster" title="{}">{}</span>"#,
            escape(&movie.tooltip),
            escape(&movie.title)
        );
    }
    if let Some(year) = movie.year {
        let _ = write!(out, r#"<span class="year">{year}</span>"#);
    }
    out.push_str("</th>");
}

fn render_portrait(out: &mut String, portrait: &Portrait, name: &str, size: u32, title: &str) {
    match portrait {
        Portrait::Image { src } => {
            let _ = write!(
                out,
                r#"<img class="portrait" src="{}" alt="{}" title="{}" width="{size}" height="{size}">"#,
                escape(src),
                escape(name),
                escape(title)
            );
        }
        Portrait::Placeholder(placeholder) => {
            let _ = write!(
                out,
                r#"<span class="portrait" title="{}">{}</span>"#,
                escape(title),
                placeholder.to_svg(size)
            );
        }
    }
}

fn render_row(out: &mut String, row: &ActorRow) {
    let _ = write!(out, r#"<tr data-actor="{}"><td class="name">"#, row.id);
    render_portrait(out, &row.portrait, &row.name, 32, &row.name);
    let _ = write!(
        out,
        r#"<span>{}</span></td><td class="total"><span class="badge">{}</span></td>"#,
        escape(&row.name),
        row.total_movies
    );
    for cell in &row.cells {
        out.push_str(r#"<td class="cell">"#);
        if cell.appeared {
            let tooltip = cell.tooltip.as_deref().unwrap_or(&row.name);
            render_portrait(out, &row.portrait, &row.name, 40, tooltip);
            if let Some(character) = &cell.character {
                let _ = write!(out, r#"<span class="character">{}</span>"#, escape(character));
            }
        }
        out.push_str("</td>");
    }
    out.push_str("</tr>");
}

fn render_skeleton_header(out: &mut String, columns: usize) {
    out.push_str(r#"<tr><th class="skeleton"></th><th class="skeleton"></th>"#);
    for _ in 0..columns {
        out.push_str(r#"<th class="skeleton movie"><div class="shimmer poster"></div></th>"#);
    }
    out.push_str("</tr>");
}

fn render_skeleton_row(out: &mut String, columns: usize) {
    out.push_str(r#"<tr class="skeleton"><td><div class="shimmer"></div></td><td><div class="shimmer"></div></td>"#);
    for _ in 0..columns {
        out.push_str(r#"<td><div class="shimmer dot"></div></td>"#);
    }
    out.push_str("</tr>");
}

fn render_pagination(out: &mut String, bar: &PaginationBar) {
    let disabled = |enabled: bool| if enabled { "" } else { " disabled" };
    let _ = write!(
        out,
        concat!(
            r#"<nav class="pagination">"#,
            r#"<button {}{}>Previous</button>"#,
            r#"<span class="page">{}</span>"#,
            r#"<button {}{}>Next</button>"#,
            "</nav>"
        ),
        action_attrs(&Intent::PrevPage),
        disabled(bar.prev_enabled),
        escape(&bar.label()),
        action_attrs(&Intent::NextPage),
        disabled(bar.next_enabled),
    );
}
