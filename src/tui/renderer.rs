//! Rendering functions for the board.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::board::{Notice, NoticeLevel, StageColumn, Totals};
use crate::models::{ClientType, Deal};
use crate::nav::NavState;
use crate::utils::{format_money, truncate};

/// Lines taken by one card.
pub const CARD_HEIGHT: u16 = 2;

/// Height of the header block.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the footer line.
pub const FOOTER_HEIGHT: u16 = 1;

/// Render the header with totals and background activity.
pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    view: ClientType,
    totals: Totals,
    in_flight: usize,
    spinner: char,
) {
    let activity = if in_flight > 0 {
        Span::styled(format!("  {spinner} syncing {in_flight}"), Theme::info())
    } else {
        Span::raw("")
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} pipeline ", title_case(view)), Theme::header()),
        Span::styled(format!("  {} deals  ", totals.count), Theme::dimmed()),
        Span::styled(format_money(totals.value), Theme::money()),
        activity,
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    frame.render_widget(header, area);
}

fn title_case(view: ClientType) -> &'static str {
    match view {
        ClientType::Buyer => "Buyer",
        ClientType::Seller => "Seller",
    }
}

/// Render stage columns side by side.
pub fn render_columns(
    frame: &mut Frame,
    area: Rect,
    columns: &[StageColumn<'_>],
    nav: &NavState,
    active: Option<&Deal>,
) {
    if columns.is_empty() {
        let empty = Paragraph::new("No stages for this pipeline (Tab switches view)")
            .style(Theme::dimmed())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            );
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (index, (column, chunk)) in columns.iter().zip(chunks.iter()).enumerate() {
        render_column(frame, *chunk, index, column, nav, active);
    }
}

fn render_column(
    frame: &mut Frame,
    area: Rect,
    index: usize,
    column: &StageColumn<'_>,
    nav: &NavState,
    active: Option<&Deal>,
) {
    let totals = column.totals();
    let hovered = nav.hover == Some(index);

    let block = Block::default()
        .title(format!(
            " {} ({}) ",
            column.stage.name, totals.count
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", format_money(totals.value)),
            Theme::money(),
        )))
        .borders(Borders::ALL)
        .border_style(if hovered {
            Theme::hover_border()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(1) as usize;
    let mut lines: Vec<Line> = Vec::new();

    for (row, deal) in column.deals.iter().enumerate().skip(nav.scroll) {
        let is_dragged = active.is_some_and(|a| a.id == deal.id);
        let is_selected = !nav.is_dragging() && nav.column == index && nav.row == row;

        let title_style = if is_dragged {
            Theme::dragged_card()
        } else if is_selected {
            Theme::selected_card()
        } else {
            Style::default()
        };

        let marker = if is_dragged { "\u{2195} " } else { "" };
        lines.push(Line::from(Span::styled(
            truncate(&format!("{marker}{}", deal.label()), width),
            title_style,
        )));
        lines.push(card_detail(deal, width));
    }

    if hovered {
        if let Some(deal) = active.filter(|d| !column.deals.iter().any(|c| c.id == d.id)) {
            lines.push(Line::from(Span::styled(
                truncate(&format!("+ {}", deal.label()), width),
                Theme::hover_border(),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn card_detail(deal: &Deal, width: usize) -> Line<'static> {
    let price = deal
        .price
        .map(format_money)
        .unwrap_or_else(|| "no price".to_string());
    let mut spans = vec![Span::styled(format!("  {price}"), Theme::money())];
    if let Some(closing) = deal.closing_date {
        spans.push(Span::styled(
            truncate(&format!("  closes {closing}"), width.saturating_sub(price.len() + 2)),
            Theme::dimmed(),
        ));
    }
    Line::from(spans)
}

/// Render the footer with key hints, or the current notice.
pub fn render_footer(frame: &mut Frame, area: Rect, notice: Option<&Notice>, dragging: bool) {
    let line = match notice {
        Some(notice) => {
            let style = match notice.level {
                NoticeLevel::Error => Theme::error(),
                NoticeLevel::Info => Theme::info(),
            };
            Line::from(Span::styled(format!(" {}", notice.message), style))
        }
        None if dragging => Line::from(Span::styled(
            " \u{2190}/\u{2192} choose stage  enter drop  esc cancel",
            Theme::dimmed(),
        )),
        None => Line::from(Span::styled(
            " arrows move  enter pick up  tab buyer/seller  r refresh  q quit",
            Theme::dimmed(),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
