use crate::client::{ConversationClient, ConversationItem};
use crate::output::ExtractedRow;
use crate::utils::{self, RunConfig};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Pause between successful page fetches; the upstream throttles bursts.
const PAGE_DELAY: Duration = Duration::from_secs(5);

/// When to end pagination relative to boundary-crossing conversations.
///
/// The upstream returns conversations newest-assignment-first, so the first
/// one assigned on or before the boundary date normally means everything
/// after it is older too. `SecondHit` exists for feeds where a single stray
/// old assignment shows up mid-stream; it tolerates one and stops at the
/// next. Boundary-crossing conversations themselves are never emitted under
/// either policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StopPolicy {
    /// Stop at the first conversation assigned on or before the boundary date.
    FirstHit,
    /// Tolerate one boundary-crossing conversation and stop at the second.
    SecondHit,
}

impl StopPolicy {
    fn hit_limit(self) -> u32 {
        match self {
            StopPolicy::FirstHit => 1,
            StopPolicy::SecondHit => 2,
        }
    }
}

/// What absorbing one page produced.
#[derive(Debug)]
pub struct PageOutcome {
    /// Rows retained from this page, in upstream order.
    pub rows: Vec<ExtractedRow>,
    /// Cursor for the next page; `None` ends the pagination.
    pub next_cursor: Option<String>,
    /// Cumulative boundary-hit count after this page.
    pub hits: u32,
    /// The stop policy fired; no further pages should be requested.
    pub stop: bool,
}

/// Absorb one page of items into rows.
///
/// Pure: cumulative state goes in as `hits_before`, everything else comes
/// back in the outcome. Each item is checked against the boundary
/// independently, so an out-of-order page cannot wedge the loop — under
/// `SecondHit`, newer items sitting between two boundary hits are still
/// retained.
pub fn absorb_page(
    items: &[ConversationItem],
    boundary: NaiveDate,
    policy: StopPolicy,
    hits_before: u32,
) -> PageOutcome {
    let mut rows = Vec::new();
    let mut hits = hits_before;
    let mut stop = false;

    for item in items {
        let assigned_raw = item
            .ticket
            .as_ref()
            .and_then(|t| t.assigned_at.as_deref())
            .unwrap_or("");
        let crossed = utils::assigned_date(assigned_raw).is_some_and(|d| d <= boundary);

        if crossed {
            hits += 1;
            if hits >= policy.hit_limit() {
                stop = true;
                break;
            }
            continue;
        }

        rows.push(project(item));
    }

    // Advancing requires the page's last item to carry an id.
    let next_cursor = if stop {
        None
    } else {
        items.last().and_then(|i| i.id.clone())
    };

    PageOutcome {
        rows,
        next_cursor,
        hits,
        stop,
    }
}

fn project(item: &ConversationItem) -> ExtractedRow {
    let ticket = item.ticket.as_ref();
    let assigned = ticket.and_then(|t| t.assigned_at.as_deref()).unwrap_or("");
    let updated = ticket.and_then(|t| t.last_updated.as_deref()).unwrap_or("");

    ExtractedRow {
        name: item.name.clone(),
        contact_number: item.whatsapp_id.clone(),
        date_created: utils::format_display_date(assigned),
        last_modified: if updated.is_empty() {
            String::new()
        } else {
            utils::format_display_date(updated)
        },
        notes: utils::join_notes(&item.list_notes),
    }
}

/// Drive the pagination loop to completion and return every retained row.
///
/// The loop ends on an empty page, a missing cursor, or the stop policy
/// firing. A failed request also ends it — whatever accumulated up to that
/// point is returned so the caller can still persist a partial extract.
pub async fn collect(client: &ConversationClient, config: &RunConfig) -> Vec<ExtractedRow> {
    let pb = if config.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    };

    let mut rows: Vec<ExtractedRow> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut hits = 0u32;
    let mut pages = 0usize;

    loop {
        pb.set_message(format!("Fetching page {}...", pages + 1));
        let items = match client.fetch_page(cursor.as_deref()).await {
            Ok(items) => items,
            Err(e) => {
                pb.println(format!("Request failed: {:#}", e));
                break;
            }
        };
        pages += 1;

        if config.verbose {
            pb.println(format!("Retrieved {} item(s)", items.len()));
        }
        if items.is_empty() {
            break;
        }

        let outcome = absorb_page(&items, config.boundary, config.stop_policy, hits);
        if config.verbose && outcome.hits > hits {
            pb.println(format!("Boundary date hit {} time(s)", outcome.hits));
        }
        hits = outcome.hits;
        rows.extend(outcome.rows);

        if outcome.stop {
            break;
        }
        let Some(next) = outcome.next_cursor else {
            break;
        };
        cursor = Some(next);

        pb.set_message("Waiting before the next page...");
        tokio::time::sleep(PAGE_DELAY).await;
    }

    pb.finish_and_clear();
    if !config.quiet {
        eprintln!("Done. {} page(s) fetched, {} row(s) retained.", pages, rows.len());
    }
    rows
}
