use chrono::{DateTime, Local, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::api::DeadlineApi;
use crate::error::Result;
use crate::models::{format_date_for_showing, format_time_left, parse_due, DeadlineDraft, DeadlineId};
use crate::session::Session;
use crate::store::DeadlineStore;
use crate::timescale::TimeScale;

pub const EMPTY_SCALE_MESSAGE: &str = "There are currently no deadlines with this timescale.";

/// Fetches every deadline and prints them grouped by urgency.
pub async fn cmd_list<A: DeadlineApi>(session: &mut Session<A>) -> Result<()> {
    session.load().await?;
    print!("{}", render_grouped(session.store(), Utc::now()));
    Ok(())
}

/// Creates a deadline on the server and, once confirmed, in the store.
///
/// `due` is anything [`parse_due`] understands; an unparsable value is
/// reported as an invalid date before any request is made.
pub async fn cmd_add<A: DeadlineApi>(
    session: &mut Session<A>,
    title: String,
    description: String,
    due: String,
) -> Result<DeadlineId> {
    let draft = DeadlineDraft::new(title, description, parse_due(&due, Utc::now()));
    let id = session.create(draft).await?;
    println!("Deadline added (id = {})", id);
    Ok(id)
}

/// Edits an existing deadline. Fields left as `None` keep their current value.
///
/// Returns `Ok(false)` without sending anything when the id is unknown.
pub async fn cmd_edit<A: DeadlineApi>(
    session: &mut Session<A>,
    id: DeadlineId,
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
) -> Result<bool> {
    session.load().await?;
    let Some(current) = session.store().get(id) else {
        eprintln!("Deadline {} not found.", id);
        return Ok(false);
    };

    let end_date = match due {
        Some(d) => parse_due(&d, Utc::now()),
        None => Some(current.end_date),
    };
    let draft = DeadlineDraft::new(
        title.unwrap_or_else(|| current.title.clone()),
        description.unwrap_or_else(|| current.description.clone()),
        end_date,
    );
    session.update(id, draft).await?;
    println!("Deadline {} updated.", id);
    Ok(true)
}

/// Deletes a deadline on the server and then locally.
pub async fn cmd_remove<A: DeadlineApi>(session: &mut Session<A>, id: DeadlineId) -> Result<()> {
    session.delete(id).await?;
    println!("Deadline {} removed.", id);
    Ok(())
}

/// One table per urgency category, in category order.
pub fn render_grouped(store: &DeadlineStore, now: DateTime<Utc>) -> String {
    let mapping = store.time_scale_mapping(now);
    let mut out = String::new();

    for (scale, deadlines) in mapping.iter() {
        out.push_str(&format!("{} ({})\n", scale.label(), deadlines.len()));
        if deadlines.is_empty() {
            out.push_str(EMPTY_SCALE_MESSAGE);
            out.push_str("\n\n");
            continue;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").add_attribute(Attribute::Bold),
                Cell::new("Title").add_attribute(Attribute::Bold),
                Cell::new("Description").add_attribute(Attribute::Bold),
                Cell::new("Due").add_attribute(Attribute::Bold),
                Cell::new("Time Left").add_attribute(Attribute::Bold),
            ]);

        for d in deadlines {
            table.add_row(vec![
                Cell::new(d.id),
                Cell::new(&d.title),
                Cell::new(&d.description),
                Cell::new(format_date_for_showing(d.end_date)),
                Cell::new(format_time_left(d.end_date, now)).fg(scale_color(scale)),
            ]);
        }
        out.push_str(&format!("{table}\n\n"));
    }

    out.push_str(&format!(
        "{} deadline(s), as of {}\n",
        mapping.len(),
        now.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ));
    out
}

fn scale_color(scale: TimeScale) -> Color {
    match scale {
        TimeScale::Finished => Color::Grey,
        TimeScale::Day | TimeScale::ThreeDays => Color::Red,
        TimeScale::Week => Color::Yellow,
        TimeScale::Month | TimeScale::Year | TimeScale::LongerThanYear => Color::Green,
    }
}
