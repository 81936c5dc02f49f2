use serde_json::json;

use crate::cli::commands::NoteCommands;
use crate::cli::instance::resolve_in_location;
use crate::cli::{finish, Context};
use crate::db::{new_id, note_repo};
use crate::error::HubtasksError;
use crate::output;

pub fn run(cmd: NoteCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        NoteCommands::Add {
            instance,
            text,
            no_carry,
            photos,
            by,
        } => run_add(&instance, &text, !no_carry, &photos, by.as_deref(), ctx),
        NoteCommands::List { instance } => run_list(&instance, ctx),
    };
    finish(result, ctx.json)
}

fn run_add(
    reference: &str,
    text: &str,
    carry_forward: bool,
    photos: &[String],
    by: Option<&str>,
    ctx: &Context,
) -> Result<i32, HubtasksError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(HubtasksError::validation("Note text is required"));
    }
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let instance = resolve_in_location(&conn, location_id, reference)?;

    let note = note_repo::create_note(&conn, &new_id(), &instance.id, text, photos, carry_forward, by)?;

    if ctx.json {
        output::print_success(json!({ "note": output::json::note_json(&note) }));
    } else {
        println!("Added note {} to instance {}", note.id, instance.id);
    }
    Ok(0)
}

fn run_list(reference: &str, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let instance = resolve_in_location(&conn, location_id, reference)?;
    let notes = note_repo::list_notes(&conn, &instance.id)?;

    if ctx.json {
        let notes_json: Vec<_> = notes.iter().map(output::json::note_json).collect();
        output::print_success(json!({ "instance_id": instance.id, "notes": notes_json }));
    } else {
        output::text::print_notes(&notes);
    }
    Ok(0)
}
