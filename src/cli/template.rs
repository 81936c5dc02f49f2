use serde_json::json;

use crate::cli::commands::TemplateCommands;
use crate::cli::{finish, Context};
use crate::db::template_repo;
use crate::error::HubtasksError;
use crate::output;

pub fn run(cmd: TemplateCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        TemplateCommands::Save { name, items, by } => run_save(&name, &items, by.as_deref(), ctx),
        TemplateCommands::List => run_list(ctx),
        TemplateCommands::Show { name } => run_show(&name, ctx),
        TemplateCommands::Delete { name } => run_delete(&name, ctx),
    };
    finish(result, ctx.json)
}

fn run_save(name: &str, items: &[String], by: Option<&str>, ctx: &Context) -> Result<i32, HubtasksError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HubtasksError::validation("Template name is required"));
    }
    if items.is_empty() || items.iter().any(|item| item.trim().is_empty()) {
        return Err(HubtasksError::validation("Checklist items cannot be empty"));
    }
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;

    let (template, created) = template_repo::save_template(&conn, location_id, name, items, by)?;
    tracing::info!(location_id, template = %template.name, created, "checklist template saved");

    if ctx.json {
        output::print_success(json!({
            "template": output::json::template_json(&template),
            "created": created
        }));
    } else {
        let verb = if created { "Created" } else { "Updated" };
        println!("{verb} template: {} ({} items)", template.name, template.checklist_items.len());
    }
    Ok(0)
}

fn run_list(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let templates = template_repo::list_templates(&conn, location_id)?;

    if ctx.json {
        let templates_json: Vec<_> = templates.iter().map(output::json::template_json).collect();
        output::print_success(json!({ "templates": templates_json }));
    } else {
        output::text::print_templates(&templates);
    }
    Ok(0)
}

fn run_show(name: &str, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let template = template_repo::get_template(&conn, location_id, name)?;

    if ctx.json {
        output::print_success(json!({ "template": output::json::template_json(&template) }));
    } else {
        output::text::print_template(&template);
    }
    Ok(0)
}

fn run_delete(name: &str, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    template_repo::delete_template(&conn, location_id, name)?;

    if ctx.json {
        output::print_success(json!({ "deleted": name }));
    } else {
        println!("Deleted template: {name}");
    }
    Ok(0)
}
